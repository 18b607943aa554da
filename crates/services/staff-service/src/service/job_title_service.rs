//! Job title service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, PaginationConfig};
use domain::{Entity, JobTitle, JobTitleFilter, PageResult};

use super::page_request;
use crate::dto::{validate_request, CreateJobTitle, UpdateJobTitle};
use crate::repository::{EmployeeRepository, JobTitleRepository, UserAccountRepository};

/// Job title service trait for dependency injection.
#[async_trait]
pub trait JobTitleService: Send + Sync {
    async fn create(&self, request: CreateJobTitle) -> AppResult<JobTitle>;

    async fn update(&self, id: Uuid, request: UpdateJobTitle) -> AppResult<JobTitle>;

    async fn get(&self, id: Uuid) -> AppResult<JobTitle>;

    /// Refused while employees or accounts still carry the title
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(
        &self,
        filter: JobTitleFilter,
        page: i64,
        page_size: i64,
    ) -> AppResult<PageResult<JobTitle>>;
}

/// Concrete implementation of JobTitleService using repository.
pub struct JobTitleManager {
    job_titles: Arc<dyn JobTitleRepository>,
    employees: Arc<dyn EmployeeRepository>,
    accounts: Arc<dyn UserAccountRepository>,
    pagination: PaginationConfig,
}

impl JobTitleManager {
    pub fn new(
        job_titles: Arc<dyn JobTitleRepository>,
        employees: Arc<dyn EmployeeRepository>,
        accounts: Arc<dyn UserAccountRepository>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            job_titles,
            employees,
            accounts,
            pagination,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<JobTitle> {
        self.job_titles
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }
}

#[async_trait]
impl JobTitleService for JobTitleManager {
    async fn create(&self, request: CreateJobTitle) -> AppResult<JobTitle> {
        validate_request(&request)?;
        let job_title = JobTitle::create(&request.name, request.description, request.level)?;

        if self.job_titles.find_by_name(job_title.name()).await?.is_some() {
            return Err(AppError::conflict("Job title"));
        }

        let job_title = self.job_titles.insert(job_title).await?;
        info!(job_title_id = %job_title.id(), name = %job_title.name(), "Job title created");
        Ok(job_title)
    }

    async fn update(&self, id: Uuid, request: UpdateJobTitle) -> AppResult<JobTitle> {
        validate_request(&request)?;
        let mut job_title = self.load(id).await?;

        if let Some(name) = request.name {
            job_title.rename(&name)?;
            if let Some(other) = self.job_titles.find_by_name(job_title.name()).await? {
                if other.id() != id {
                    return Err(AppError::conflict("Job title"));
                }
            }
        }
        if let Some(description) = request.description {
            job_title.update_description(Some(description));
        }
        if let Some(level) = request.level {
            job_title.change_level(level);
        }

        self.job_titles.update(job_title).await
    }

    async fn get(&self, id: Uuid) -> AppResult<JobTitle> {
        self.load(id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let employees = self.employees.count_by_job_title(id).await?;
        if employees > 0 {
            return Err(AppError::in_use(format!("Job title ({} employees)", employees)));
        }
        let accounts = self.accounts.count_by_job_title(id).await?;
        if accounts > 0 {
            return Err(AppError::in_use(format!("Job title ({} accounts)", accounts)));
        }

        self.job_titles.delete(id).await?;
        info!(job_title_id = %id, "Job title deleted");
        Ok(())
    }

    async fn list(
        &self,
        filter: JobTitleFilter,
        page: i64,
        page_size: i64,
    ) -> AppResult<PageResult<JobTitle>> {
        let request = page_request(&self.pagination, page, page_size);
        let filter = filter.normalized();
        debug!(?filter, page = request.page, "Listing job titles");

        let (items, total) = self.job_titles.search(&filter, request).await?;
        Ok(PageResult::from_request(items, total, &request))
    }
}
