//! Job title repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{paginate, Entity, JobTitle, JobTitleFilter, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Job title repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait JobTitleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobTitle>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<JobTitle>>;

    async fn insert(&self, job_title: JobTitle) -> AppResult<JobTitle>;

    async fn update(&self, job_title: JobTitle) -> AppResult<JobTitle>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn search(
        &self,
        filter: &JobTitleFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<JobTitle>, u64)>;
}

/// In-memory implementation of JobTitleRepository
#[derive(Default)]
pub struct InMemoryJobTitleStore {
    rows: RwLock<HashMap<Uuid, JobTitle>>,
}

impl InMemoryJobTitleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unique(rows: &HashMap<Uuid, JobTitle>, job_title: &JobTitle) -> AppResult<()> {
        let name = job_title.name().to_lowercase();
        if rows
            .values()
            .any(|t| t.id() != job_title.id() && t.name().to_lowercase() == name)
        {
            return Err(AppError::conflict("Job title"));
        }
        Ok(())
    }
}

#[async_trait]
impl JobTitleRepository for InMemoryJobTitleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<JobTitle>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<JobTitle>> {
        let name = name.trim().to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows.values().find(|t| t.name().to_lowercase() == name).cloned())
    }

    async fn insert(&self, job_title: JobTitle) -> AppResult<JobTitle> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&job_title.id()) {
            return Err(AppError::conflict("Job title"));
        }
        Self::ensure_unique(&rows, &job_title)?;
        rows.insert(job_title.id(), job_title.clone());
        Ok(job_title)
    }

    async fn update(&self, job_title: JobTitle) -> AppResult<JobTitle> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&job_title.id()) {
            return Err(AppError::NotFound);
        }
        Self::ensure_unique(&rows, &job_title)?;
        rows.insert(job_title.id(), job_title.clone());
        Ok(job_title)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn search(
        &self,
        filter: &JobTitleFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<JobTitle>, u64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<JobTitle> =
            rows.values().filter(|t| filter.matches(t)).cloned().collect();
        matches.sort_by_cached_key(|t| (t.level(), t.name().to_lowercase(), t.id()));
        Ok(paginate(matches, &page))
    }
}
