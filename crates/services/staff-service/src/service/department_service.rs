//! Department service.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, PaginationConfig};
use domain::{Department, DepartmentFilter, Entity, PageResult};

use super::page_request;
use crate::dto::{validate_request, CreateDepartment, UpdateDepartment};
use crate::repository::{DepartmentRepository, EmployeeRepository};

/// Department service trait for dependency injection.
#[async_trait]
pub trait DepartmentService: Send + Sync {
    async fn create(&self, request: CreateDepartment) -> AppResult<Department>;

    async fn update(&self, id: Uuid, request: UpdateDepartment) -> AppResult<Department>;

    async fn activate(&self, id: Uuid) -> AppResult<Department>;

    async fn deactivate(&self, id: Uuid) -> AppResult<Department>;

    async fn get(&self, id: Uuid) -> AppResult<Department>;

    /// Refused while employees are still assigned
    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn list(
        &self,
        filter: DepartmentFilter,
        page: i64,
        page_size: i64,
    ) -> AppResult<PageResult<Department>>;
}

/// Concrete implementation of DepartmentService using repositories.
pub struct DepartmentManager {
    departments: Arc<dyn DepartmentRepository>,
    employees: Arc<dyn EmployeeRepository>,
    pagination: PaginationConfig,
}

impl DepartmentManager {
    pub fn new(
        departments: Arc<dyn DepartmentRepository>,
        employees: Arc<dyn EmployeeRepository>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            departments,
            employees,
            pagination,
        }
    }

    async fn load(&self, id: Uuid) -> AppResult<Department> {
        self.departments
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn ensure_name_free(&self, name: &str, owner: Option<Uuid>) -> AppResult<()> {
        match self.departments.find_by_name(name).await? {
            Some(other) if Some(other.id()) != owner => Err(AppError::conflict("Department")),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DepartmentService for DepartmentManager {
    async fn create(&self, request: CreateDepartment) -> AppResult<Department> {
        validate_request(&request)?;
        let department = Department::create(&request.name, request.description)?;
        self.ensure_name_free(department.name(), None).await?;

        let department = self.departments.insert(department).await?;
        info!(department_id = %department.id(), name = %department.name(), "Department created");
        Ok(department)
    }

    async fn update(&self, id: Uuid, request: UpdateDepartment) -> AppResult<Department> {
        validate_request(&request)?;
        let mut department = self.load(id).await?;

        if let Some(name) = request.name {
            department.rename(&name)?;
            self.ensure_name_free(department.name(), Some(id)).await?;
        }
        if let Some(description) = request.description {
            department.update_description(Some(description));
        }

        self.departments.update(department).await
    }

    async fn activate(&self, id: Uuid) -> AppResult<Department> {
        let mut department = self.load(id).await?;
        department.activate();
        self.departments.update(department).await
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<Department> {
        let mut department = self.load(id).await?;
        department.deactivate();
        self.departments.update(department).await
    }

    async fn get(&self, id: Uuid) -> AppResult<Department> {
        self.load(id).await
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        let assigned = self.employees.count_by_department(id).await?;
        if assigned > 0 {
            return Err(AppError::in_use(format!(
                "Department ({} employees assigned)",
                assigned
            )));
        }

        self.departments.delete(id).await?;
        info!(department_id = %id, "Department deleted");
        Ok(())
    }

    async fn list(
        &self,
        filter: DepartmentFilter,
        page: i64,
        page_size: i64,
    ) -> AppResult<PageResult<Department>> {
        let request = page_request(&self.pagination, page, page_size);
        let filter = filter.normalized();
        debug!(?filter, page = request.page, "Listing departments");

        let (items, total) = self.departments.search(&filter, request).await?;
        Ok(PageResult::from_request(items, total, &request))
    }
}
