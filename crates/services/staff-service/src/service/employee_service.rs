//! Employee service - Handles employee-related business logic.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt, PaginationConfig};
use domain::{
    DateOfBirth, DocumentNumber, Email, Employee, EmployeeFilter, Entity, NewEmployee, PageResult,
    PhoneNumber,
};

use super::page_request;
use crate::dto::{validate_request, CreateEmployee, UpdateEmployee};
use crate::repository::{
    DepartmentRepository, EmployeeRepository, JobTitleRepository, UserAccountRepository,
};

/// Employee service trait for dependency injection.
#[async_trait]
pub trait EmployeeService: Send + Sync {
    async fn create_employee(&self, request: CreateEmployee) -> AppResult<Employee>;

    /// Apply the fields present in `request`
    async fn update_employee(&self, id: Uuid, request: UpdateEmployee) -> AppResult<Employee>;

    async fn add_phone(&self, id: Uuid, phone: &str) -> AppResult<Employee>;

    /// Remove a phone given in any accepted notation
    async fn remove_phone(&self, id: Uuid, phone: &str) -> AppResult<Employee>;

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee>;

    /// Refused while the employee manages others or backs a user account
    async fn delete_employee(&self, id: Uuid) -> AppResult<()>;

    /// Filtered page; `page_size` is clamped to the configured maximum
    async fn list_employees(
        &self,
        filter: EmployeeFilter,
        page: i64,
        page_size: i64,
    ) -> AppResult<PageResult<Employee>>;
}

/// Concrete implementation of EmployeeService using repositories.
pub struct EmployeeManager {
    employees: Arc<dyn EmployeeRepository>,
    departments: Arc<dyn DepartmentRepository>,
    job_titles: Arc<dyn JobTitleRepository>,
    accounts: Arc<dyn UserAccountRepository>,
    pagination: PaginationConfig,
    phone_region: Option<String>,
}

impl EmployeeManager {
    pub fn new(
        employees: Arc<dyn EmployeeRepository>,
        departments: Arc<dyn DepartmentRepository>,
        job_titles: Arc<dyn JobTitleRepository>,
        accounts: Arc<dyn UserAccountRepository>,
        pagination: PaginationConfig,
        phone_region: Option<String>,
    ) -> Self {
        Self {
            employees,
            departments,
            job_titles,
            accounts,
            pagination,
            phone_region,
        }
    }

    fn parse_phone(&self, raw: &str) -> AppResult<PhoneNumber> {
        Ok(PhoneNumber::parse(raw, self.phone_region.as_deref())?)
    }

    async fn load(&self, id: Uuid) -> AppResult<Employee> {
        self.employees
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    async fn ensure_email_free(&self, email: &Email, owner: Option<Uuid>) -> AppResult<()> {
        match self.employees.find_by_email(email.value()).await? {
            Some(other) if Some(other.id()) != owner => Err(AppError::conflict("Email")),
            _ => Ok(()),
        }
    }

    async fn ensure_document_free(
        &self,
        document: &DocumentNumber,
        owner: Option<Uuid>,
    ) -> AppResult<()> {
        match self.employees.find_by_document(document.digits()).await? {
            Some(other) if Some(other.id()) != owner => Err(AppError::conflict("Document number")),
            _ => Ok(()),
        }
    }

    async fn ensure_active_department(&self, department_id: Uuid) -> AppResult<()> {
        let department = self
            .departments
            .find_by_id(department_id)
            .await?
            .ok_or_else(|| AppError::validation("Department does not exist"))?;
        if !department.is_active() {
            return Err(AppError::validation("Department is inactive"));
        }
        Ok(())
    }

    async fn ensure_job_title(&self, job_title_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = job_title_id {
            if self.job_titles.find_by_id(id).await?.is_none() {
                return Err(AppError::validation("Job title does not exist"));
            }
        }
        Ok(())
    }

    async fn ensure_manager(&self, manager_id: Option<Uuid>) -> AppResult<()> {
        if let Some(id) = manager_id {
            if self.employees.find_by_id(id).await?.is_none() {
                return Err(AppError::validation("Manager does not exist"));
            }
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeService for EmployeeManager {
    async fn create_employee(&self, request: CreateEmployee) -> AppResult<Employee> {
        validate_request(&request)?;

        let email = Email::parse(&request.email)?;
        let document = DocumentNumber::parse(&request.document)?;
        let date_of_birth = DateOfBirth::new(request.date_of_birth)?;
        let phones = request
            .phones
            .iter()
            .map(|raw| self.parse_phone(raw))
            .collect::<AppResult<Vec<_>>>()?;

        self.ensure_email_free(&email, None).await?;
        self.ensure_document_free(&document, None).await?;
        self.ensure_active_department(request.department_id).await?;
        self.ensure_job_title(request.job_title_id).await?;
        self.ensure_manager(request.manager_id).await?;

        let employee = Employee::create(NewEmployee {
            first_name: request.first_name,
            last_name: request.last_name,
            email,
            document,
            date_of_birth,
            phones,
            department_id: request.department_id,
            job_title_id: request.job_title_id,
            manager_id: request.manager_id,
        })?;

        let employee = self.employees.insert(employee).await?;
        info!(
            employee_id = %employee.id(),
            department_id = %employee.department_id(),
            "Employee created"
        );
        Ok(employee)
    }

    async fn update_employee(&self, id: Uuid, request: UpdateEmployee) -> AppResult<Employee> {
        validate_request(&request)?;
        let mut employee = self.load(id).await?;

        if request.first_name.is_some() || request.last_name.is_some() {
            let first_name = request
                .first_name
                .unwrap_or_else(|| employee.first_name().to_string());
            let last_name = request
                .last_name
                .unwrap_or_else(|| employee.last_name().to_string());
            employee.rename(&first_name, &last_name)?;
        }
        if let Some(raw) = request.email {
            let email = Email::parse(&raw)?;
            self.ensure_email_free(&email, Some(id)).await?;
            employee.change_email(email);
        }
        if let Some(raw) = request.document {
            let document = DocumentNumber::parse(&raw)?;
            self.ensure_document_free(&document, Some(id)).await?;
            employee.change_document(document);
        }
        if let Some(date) = request.date_of_birth {
            employee.change_date_of_birth(DateOfBirth::new(date)?);
        }
        if let Some(department_id) = request.department_id {
            if department_id != employee.department_id() {
                self.ensure_active_department(department_id).await?;
            }
            employee.move_to_department(department_id)?;
        }
        if let Some(job_title_id) = request.job_title_id {
            self.ensure_job_title(job_title_id).await?;
            employee.assign_job_title(job_title_id);
        }
        if let Some(manager_id) = request.manager_id {
            employee.assign_manager(manager_id)?;
            self.ensure_manager(manager_id).await?;
        }

        let employee = self.employees.update(employee).await?;
        info!(employee_id = %id, "Employee updated");
        Ok(employee)
    }

    async fn add_phone(&self, id: Uuid, phone: &str) -> AppResult<Employee> {
        let phone = self.parse_phone(phone)?;
        let mut employee = self.load(id).await?;
        employee.add_phone(phone)?;
        self.employees.update(employee).await
    }

    async fn remove_phone(&self, id: Uuid, phone: &str) -> AppResult<Employee> {
        let phone = self.parse_phone(phone)?;
        let mut employee = self.load(id).await?;
        employee.remove_phone(phone.e164())?;
        self.employees.update(employee).await
    }

    async fn get_employee(&self, id: Uuid) -> AppResult<Employee> {
        self.load(id).await
    }

    async fn delete_employee(&self, id: Uuid) -> AppResult<()> {
        let reports = self.employees.count_by_manager(id).await?;
        if reports > 0 {
            return Err(AppError::in_use(format!("Employee ({} direct reports)", reports)));
        }
        let accounts = self.accounts.count_by_employee(id).await?;
        if accounts > 0 {
            return Err(AppError::in_use(format!("Employee ({} linked accounts)", accounts)));
        }

        self.employees.delete(id).await?;
        info!(employee_id = %id, "Employee deleted");
        Ok(())
    }

    async fn list_employees(
        &self,
        filter: EmployeeFilter,
        page: i64,
        page_size: i64,
    ) -> AppResult<PageResult<Employee>> {
        let request = page_request(&self.pagination, page, page_size);
        let filter = filter.normalized();
        debug!(
            ?filter,
            page = request.page,
            page_size = request.page_size,
            "Listing employees"
        );

        let (items, total) = self.employees.search(&filter, request).await?;
        Ok(PageResult::from_request(items, total, &request))
    }
}
