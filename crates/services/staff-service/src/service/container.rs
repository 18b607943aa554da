//! Service Container - Centralized service access.
//!
//! Bundles every application service behind its trait so callers depend on
//! abstractions. `Services::in_memory` wires the in-memory stores for
//! embedding and tests.

use std::sync::Arc;

use super::{
    AccountManager, AccountService, AuthService, Authenticator, DepartmentManager,
    DepartmentService, EmployeeManager, EmployeeService, JobTitleManager, JobTitleService,
    JwtTokenService, RoleManager, RoleService, TokenService,
};
use crate::config::StaffServiceConfig;
use crate::repository::{
    InMemoryDepartmentStore, InMemoryEmployeeStore, InMemoryJobTitleStore, InMemoryRoleStore,
    InMemoryUserAccountStore,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    /// Get authentication service
    fn auth(&self) -> Arc<dyn AuthService>;

    /// Get account administration service
    fn accounts(&self) -> Arc<dyn AccountService>;

    fn employees(&self) -> Arc<dyn EmployeeService>;

    fn departments(&self) -> Arc<dyn DepartmentService>;

    fn job_titles(&self) -> Arc<dyn JobTitleService>;

    fn roles(&self) -> Arc<dyn RoleService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    account_service: Arc<dyn AccountService>,
    employee_service: Arc<dyn EmployeeService>,
    department_service: Arc<dyn DepartmentService>,
    job_title_service: Arc<dyn JobTitleService>,
    role_service: Arc<dyn RoleService>,
}

impl Services {
    /// Create a new service container from already built services
    pub fn new(
        auth_service: Arc<dyn AuthService>,
        account_service: Arc<dyn AccountService>,
        employee_service: Arc<dyn EmployeeService>,
        department_service: Arc<dyn DepartmentService>,
        job_title_service: Arc<dyn JobTitleService>,
        role_service: Arc<dyn RoleService>,
    ) -> Self {
        Self {
            auth_service,
            account_service,
            employee_service,
            department_service,
            job_title_service,
            role_service,
        }
    }

    /// Create service container backed by fresh in-memory stores
    pub fn in_memory(config: &StaffServiceConfig) -> Self {
        let employees = Arc::new(InMemoryEmployeeStore::new());
        let departments = Arc::new(InMemoryDepartmentStore::new());
        let job_titles = Arc::new(InMemoryJobTitleStore::new());
        let roles = Arc::new(InMemoryRoleStore::new());
        let accounts = Arc::new(InMemoryUserAccountStore::new());
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));

        Self {
            auth_service: Arc::new(Authenticator::new(
                accounts.clone(),
                tokens,
                config.lockout,
            )),
            account_service: Arc::new(AccountManager::new(accounts.clone(), roles.clone())),
            employee_service: Arc::new(EmployeeManager::new(
                employees.clone(),
                departments.clone(),
                job_titles.clone(),
                accounts.clone(),
                config.pagination,
                config.phone_region.clone(),
            )),
            department_service: Arc::new(DepartmentManager::new(
                departments,
                employees.clone(),
                config.pagination,
            )),
            job_title_service: Arc::new(JobTitleManager::new(
                job_titles,
                employees,
                accounts.clone(),
                config.pagination,
            )),
            role_service: Arc::new(RoleManager::new(roles, accounts)),
        }
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn accounts(&self) -> Arc<dyn AccountService> {
        self.account_service.clone()
    }

    fn employees(&self) -> Arc<dyn EmployeeService> {
        self.employee_service.clone()
    }

    fn departments(&self) -> Arc<dyn DepartmentService> {
        self.department_service.clone()
    }

    fn job_titles(&self) -> Arc<dyn JobTitleService> {
        self.job_title_service.clone()
    }

    fn roles(&self) -> Arc<dyn RoleService> {
        self.role_service.clone()
    }
}
