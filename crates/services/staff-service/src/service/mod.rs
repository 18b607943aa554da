//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and repositories to fulfill the staff
//! use cases. They depend on repository traits, never on concrete stores,
//! and translate domain failures into `AppError`.

mod account_service;
mod auth_service;
pub mod container;
mod department_service;
mod employee_service;
mod job_title_service;
mod role_service;
mod token_service;

use common::PaginationConfig;
use domain::PageRequest;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use account_service::{AccountManager, AccountService};
pub use auth_service::{AuthService, Authenticator};
pub use department_service::{DepartmentManager, DepartmentService};
pub use employee_service::{EmployeeManager, EmployeeService};
pub use job_title_service::{JobTitleManager, JobTitleService};
pub use role_service::{RoleManager, RoleService};
pub use token_service::{IssuedToken, JwtTokenService, TokenClaims, TokenService, TOKEN_TYPE_BEARER};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;
#[cfg(any(test, feature = "test-utils"))]
pub use token_service::MockTokenService;

/// Resolve raw paging input against the configured defaults and ceiling.
pub(crate) fn page_request(config: &PaginationConfig, page: i64, page_size: i64) -> PageRequest {
    let page_size = if page_size < 1 {
        i64::from(config.default_page_size)
    } else {
        page_size
    };
    PageRequest::new(page, page_size).clamped(config.max_page_size)
}
