//! Repository layer for data access.
//!
//! Each aggregate has an async repository trait plus an in-memory store.
//! Stores enforce the uniqueness rules a relational schema would enforce
//! with unique indexes, and return results in a stable order.

mod department_repository;
mod employee_repository;
mod job_title_repository;
mod role_repository;
mod user_account_repository;

pub use department_repository::{DepartmentRepository, InMemoryDepartmentStore};
pub use employee_repository::{EmployeeRepository, InMemoryEmployeeStore};
pub use job_title_repository::{InMemoryJobTitleStore, JobTitleRepository};
pub use role_repository::{InMemoryRoleStore, RoleRepository};
pub use user_account_repository::{InMemoryUserAccountStore, UserAccountRepository};

#[cfg(any(test, feature = "test-utils"))]
pub use department_repository::MockDepartmentRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use employee_repository::MockEmployeeRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use job_title_repository::MockJobTitleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use role_repository::MockRoleRepository;
#[cfg(any(test, feature = "test-utils"))]
pub use user_account_repository::MockUserAccountRepository;
