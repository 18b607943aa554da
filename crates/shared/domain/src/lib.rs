//! Domain layer - Core business entities and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies:
//! self-validating value objects, the hierarchical role model and the
//! employee, department, job title, role and user account aggregates.

pub mod constants;
pub mod department;
pub mod employee;
pub mod entity;
pub mod error;
pub mod filters;
pub mod hierarchical_role;
pub mod job_title;
pub mod pagination;
pub mod password;
pub mod role;
pub mod user_account;
pub mod value_objects;

pub use constants::*;
pub use department::Department;
pub use employee::{Employee, NewEmployee};
pub use entity::{Entity, Timestamps};
pub use error::{DomainError, DomainResult};
pub use filters::{DepartmentFilter, EmployeeFilter, JobTitleFilter};
pub use hierarchical_role::{default_permissions_for_level, permissions, HierarchicalRole};
pub use job_title::JobTitle;
pub use pagination::{paginate, PageRequest, PageResult};
pub use password::Password;
pub use role::Role;
pub use user_account::{AccountState, UserAccount};
pub use value_objects::{DateOfBirth, DocumentNumber, Email, PhoneNumber};
