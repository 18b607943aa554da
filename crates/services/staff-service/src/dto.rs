//! Request types accepted by the application services.
//!
//! Shape checks (required fields, lengths) run through `validator`; the
//! domain value objects remain the authority on formats such as email,
//! CPF and phone numbers.

use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::HierarchicalRole;

/// Run `validator` checks and flatten the messages into one `Validation` error.
pub fn validate_request<T: Validate>(request: &T) -> AppResult<()> {
    request
        .validate()
        .map_err(|e| AppError::validation(format_validation_errors(&e)))
}

/// Format validation errors into a user-friendly string
fn format_validation_errors(errors: &validator::ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect();
    messages.sort();
    messages.join(", ")
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterAccount {
    #[validate(length(
        min = 3,
        max = 64,
        message = "User name must be between 3 and 64 characters"
    ))]
    pub user_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    pub employee_id: Option<Uuid>,
    pub role_id: Option<Uuid>,
    pub job_title_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEmployee {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    pub email: String,
    pub document: String,
    pub date_of_birth: NaiveDate,
    #[validate(length(min = 1, message = "At least one phone number is required"))]
    pub phones: Vec<String>,
    pub department_id: Uuid,
    pub job_title_id: Option<Uuid>,
    pub manager_id: Option<Uuid>,
}

/// Partial employee update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEmployee {
    #[validate(length(min = 1, message = "First name cannot be blank"))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, message = "Last name cannot be blank"))]
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub document: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub department_id: Option<Uuid>,
    /// `Some(None)` clears the job title
    pub job_title_id: Option<Option<Uuid>>,
    /// `Some(None)` clears the manager
    pub manager_id: Option<Option<Uuid>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateDepartment {
    #[validate(length(min = 1, message = "Department name is required"))]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateDepartment {
    #[validate(length(min = 1, message = "Department name cannot be blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateJobTitle {
    #[validate(length(min = 1, message = "Job title name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub level: HierarchicalRole,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateJobTitle {
    #[validate(length(min = 1, message = "Job title name cannot be blank"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub level: Option<HierarchicalRole>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateRole {
    #[validate(length(min = 1, message = "Role name is required"))]
    pub name: String,
    pub description: Option<String>,
    pub level: HierarchicalRole,
    /// Granted on top of the level's defaults
    #[serde(default)]
    pub permissions: Vec<String>,
}
