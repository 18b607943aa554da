//! Domain-level errors.
//!
//! These errors represent value-object format failures and entity invariant
//! violations. They are independent of infrastructure concerns.
//!
//! Messages are part of the contract: callers and tests match on stable
//! substrings such as `"Invalid email format"`, so the format, range and
//! invariant variants display their message verbatim.

use thiserror::Error;

/// Domain-specific errors for business rule violations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value object rejected its raw input
    #[error("{0}")]
    InvalidFormat(String),

    /// A value is well-formed but outside the accepted range
    #[error("{0}")]
    OutOfRange(String),

    /// An entity mutation would break one of its invariants
    #[error("{0}")]
    InvariantViolation(String),

    /// Validation failed for a field or input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password-related errors
    #[error("Password error: {0}")]
    Password(String),

    /// Entity not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity already exists (conflict)
    #[error("{0} already exists")]
    Conflict(String),

    /// Internal domain error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DomainError {
    /// Create a format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        DomainError::InvalidFormat(msg.into())
    }

    /// Create an out-of-range error
    pub fn out_of_range(msg: impl Into<String>) -> Self {
        DomainError::OutOfRange(msg.into())
    }

    /// Create an invariant violation
    pub fn invariant(msg: impl Into<String>) -> Self {
        DomainError::InvariantViolation(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        DomainError::Validation(msg.into())
    }

    /// Create a password error
    pub fn password(msg: impl Into<String>) -> Self {
        DomainError::Password(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>) -> Self {
        DomainError::NotFound(entity.into())
    }

    /// Create a conflict error
    pub fn conflict(entity: impl Into<String>) -> Self {
        DomainError::Conflict(entity.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        DomainError::Internal(msg.into())
    }
}

/// Result type alias for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_errors_display_message_verbatim() {
        let err = DomainError::invalid_format("Invalid email format: missing '@'");
        assert_eq!(err.to_string(), "Invalid email format: missing '@'");
    }

    #[test]
    fn test_conflict_display() {
        assert_eq!(DomainError::conflict("Phone").to_string(), "Phone already exists");
    }
}
