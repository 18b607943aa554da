//! Identity and audit timestamps shared by all aggregates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Entity marker: identity survives state changes.
pub trait Entity {
    fn id(&self) -> Uuid;

    fn timestamps(&self) -> &Timestamps;

    fn created_at(&self) -> DateTime<Utc> {
        self.timestamps().created_at
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.timestamps().updated_at
    }
}

/// Creation and last-modification instants.
///
/// Mutators call [`Timestamps::touch`] only when state actually changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Default for Timestamps {
    fn default() -> Self {
        Self::now()
    }
}

/// Trim `value` and check its character count against the name rules.
pub(crate) fn normalize_name(
    field: &str,
    value: &str,
    min: usize,
    max: usize,
) -> crate::DomainResult<String> {
    let trimmed = value.trim();
    let len = trimmed.chars().count();
    if len < min {
        return Err(crate::DomainError::validation(format!(
            "{} must be at least {} characters",
            field, min
        )));
    }
    if len > max {
        return Err(crate::DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, turning blanks into `None`.
pub(crate) fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_touch_moves_updated_at_only() {
        let mut ts = Timestamps::now();
        let created = ts.created_at;
        std::thread::sleep(std::time::Duration::from_millis(2));
        ts.touch();
        assert_eq!(ts.created_at, created);
        assert!(ts.updated_at > created);
    }

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("Name", "  Ana  ", 2, 10).unwrap(), "Ana");
        assert!(normalize_name("Name", " A ", 2, 10).is_err());
        assert!(normalize_name("Name", "abcdefghijk", 2, 10).is_err());
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(Some("   ".into())), None);
        assert_eq!(normalize_optional(Some(" x ".into())), Some("x".into()));
        assert_eq!(normalize_optional(None), None);
    }
}
