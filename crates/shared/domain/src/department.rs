//! Department aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::entity::{normalize_name, normalize_optional, Entity, Timestamps};
use crate::error::DomainResult;

/// Organizational unit employees belong to.
///
/// New departments are active. `activate`/`deactivate` only stamp
/// `updated_at` when the flag actually flips.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Department {
    id: Uuid,
    name: String,
    description: Option<String>,
    is_active: bool,
    #[serde(flatten)]
    timestamps: Timestamps,
}

impl Department {
    pub fn create(name: &str, description: Option<String>) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name("Department name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?,
            description: normalize_optional(description),
            is_active: true,
            timestamps: Timestamps::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = normalize_name("Department name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = normalize_optional(description);
        self.timestamps.touch();
    }

    pub fn activate(&mut self) {
        if !self.is_active {
            self.is_active = true;
            self.timestamps.touch();
        }
    }

    pub fn deactivate(&mut self) {
        if self.is_active {
            self.is_active = false;
            self.timestamps.touch();
        }
    }
}

impl Entity for Department {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pause() {
        std::thread::sleep(std::time::Duration::from_millis(2));
    }

    #[test]
    fn test_create_department() {
        let department = Department::create("  Engineering ", Some("   ".into())).unwrap();
        assert_eq!(department.name(), "Engineering");
        assert_eq!(department.description(), None);
        assert!(department.is_active());
    }

    #[test]
    fn test_name_too_short() {
        let err = Department::create("X", None).unwrap_err();
        assert!(err.to_string().contains("Department name must be at least 2 characters"));
    }

    #[test]
    fn test_deactivate_twice_keeps_timestamp() {
        let mut department = Department::create("Finance", None).unwrap();
        pause();
        department.deactivate();
        let first = department.updated_at();
        assert!(first > department.created_at());
        pause();
        department.deactivate();
        assert_eq!(department.updated_at(), first);
        assert!(!department.is_active());
    }

    #[test]
    fn test_activate_twice_keeps_timestamp() {
        let mut department = Department::create("Finance", None).unwrap();
        department.deactivate();
        pause();
        department.activate();
        let first = department.updated_at();
        pause();
        department.activate();
        assert_eq!(department.updated_at(), first);
        assert!(department.is_active());
    }
}
