//! Job title aggregate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::entity::{normalize_name, normalize_optional, Entity, Timestamps};
use crate::error::DomainResult;
use crate::hierarchical_role::HierarchicalRole;

/// A position an employee or account can hold, ranked by hierarchical level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobTitle {
    id: Uuid,
    name: String,
    description: Option<String>,
    level: HierarchicalRole,
    #[serde(flatten)]
    timestamps: Timestamps,
}

impl JobTitle {
    pub fn create(
        name: &str,
        description: Option<String>,
        level: HierarchicalRole,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            name: normalize_name("Job title name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?,
            description: normalize_optional(description),
            level,
            timestamps: Timestamps::now(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn level(&self) -> HierarchicalRole {
        self.level
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = normalize_name("Job title name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = normalize_optional(description);
        self.timestamps.touch();
    }

    pub fn change_level(&mut self, level: HierarchicalRole) {
        if self.level != level {
            self.level = level;
            self.timestamps.touch();
        }
    }
}

impl Entity for JobTitle {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
