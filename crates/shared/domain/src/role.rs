//! Role aggregate: a named bundle of permissions at a hierarchical level.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_NAME_LENGTH, MIN_NAME_LENGTH};
use crate::entity::{normalize_name, normalize_optional, Entity, Timestamps};
use crate::error::{DomainError, DomainResult};
use crate::hierarchical_role::HierarchicalRole;

/// Role aggregate.
///
/// Permission names are stored trimmed and lowercased, so membership is
/// case-insensitive and duplicates collapse.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    id: Uuid,
    name: String,
    description: Option<String>,
    level: HierarchicalRole,
    permissions: BTreeSet<String>,
    #[serde(flatten)]
    timestamps: Timestamps,
}

impl Role {
    /// Create a role seeded with the default permissions of `level`.
    pub fn create(
        name: &str,
        description: Option<String>,
        level: HierarchicalRole,
    ) -> DomainResult<Self> {
        let name = normalize_name("Role name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
        let permissions = level
            .default_permissions()
            .iter()
            .map(|p| p.to_string())
            .collect();

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: normalize_optional(description),
            level,
            permissions,
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

    pub fn permissions(&self) -> impl Iterator<Item = &str> {
        self.permissions.iter().map(String::as_str)
    }

    pub fn rename(&mut self, name: &str) -> DomainResult<()> {
        self.name = normalize_name("Role name", name, MIN_NAME_LENGTH, MAX_NAME_LENGTH)?;
        self.timestamps.touch();
        Ok(())
    }

    pub fn update_description(&mut self, description: Option<String>) {
        self.description = normalize_optional(description);
        self.timestamps.touch();
    }

    /// Move the role to another tier. Explicit permissions are kept.
    pub fn change_level(&mut self, level: HierarchicalRole) {
        if self.level != level {
            self.level = level;
            self.timestamps.touch();
        }
    }

    /// Grant a permission. Re-adding an existing one still stamps `updated_at`.
    pub fn add_permission(&mut self, permission: &str) -> DomainResult<()> {
        let permission = normalize_permission(permission)?;
        self.permissions.insert(permission);
        self.timestamps.touch();
        Ok(())
    }

    /// Revoke a permission; absent permissions are a no-op.
    pub fn remove_permission(&mut self, permission: &str) {
        let key = permission.trim().to_lowercase();
        if self.permissions.remove(&key) {
            self.timestamps.touch();
        }
    }

    /// SuperUser roles hold every permission.
    pub fn has_permission(&self, permission: &str) -> bool {
        self.level.is_super_user() || self.permissions.contains(&permission.trim().to_lowercase())
    }
}

fn normalize_permission(permission: &str) -> DomainResult<String> {
    let permission = permission.trim().to_lowercase();
    if permission.is_empty() {
        return Err(DomainError::validation("Permission cannot be empty"));
    }
    Ok(permission)
}

impl Entity for Role {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
