//! Ranked roles and their default permission sets.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Permission names granted by the hierarchical roles.
pub mod permissions {
    pub const EMPLOYEES_READ: &str = "employees.read";
    pub const EMPLOYEES_CREATE: &str = "employees.create";
    pub const EMPLOYEES_UPDATE: &str = "employees.update";
    pub const EMPLOYEES_DELETE: &str = "employees.delete";

    pub const DEPARTMENTS_READ: &str = "departments.read";
    pub const DEPARTMENTS_CREATE: &str = "departments.create";
    pub const DEPARTMENTS_UPDATE: &str = "departments.update";
    pub const DEPARTMENTS_DELETE: &str = "departments.delete";

    pub const JOB_TITLES_READ: &str = "job_titles.read";
    pub const JOB_TITLES_CREATE: &str = "job_titles.create";
    pub const JOB_TITLES_UPDATE: &str = "job_titles.update";
    pub const JOB_TITLES_DELETE: &str = "job_titles.delete";

    pub const ROLES_READ: &str = "roles.read";
    pub const ROLES_CREATE: &str = "roles.create";
    pub const ROLES_UPDATE: &str = "roles.update";
    pub const ROLES_DELETE: &str = "roles.delete";

    pub const USERS_MANAGE: &str = "users.manage";

    pub const SYSTEM_ADMIN: &str = "system.admin";
    pub const SYSTEM_SETTINGS: &str = "system.settings";
    pub const SYSTEM_AUDIT: &str = "system.audit";
}

use permissions::*;

const JUNIOR: &[&str] = &[EMPLOYEES_READ, DEPARTMENTS_READ, JOB_TITLES_READ];

const PLENO: &[&str] = &[
    EMPLOYEES_READ,
    DEPARTMENTS_READ,
    JOB_TITLES_READ,
    EMPLOYEES_CREATE,
    EMPLOYEES_UPDATE,
];

const SENIOR: &[&str] = &[
    EMPLOYEES_READ,
    DEPARTMENTS_READ,
    JOB_TITLES_READ,
    EMPLOYEES_CREATE,
    EMPLOYEES_UPDATE,
    DEPARTMENTS_CREATE,
    DEPARTMENTS_UPDATE,
    JOB_TITLES_CREATE,
    JOB_TITLES_UPDATE,
];

const MANAGER: &[&str] = &[
    EMPLOYEES_READ,
    DEPARTMENTS_READ,
    JOB_TITLES_READ,
    EMPLOYEES_CREATE,
    EMPLOYEES_UPDATE,
    DEPARTMENTS_CREATE,
    DEPARTMENTS_UPDATE,
    JOB_TITLES_CREATE,
    JOB_TITLES_UPDATE,
    EMPLOYEES_DELETE,
    ROLES_READ,
    ROLES_CREATE,
];

const DIRECTOR: &[&str] = &[
    EMPLOYEES_READ,
    DEPARTMENTS_READ,
    JOB_TITLES_READ,
    EMPLOYEES_CREATE,
    EMPLOYEES_UPDATE,
    DEPARTMENTS_CREATE,
    DEPARTMENTS_UPDATE,
    JOB_TITLES_CREATE,
    JOB_TITLES_UPDATE,
    EMPLOYEES_DELETE,
    ROLES_READ,
    ROLES_CREATE,
    DEPARTMENTS_DELETE,
    JOB_TITLES_DELETE,
    ROLES_UPDATE,
    ROLES_DELETE,
    USERS_MANAGE,
];

const SUPER_USER: &[&str] = &[
    EMPLOYEES_READ,
    DEPARTMENTS_READ,
    JOB_TITLES_READ,
    EMPLOYEES_CREATE,
    EMPLOYEES_UPDATE,
    DEPARTMENTS_CREATE,
    DEPARTMENTS_UPDATE,
    JOB_TITLES_CREATE,
    JOB_TITLES_UPDATE,
    EMPLOYEES_DELETE,
    ROLES_READ,
    ROLES_CREATE,
    DEPARTMENTS_DELETE,
    JOB_TITLES_DELETE,
    ROLES_UPDATE,
    ROLES_DELETE,
    USERS_MANAGE,
    SYSTEM_ADMIN,
    SYSTEM_SETTINGS,
    SYSTEM_AUDIT,
];

/// Fallback for numeric levels that map to no role.
const READ_ONLY: &[&str] = &[EMPLOYEES_READ];

/// Ranked role tier.
///
/// The numeric level orders the tiers; a creator may create roles at or below
/// its own level, and `SuperUser` may create anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum HierarchicalRole {
    Junior = 1,
    Pleno = 2,
    Senior = 3,
    Manager = 4,
    Director = 5,
    SuperUser = 999,
}

impl HierarchicalRole {
    pub const ALL: [HierarchicalRole; 6] = [
        HierarchicalRole::Junior,
        HierarchicalRole::Pleno,
        HierarchicalRole::Senior,
        HierarchicalRole::Manager,
        HierarchicalRole::Director,
        HierarchicalRole::SuperUser,
    ];

    /// Numeric rank.
    pub fn level(self) -> i32 {
        self as i32
    }

    pub fn from_level(level: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.level() == level)
    }

    pub fn is_super_user(self) -> bool {
        self == HierarchicalRole::SuperUser
    }

    /// Whether a holder of `self` may create a role of tier `target`.
    pub fn can_create_role(self, target: HierarchicalRole) -> bool {
        self.is_super_user() || self.level() >= target.level()
    }

    /// Permissions a role of this tier starts with.
    pub fn default_permissions(self) -> &'static [&'static str] {
        match self {
            HierarchicalRole::Junior => JUNIOR,
            HierarchicalRole::Pleno => PLENO,
            HierarchicalRole::Senior => SENIOR,
            HierarchicalRole::Manager => MANAGER,
            HierarchicalRole::Director => DIRECTOR,
            HierarchicalRole::SuperUser => SUPER_USER,
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            HierarchicalRole::Junior => "Junior",
            HierarchicalRole::Pleno => "Pleno",
            HierarchicalRole::Senior => "Senior",
            HierarchicalRole::Manager => "Manager",
            HierarchicalRole::Director => "Director",
            HierarchicalRole::SuperUser => "Super User",
        }
    }
}

/// Default permissions for a raw numeric level; unknown levels get read-only.
pub fn default_permissions_for_level(level: i32) -> &'static [&'static str] {
    HierarchicalRole::from_level(level)
        .map(HierarchicalRole::default_permissions)
        .unwrap_or(READ_ONLY)
}

impl fmt::Display for HierarchicalRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl TryFrom<i32> for HierarchicalRole {
    type Error = DomainError;

    fn try_from(value: i32) -> DomainResult<Self> {
        Self::from_level(value).ok_or_else(|| {
            DomainError::invalid_format(format!("Unknown hierarchical role level: {}", value))
        })
    }
}

impl From<HierarchicalRole> for i32 {
    fn from(role: HierarchicalRole) -> Self {
        role.level()
    }
}
