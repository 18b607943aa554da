//! Role repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Entity, Role};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Role repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    async fn insert(&self, role: Role) -> AppResult<Role>;

    async fn update(&self, role: Role) -> AppResult<Role>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// All roles, highest level first
    async fn list(&self) -> AppResult<Vec<Role>>;
}

/// In-memory implementation of RoleRepository
#[derive(Default)]
pub struct InMemoryRoleStore {
    rows: RwLock<HashMap<Uuid, Role>>,
}

impl InMemoryRoleStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unique(rows: &HashMap<Uuid, Role>, role: &Role) -> AppResult<()> {
        let name = role.name().to_lowercase();
        if rows
            .values()
            .any(|r| r.id() != role.id() && r.name().to_lowercase() == name)
        {
            return Err(AppError::conflict("Role"));
        }
        Ok(())
    }
}

#[async_trait]
impl RoleRepository for InMemoryRoleStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Role>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let name = name.trim().to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows.values().find(|r| r.name().to_lowercase() == name).cloned())
    }

    async fn insert(&self, role: Role) -> AppResult<Role> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&role.id()) {
            return Err(AppError::conflict("Role"));
        }
        Self::ensure_unique(&rows, &role)?;
        rows.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn update(&self, role: Role) -> AppResult<Role> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&role.id()) {
            return Err(AppError::NotFound);
        }
        Self::ensure_unique(&rows, &role)?;
        rows.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn list(&self) -> AppResult<Vec<Role>> {
        let rows = self.rows.read().await;
        let mut roles: Vec<Role> = rows.values().cloned().collect();
        roles.sort_by_cached_key(|r| (std::cmp::Reverse(r.level()), r.name().to_lowercase()));
        Ok(roles)
    }
}
