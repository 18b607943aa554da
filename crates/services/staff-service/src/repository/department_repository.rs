//! Department repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{paginate, Department, DepartmentFilter, Entity, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Department repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait DepartmentRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>>;

    /// Case-insensitive lookup by name
    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>>;

    async fn insert(&self, department: Department) -> AppResult<Department>;

    async fn update(&self, department: Department) -> AppResult<Department>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    async fn search(
        &self,
        filter: &DepartmentFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Department>, u64)>;
}

/// In-memory implementation of DepartmentRepository
#[derive(Default)]
pub struct InMemoryDepartmentStore {
    rows: RwLock<HashMap<Uuid, Department>>,
}

impl InMemoryDepartmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn ensure_unique(rows: &HashMap<Uuid, Department>, department: &Department) -> AppResult<()> {
        let name = department.name().to_lowercase();
        if rows
            .values()
            .any(|d| d.id() != department.id() && d.name().to_lowercase() == name)
        {
            return Err(AppError::conflict("Department"));
        }
        Ok(())
    }
}

#[async_trait]
impl DepartmentRepository for InMemoryDepartmentStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Department>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Option<Department>> {
        let name = name.trim().to_lowercase();
        let rows = self.rows.read().await;
        Ok(rows.values().find(|d| d.name().to_lowercase() == name).cloned())
    }

    async fn insert(&self, department: Department) -> AppResult<Department> {
        let mut rows = self.rows.write().await;
        if rows.contains_key(&department.id()) {
            return Err(AppError::conflict("Department"));
        }
        Self::ensure_unique(&rows, &department)?;
        rows.insert(department.id(), department.clone());
        Ok(department)
    }

    async fn update(&self, department: Department) -> AppResult<Department> {
        let mut rows = self.rows.write().await;
        if !rows.contains_key(&department.id()) {
            return Err(AppError::NotFound);
        }
        Self::ensure_unique(&rows, &department)?;
        rows.insert(department.id(), department.clone());
        Ok(department)
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn search(
        &self,
        filter: &DepartmentFilter,
        page: PageRequest,
    ) -> AppResult<(Vec<Department>, u64)> {
        let rows = self.rows.read().await;
        let mut matches: Vec<Department> =
            rows.values().filter(|d| filter.matches(d)).cloned().collect();
        matches.sort_by_cached_key(|d| (d.name().to_lowercase(), d.created_at(), d.id()));
        Ok(paginate(matches, &page))
    }
}
