//! User account repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use common::{AppError, AppResult};
use domain::{Entity, UserAccount};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// User account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait UserAccountRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserAccount>>;

    /// Lookup by normalized (lowercase) user name
    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<UserAccount>>;

    async fn insert(&self, account: UserAccount) -> AppResult<UserAccount>;

    async fn update(&self, account: UserAccount) -> AppResult<UserAccount>;

    async fn delete(&self, id: Uuid) -> AppResult<()>;

    /// Accounts currently holding a role
    async fn count_by_role(&self, role_id: Uuid) -> AppResult<u64>;

    /// Accounts carrying a job title
    async fn count_by_job_title(&self, job_title_id: Uuid) -> AppResult<u64>;

    /// Accounts linked to an employee record
    async fn count_by_employee(&self, employee_id: Uuid) -> AppResult<u64>;
}

/// In-memory implementation of UserAccountRepository
#[derive(Default)]
pub struct InMemoryUserAccountStore {
    rows: RwLock<HashMap<Uuid, UserAccount>>,
}

impl InMemoryUserAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserAccountRepository for InMemoryUserAccountStore {
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<UserAccount>> {
        Ok(self.rows.read().await.get(&id).cloned())
    }

    async fn find_by_user_name(&self, user_name: &str) -> AppResult<Option<UserAccount>> {
        let rows = self.rows.read().await;
        Ok(rows.values().find(|a| a.user_name() == user_name).cloned())
    }

    async fn insert(&self, account: UserAccount) -> AppResult<UserAccount> {
        let mut rows = self.rows.write().await;
        if rows
            .values()
            .any(|a| a.id() == account.id() || a.user_name() == account.user_name())
        {
            return Err(AppError::conflict("User name"));
        }
        rows.insert(account.id(), account.clone());
        Ok(account)
    }

    async fn update(&self, account: UserAccount) -> AppResult<UserAccount> {
        let mut rows = self.rows.write().await;
        match rows.get_mut(&account.id()) {
            Some(existing) => {
                *existing = account.clone();
                Ok(account)
            }
            None => Err(AppError::NotFound),
        }
    }

    async fn delete(&self, id: Uuid) -> AppResult<()> {
        self.rows
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(AppError::NotFound)
    }

    async fn count_by_role(&self, role_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|a| a.role_id() == Some(role_id)).count() as u64)
    }

    async fn count_by_job_title(&self, job_title_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|a| a.job_title_id() == Some(job_title_id)).count() as u64)
    }

    async fn count_by_employee(&self, employee_id: Uuid) -> AppResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.values().filter(|a| a.employee_id() == Some(employee_id)).count() as u64)
    }
}
