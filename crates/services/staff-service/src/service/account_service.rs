//! Account administration - activation, unlock, 2FA and role links.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use common::{AppError, AppResult, OptionExt};
use domain::UserAccount;

use crate::repository::{RoleRepository, UserAccountRepository};

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn get_account(&self, id: Uuid) -> AppResult<UserAccount>;

    async fn activate(&self, id: Uuid) -> AppResult<UserAccount>;

    async fn deactivate(&self, id: Uuid) -> AppResult<UserAccount>;

    /// Lift a lockout and clear the failure counter
    async fn unlock(&self, id: Uuid) -> AppResult<UserAccount>;

    async fn enable_two_factor(&self, id: Uuid, secret: &str) -> AppResult<UserAccount>;

    async fn disable_two_factor(&self, id: Uuid) -> AppResult<UserAccount>;

    /// Link a role (must exist) or clear it with `None`
    async fn assign_role(&self, id: Uuid, role_id: Option<Uuid>) -> AppResult<UserAccount>;

    async fn delete_account(&self, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of AccountService using repositories.
pub struct AccountManager {
    accounts: Arc<dyn UserAccountRepository>,
    roles: Arc<dyn RoleRepository>,
}

impl AccountManager {
    pub fn new(accounts: Arc<dyn UserAccountRepository>, roles: Arc<dyn RoleRepository>) -> Self {
        Self { accounts, roles }
    }

    async fn load(&self, id: Uuid) -> AppResult<UserAccount> {
        self.accounts
            .find_by_id(id)
            .await?
            .ok_or_not_found()
    }

    /// Load, mutate and persist in one step.
    async fn modify<F>(&self, id: Uuid, change: F) -> AppResult<UserAccount>
    where
        F: FnOnce(&mut UserAccount) -> AppResult<()> + Send,
    {
        let mut account = self.load(id).await?;
        change(&mut account)?;
        self.accounts.update(account).await
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn get_account(&self, id: Uuid) -> AppResult<UserAccount> {
        self.load(id).await
    }

    async fn activate(&self, id: Uuid) -> AppResult<UserAccount> {
        self.modify(id, |account| {
            account.activate();
            Ok(())
        })
        .await
    }

    async fn deactivate(&self, id: Uuid) -> AppResult<UserAccount> {
        let account = self
            .modify(id, |account| {
                account.deactivate();
                Ok(())
            })
            .await?;
        info!(account_id = %id, "Account deactivated");
        Ok(account)
    }

    async fn unlock(&self, id: Uuid) -> AppResult<UserAccount> {
        let account = self
            .modify(id, |account| {
                account.unlock_now();
                Ok(())
            })
            .await?;
        info!(account_id = %id, "Account unlocked");
        Ok(account)
    }

    async fn enable_two_factor(&self, id: Uuid, secret: &str) -> AppResult<UserAccount> {
        let secret = secret.to_string();
        self.modify(id, move |account| {
            account.enable_two_factor(&secret)?;
            Ok(())
        })
        .await
    }

    async fn disable_two_factor(&self, id: Uuid) -> AppResult<UserAccount> {
        self.modify(id, |account| {
            account.disable_two_factor();
            Ok(())
        })
        .await
    }

    async fn assign_role(&self, id: Uuid, role_id: Option<Uuid>) -> AppResult<UserAccount> {
        if let Some(role_id) = role_id {
            if self.roles.find_by_id(role_id).await?.is_none() {
                return Err(AppError::validation("Role does not exist"));
            }
        }
        self.modify(id, |account| {
            account.assign_role(role_id);
            Ok(())
        })
        .await
    }

    async fn delete_account(&self, id: Uuid) -> AppResult<()> {
        self.accounts.delete(id).await?;
        info!(account_id = %id, "Account deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{MockRoleRepository, MockUserAccountRepository};
    use chrono::Duration;
    use domain::Entity;

    fn account() -> UserAccount {
        UserAccount::create("pedro", "hash", None, None, None).unwrap()
    }

    #[tokio::test]
    async fn test_unlock_clears_lockout() {
        let mut locked = account();
        locked.record_failed_login_attempt(1, Duration::minutes(15));
        let id = locked.id();

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(locked.clone())));
        repo.expect_update().times(1).returning(Ok);

        let service = AccountManager::new(Arc::new(repo), Arc::new(MockRoleRepository::new()));
        let account = service.unlock(id).await.unwrap();
        assert!(!account.is_locked_out());
        assert_eq!(account.access_failed_count(), 0);
    }

    #[tokio::test]
    async fn test_assign_missing_role() {
        let mut roles = MockRoleRepository::new();
        roles.expect_find_by_id().returning(|_| Ok(None));
        let mut repo = MockUserAccountRepository::new();
        repo.expect_update().never();

        let service = AccountManager::new(Arc::new(repo), Arc::new(roles));
        let result = service.assign_role(Uuid::new_v4(), Some(Uuid::new_v4())).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_missing_account() {
        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = AccountManager::new(Arc::new(repo), Arc::new(MockRoleRepository::new()));
        assert!(matches!(
            service.deactivate(Uuid::new_v4()).await,
            Err(AppError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_enable_two_factor_rejects_blank_secret() {
        let stored = account();
        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_id()
            .returning(move |_| Ok(Some(stored.clone())));
        repo.expect_update().never();

        let service = AccountManager::new(Arc::new(repo), Arc::new(MockRoleRepository::new()));
        let result = service.enable_two_factor(Uuid::new_v4(), "  ").await;
        assert!(matches!(result, Err(AppError::Validation(_))));
    }
}
