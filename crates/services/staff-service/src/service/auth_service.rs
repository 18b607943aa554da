//! Authentication service - registration, login with lockout, token checks.

use async_trait::async_trait;
use chrono::Duration;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, LockoutConfig, OptionExt};
use domain::{Entity, Password, UserAccount};

use super::token_service::{IssuedToken, TokenService};
use crate::dto::{validate_request, RegisterAccount};
use crate::repository::UserAccountRepository;

// Verified against when the user name is unknown so both paths pay for an
// Argon2 computation.
static DUMMY_PASSWORD: Lazy<Option<Password>> =
    Lazy::new(|| Password::new("dummy-password-for-timing").ok());

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account with a freshly hashed password
    async fn register(&self, request: RegisterAccount) -> AppResult<UserAccount>;

    /// Check credentials against the lockout policy and issue a token
    async fn authenticate(&self, user_name: &str, password: &str) -> AppResult<IssuedToken>;

    /// Resolve a token to its account, rejecting stale or blocked ones
    async fn validate_token(&self, token: &str) -> AppResult<UserAccount>;

    /// Replace the password, invalidating previously issued tokens
    async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<UserAccount>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator {
    accounts: Arc<dyn UserAccountRepository>,
    tokens: Arc<dyn TokenService>,
    lockout: LockoutConfig,
}

impl Authenticator {
    pub fn new(
        accounts: Arc<dyn UserAccountRepository>,
        tokens: Arc<dyn TokenService>,
        lockout: LockoutConfig,
    ) -> Self {
        Self {
            accounts,
            tokens,
            lockout,
        }
    }

    fn lockout_duration(&self) -> Duration {
        Duration::minutes(self.lockout.lockout_minutes)
    }
}

#[async_trait]
impl AuthService for Authenticator {
    async fn register(&self, request: RegisterAccount) -> AppResult<UserAccount> {
        validate_request(&request)?;

        let user_name = UserAccount::normalize_user_name(&request.user_name)?;
        if self.accounts.find_by_user_name(&user_name).await?.is_some() {
            return Err(AppError::conflict("User name"));
        }

        let password = Password::new(&request.password)?;
        let account = UserAccount::create(
            &user_name,
            password.into_string(),
            request.employee_id,
            request.role_id,
            request.job_title_id,
        )?;

        let account = self.accounts.insert(account).await?;
        info!(account_id = %account.id(), user_name = %account.user_name(), "Account registered");
        Ok(account)
    }

    async fn authenticate(&self, user_name: &str, password: &str) -> AppResult<IssuedToken> {
        let account = match UserAccount::normalize_user_name(user_name) {
            Ok(normalized) => self.accounts.find_by_user_name(&normalized).await?,
            Err(_) => None,
        };

        let Some(mut account) = account else {
            // SECURITY: verify anyway so unknown names cost the same time
            if let Some(dummy) = DUMMY_PASSWORD.as_ref() {
                dummy.verify(password);
            }
            warn!("Login failed for unknown user name");
            return Err(AppError::InvalidCredentials);
        };

        if !account.is_active() {
            warn!(account_id = %account.id(), "Login refused: account inactive");
            return Err(AppError::AccountInactive);
        }
        if account.is_locked_out() {
            warn!(account_id = %account.id(), "Login refused: account locked");
            return Err(AppError::AccountLocked);
        }

        if !Password::from_hash(account.password_hash()).verify(password) {
            account.record_failed_login_attempt(
                self.lockout.max_failed_attempts,
                self.lockout_duration(),
            );
            let account = self.accounts.update(account).await?;

            if account.is_locked_out() {
                info!(
                    account_id = %account.id(),
                    failed_attempts = account.access_failed_count(),
                    "Account locked after repeated failed logins"
                );
                return Err(AppError::AccountLocked);
            }
            warn!(
                account_id = %account.id(),
                failed_attempts = account.access_failed_count(),
                "Login failed: wrong password"
            );
            return Err(AppError::InvalidCredentials);
        }

        account.reset_failures_after_successful_login();
        account.record_login();
        let account = self.accounts.update(account).await?;

        info!(account_id = %account.id(), "Login succeeded");
        self.tokens.issue(&account)
    }

    async fn validate_token(&self, token: &str) -> AppResult<UserAccount> {
        let claims = self.tokens.decode(token)?;

        let account = self
            .accounts
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if account.security_stamp() != claims.sstamp {
            return Err(AppError::Unauthorized);
        }
        if !account.is_active() || account.is_locked_out() {
            return Err(AppError::Unauthorized);
        }

        Ok(account)
    }

    async fn change_password(
        &self,
        account_id: Uuid,
        current_password: &str,
        new_password: &str,
    ) -> AppResult<UserAccount> {
        let mut account = self
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or_not_found()?;

        if !Password::from_hash(account.password_hash()).verify(current_password) {
            return Err(AppError::InvalidCredentials);
        }

        let password = Password::new(new_password)?;
        account.set_password_hash(password.into_string())?;
        let account = self.accounts.update(account).await?;

        info!(account_id = %account.id(), "Password changed");
        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockUserAccountRepository;
    use crate::service::token_service::{MockTokenService, TokenClaims};
    use mockall::predicate::eq;

    fn stored_account(password: &str) -> UserAccount {
        let hash = Password::new(password).unwrap().into_string();
        UserAccount::create("joana", hash, None, None, None).unwrap()
    }

    fn issued() -> IssuedToken {
        IssuedToken {
            access_token: "token".into(),
            token_type: "Bearer".into(),
            expires_in: 3600,
        }
    }

    fn service(repo: MockUserAccountRepository, tokens: MockTokenService) -> Authenticator {
        Authenticator::new(Arc::new(repo), Arc::new(tokens), LockoutConfig::default())
    }

    #[tokio::test]
    async fn test_authenticate_success_resets_failures() {
        let mut account = stored_account("CorrectHorse1");
        account.record_failed_login_attempt(5, Duration::minutes(15));

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name()
            .with(eq("joana"))
            .returning(move |_| Ok(Some(account.clone())));
        repo.expect_update()
            .withf(|a| a.access_failed_count() == 0 && a.last_login_at().is_some())
            .times(1)
            .returning(Ok);

        let mut tokens = MockTokenService::new();
        tokens.expect_issue().times(1).returning(|_| Ok(issued()));

        let result = service(repo, tokens).authenticate("  JOANA ", "CorrectHorse1").await;
        assert_eq!(result.unwrap().access_token, "token");
    }

    #[tokio::test]
    async fn test_unknown_user_is_invalid_credentials() {
        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name().returning(|_| Ok(None));
        repo.expect_update().never();

        let result = service(repo, MockTokenService::new())
            .authenticate("nobody", "whatever123")
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_wrong_password_records_failure() {
        let account = stored_account("CorrectHorse1");

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name()
            .returning(move |_| Ok(Some(account.clone())));
        repo.expect_update()
            .withf(|a| a.access_failed_count() == 1 && !a.is_locked_out())
            .times(1)
            .returning(Ok);

        let result = service(repo, MockTokenService::new())
            .authenticate("joana", "wrong-password")
            .await;
        assert!(matches!(result, Err(AppError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_final_failure_reports_lockout() {
        let mut account = stored_account("CorrectHorse1");
        for _ in 0..4 {
            account.record_failed_login_attempt(5, Duration::minutes(15));
        }

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name()
            .returning(move |_| Ok(Some(account.clone())));
        repo.expect_update().times(1).returning(Ok);

        let result = service(repo, MockTokenService::new())
            .authenticate("joana", "wrong-password")
            .await;
        assert!(matches!(result, Err(AppError::AccountLocked)));
    }

    #[tokio::test]
    async fn test_locked_account_skips_password_check() {
        let mut account = stored_account("CorrectHorse1");
        account.record_failed_login_attempt(1, Duration::minutes(15));

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name()
            .returning(move |_| Ok(Some(account.clone())));
        repo.expect_update().never();

        let result = service(repo, MockTokenService::new())
            .authenticate("joana", "CorrectHorse1")
            .await;
        assert!(matches!(result, Err(AppError::AccountLocked)));
    }

    #[tokio::test]
    async fn test_inactive_account_refused() {
        let mut account = stored_account("CorrectHorse1");
        account.deactivate();

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name()
            .returning(move |_| Ok(Some(account.clone())));

        let result = service(repo, MockTokenService::new())
            .authenticate("joana", "CorrectHorse1")
            .await;
        assert!(matches!(result, Err(AppError::AccountInactive)));
    }

    #[tokio::test]
    async fn test_register_conflict() {
        let existing = stored_account("CorrectHorse1");

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_user_name()
            .returning(move |_| Ok(Some(existing.clone())));
        repo.expect_insert().never();

        let request = RegisterAccount {
            user_name: "Joana".into(),
            password: "AnotherPass1".into(),
            employee_id: None,
            role_id: None,
            job_title_id: None,
        };
        let result = service(repo, MockTokenService::new()).register(request).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_validate_token_rejects_stale_stamp() {
        let account = stored_account("CorrectHorse1");
        let account_id = account.id();

        let mut repo = MockUserAccountRepository::new();
        repo.expect_find_by_id()
            .with(eq(account_id))
            .returning(move |_| Ok(Some(account.clone())));

        let mut tokens = MockTokenService::new();
        tokens.expect_decode().returning(move |_| {
            Ok(TokenClaims {
                sub: account_id,
                name: "joana".into(),
                sstamp: "OLD-STAMP".into(),
                role: None,
                iat: 0,
                exp: i64::MAX,
                iss: "staff-service".into(),
            })
        });

        let result = service(repo, tokens).validate_token("token").await;
        assert!(matches!(result, Err(AppError::Unauthorized)));
    }
}
