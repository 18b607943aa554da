//! User account aggregate: credentials, lockout and two-factor state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::{MAX_USER_NAME_LENGTH, MIN_USER_NAME_LENGTH};
use crate::entity::{Entity, Timestamps};
use crate::error::{DomainError, DomainResult};

/// Observable state of an account for the authentication flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountState {
    Active,
    LockedOut,
    Inactive,
}

/// Authentication aggregate.
///
/// # Invariants
/// - `user_name` is trimmed, lowercased and 3–64 characters long.
/// - `password_hash` is never empty.
/// - `security_stamp` changes on every password change, which invalidates
///   tokens carrying the previous stamp.
///
/// Serializes without the hash and 2FA secret, so it is output-only; stores
/// rebuild accounts through their own records.
#[derive(Clone, Serialize)]
pub struct UserAccount {
    id: Uuid,
    user_name: String,
    #[serde(skip_serializing)]
    password_hash: String,
    security_stamp: String,
    is_active: bool,
    access_failed_count: u32,
    lockout_end_utc: Option<DateTime<Utc>>,
    two_factor_enabled: bool,
    #[serde(skip_serializing)]
    two_factor_secret: Option<String>,
    password_changed_at: DateTime<Utc>,
    last_login_at: Option<DateTime<Utc>>,
    employee_id: Option<Uuid>,
    role_id: Option<Uuid>,
    job_title_id: Option<Uuid>,
    #[serde(flatten)]
    timestamps: Timestamps,
}

// Don't expose hash or 2FA secret in debug output
impl std::fmt::Debug for UserAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserAccount")
            .field("id", &self.id)
            .field("user_name", &self.user_name)
            .field("password_hash", &"[REDACTED]")
            .field("is_active", &self.is_active)
            .field("access_failed_count", &self.access_failed_count)
            .field("lockout_end_utc", &self.lockout_end_utc)
            .field("two_factor_enabled", &self.two_factor_enabled)
            .field("employee_id", &self.employee_id)
            .field("role_id", &self.role_id)
            .finish()
    }
}

impl UserAccount {
    /// Create an active, unlocked account.
    pub fn create(
        user_name: &str,
        password_hash: impl Into<String>,
        employee_id: Option<Uuid>,
        role_id: Option<Uuid>,
        job_title_id: Option<Uuid>,
    ) -> DomainResult<Self> {
        let user_name = Self::normalize_user_name(user_name)?;
        let password_hash = password_hash.into();
        if password_hash.trim().is_empty() {
            return Err(DomainError::validation("Password hash cannot be empty"));
        }

        let timestamps = Timestamps::now();
        Ok(Self {
            id: Uuid::new_v4(),
            user_name,
            password_hash,
            security_stamp: new_security_stamp(),
            is_active: true,
            access_failed_count: 0,
            lockout_end_utc: None,
            two_factor_enabled: false,
            two_factor_secret: None,
            password_changed_at: timestamps.created_at,
            last_login_at: None,
            employee_id,
            role_id,
            job_title_id,
            timestamps,
        })
    }

    /// Trim and lowercase a user name, checking its length.
    pub fn normalize_user_name(user_name: &str) -> DomainResult<String> {
        let normalized = user_name.trim().to_lowercase();
        let len = normalized.chars().count();
        if !(MIN_USER_NAME_LENGTH..=MAX_USER_NAME_LENGTH).contains(&len) {
            return Err(DomainError::validation(format!(
                "User name must be between {} and {} characters",
                MIN_USER_NAME_LENGTH, MAX_USER_NAME_LENGTH
            )));
        }
        if normalized.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("User name cannot contain whitespace"));
        }
        Ok(normalized)
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn security_stamp(&self) -> &str {
        &self.security_stamp
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn access_failed_count(&self) -> u32 {
        self.access_failed_count
    }

    pub fn lockout_end_utc(&self) -> Option<DateTime<Utc>> {
        self.lockout_end_utc
    }

    pub fn two_factor_enabled(&self) -> bool {
        self.two_factor_enabled
    }

    pub fn two_factor_secret(&self) -> Option<&str> {
        self.two_factor_secret.as_deref()
    }

    pub fn password_changed_at(&self) -> DateTime<Utc> {
        self.password_changed_at
    }

    pub fn last_login_at(&self) -> Option<DateTime<Utc>> {
        self.last_login_at
    }

    pub fn employee_id(&self) -> Option<Uuid> {
        self.employee_id
    }

    pub fn role_id(&self) -> Option<Uuid> {
        self.role_id
    }

    pub fn job_title_id(&self) -> Option<Uuid> {
        self.job_title_id
    }

    // =========================================================================
    // Lockout
    // =========================================================================

    /// Count a failed login; reaching `max_attempts` locks the account for
    /// `lockout_for`. Further failures while locked extend the lockout.
    pub fn record_failed_login_attempt(&mut self, max_attempts: u32, lockout_for: Duration) {
        self.access_failed_count = self.access_failed_count.saturating_add(1);
        if self.access_failed_count >= max_attempts {
            self.lockout_end_utc = Some(Utc::now() + lockout_for);
        }
        self.timestamps.touch();
    }

    /// Clear the failure counter. Lockout and activation are untouched.
    pub fn reset_failures_after_successful_login(&mut self) {
        if self.access_failed_count != 0 {
            self.access_failed_count = 0;
            self.timestamps.touch();
        }
    }

    pub fn record_login(&mut self) {
        self.last_login_at = Some(Utc::now());
        self.timestamps.touch();
    }

    /// Lift any lockout and clear the failure counter.
    pub fn unlock_now(&mut self) {
        self.lockout_end_utc = None;
        self.access_failed_count = 0;
        self.timestamps.touch();
    }

    pub fn is_locked_out(&self) -> bool {
        self.is_locked_out_at(Utc::now())
    }

    pub fn is_locked_out_at(&self, now: DateTime<Utc>) -> bool {
        self.lockout_end_utc.is_some_and(|end| end > now)
    }

    pub fn state(&self) -> AccountState {
        if !self.is_active {
            AccountState::Inactive
        } else if self.is_locked_out() {
            AccountState::LockedOut
        } else {
            AccountState::Active
        }
    }

    // =========================================================================
    // Credentials
    // =========================================================================

    /// Replace the password hash and rotate the security stamp.
    pub fn set_password_hash(&mut self, password_hash: impl Into<String>) -> DomainResult<()> {
        let password_hash = password_hash.into();
        if password_hash.trim().is_empty() {
            return Err(DomainError::validation("Password hash cannot be empty"));
        }
        self.password_hash = password_hash;
        self.security_stamp = new_security_stamp();
        self.password_changed_at = Utc::now();
        self.timestamps.touch();
        Ok(())
    }

    /// Rotate the stamp without changing the password (e.g. "log out everywhere").
    pub fn rotate_security_stamp(&mut self) {
        self.security_stamp = new_security_stamp();
        self.timestamps.touch();
    }

    // =========================================================================
    // Activation
    // =========================================================================

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

    // =========================================================================
    // Two-factor
    // =========================================================================

    /// Enable 2FA with `secret`. No-op when already enabled.
    pub fn enable_two_factor(&mut self, secret: &str) -> DomainResult<()> {
        if self.two_factor_enabled {
            return Ok(());
        }
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(DomainError::validation("Two-factor secret cannot be empty"));
        }
        self.two_factor_enabled = true;
        self.two_factor_secret = Some(secret.to_string());
        self.timestamps.touch();
        Ok(())
    }

    pub fn disable_two_factor(&mut self) {
        if self.two_factor_enabled {
            self.two_factor_enabled = false;
            self.two_factor_secret = None;
            self.timestamps.touch();
        }
    }

    // =========================================================================
    // Links
    // =========================================================================

    pub fn assign_role(&mut self, role_id: Option<Uuid>) {
        if self.role_id != role_id {
            self.role_id = role_id;
            self.timestamps.touch();
        }
    }

    pub fn link_employee(&mut self, employee_id: Option<Uuid>) {
        if self.employee_id != employee_id {
            self.employee_id = employee_id;
            self.timestamps.touch();
        }
    }

    pub fn assign_job_title(&mut self, job_title_id: Option<Uuid>) {
        if self.job_title_id != job_title_id {
            self.job_title_id = job_title_id;
            self.timestamps.touch();
        }
    }
}

fn new_security_stamp() -> String {
    Uuid::new_v4().simple().to_string().to_uppercase()
}

impl Entity for UserAccount {
    fn id(&self) -> Uuid {
        self.id
    }

    fn timestamps(&self) -> &Timestamps {
        &self.timestamps
    }
}
