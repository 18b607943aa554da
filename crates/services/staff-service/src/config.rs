//! Staff service configuration.

use std::env;

use common::{AppError, AppResult, JwtConfig, LockoutConfig, LogConfig, PaginationConfig};

/// Minimum JWT secret length in bytes
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Region used for phone numbers written without a `+` prefix
pub const DEFAULT_PHONE_REGION: &str = "BR";

const DEV_JWT_SECRET: &str = "dev-secret-key-minimum-32-chars!!";

/// Staff service configuration.
#[derive(Debug, Clone, Default)]
pub struct StaffServiceConfig {
    pub jwt: JwtConfig,
    pub lockout: LockoutConfig,
    pub pagination: PaginationConfig,
    pub log: LogConfig,
    /// Default region for phone parsing (`None` requires a `+` prefix)
    pub phone_region: Option<String>,
}

impl StaffServiceConfig {
    /// Load configuration from `.env` and environment variables.
    pub fn from_env() -> AppResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let secret = match lookup("STAFF_JWT_SECRET").or_else(|| lookup("JWT_SECRET")) {
            Some(secret) => secret,
            None if cfg!(debug_assertions) => {
                // Development mode: use default but warn
                tracing::warn!("JWT_SECRET not set, using insecure default for development");
                DEV_JWT_SECRET.to_string()
            }
            None => return Err(AppError::config("JWT_SECRET must be set")),
        };

        let config = Self {
            jwt: JwtConfig {
                secret,
                expiration_hours: parse_or(
                    &lookup,
                    "JWT_EXPIRATION_HOURS",
                    defaults.jwt.expiration_hours,
                )?,
                issuer: lookup("JWT_ISSUER").unwrap_or(defaults.jwt.issuer),
            },
            lockout: LockoutConfig {
                max_failed_attempts: parse_or(
                    &lookup,
                    "LOCKOUT_MAX_FAILED_ATTEMPTS",
                    defaults.lockout.max_failed_attempts,
                )?,
                lockout_minutes: parse_or(
                    &lookup,
                    "LOCKOUT_MINUTES",
                    defaults.lockout.lockout_minutes,
                )?,
            },
            pagination: PaginationConfig {
                default_page_size: parse_or(
                    &lookup,
                    "DEFAULT_PAGE_SIZE",
                    defaults.pagination.default_page_size,
                )?,
                max_page_size: parse_or(
                    &lookup,
                    "MAX_PAGE_SIZE",
                    defaults.pagination.max_page_size,
                )?,
            },
            log: LogConfig {
                level: lookup("LOG_LEVEL").unwrap_or(defaults.log.level),
                json: parse_or(&lookup, "LOG_JSON", defaults.log.json)?,
            },
            phone_region: match lookup("DEFAULT_PHONE_REGION") {
                Some(region) if region.trim().is_empty() => None,
                Some(region) => Some(region.trim().to_uppercase()),
                None => Some(DEFAULT_PHONE_REGION.to_string()),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject settings the services cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.jwt.secret.len() < MIN_JWT_SECRET_LENGTH {
            return Err(AppError::config(format!(
                "JWT_SECRET must be at least {} characters long",
                MIN_JWT_SECRET_LENGTH
            )));
        }
        if self.jwt.expiration_hours < 1 {
            return Err(AppError::config("JWT_EXPIRATION_HOURS must be at least 1"));
        }
        if self.lockout.max_failed_attempts < 1 {
            return Err(AppError::config("LOCKOUT_MAX_FAILED_ATTEMPTS must be at least 1"));
        }
        if self.lockout.lockout_minutes < 1 {
            return Err(AppError::config("LOCKOUT_MINUTES must be at least 1"));
        }
        let paging = &self.pagination;
        if paging.default_page_size < 1 || paging.default_page_size > paging.max_page_size {
            return Err(AppError::config(
                "DEFAULT_PAGE_SIZE must be between 1 and MAX_PAGE_SIZE",
            ));
        }
        if let Some(region) = &self.phone_region {
            if !region.eq_ignore_ascii_case(DEFAULT_PHONE_REGION) {
                return Err(AppError::config(format!(
                    "DEFAULT_PHONE_REGION must be {} or empty, got {}",
                    DEFAULT_PHONE_REGION, region
                )));
            }
        }
        Ok(())
    }

    /// Configuration for tests and embedding, with a fixed secret.
    pub fn for_tests() -> Self {
        Self {
            jwt: JwtConfig {
                secret: "test-secret-key-that-is-at-least-32-bytes".to_string(),
                ..JwtConfig::default()
            },
            phone_region: Some(DEFAULT_PHONE_REGION.to_string()),
            ..Self::default()
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> AppResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::config(format!("{} has an invalid value: {}", key, raw))),
        None => Ok(default),
    }
}
