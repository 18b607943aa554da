//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Pagination
// =============================================================================

/// Default number of items per page
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Maximum allowed items per page, applied by list handlers
pub const MAX_PAGE_SIZE: u32 = 100;

/// Default starting page number (1-indexed)
pub const DEFAULT_PAGE_NUMBER: u32 = 1;

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Minimum length for person, department, job title and role names
pub const MIN_NAME_LENGTH: usize = 2;

/// Maximum length for names
pub const MAX_NAME_LENGTH: usize = 120;

/// Minimum length for account user names
pub const MIN_USER_NAME_LENGTH: usize = 3;

/// Maximum length for account user names
pub const MAX_USER_NAME_LENGTH: usize = 64;

// =============================================================================
// Email
// =============================================================================

/// Maximum length of the local part of an address
pub const EMAIL_MAX_LOCAL_PART_LENGTH: usize = 64;

/// Maximum length of a single domain label
pub const EMAIL_MAX_LABEL_LENGTH: usize = 63;

/// Maximum length of a whole address
pub const EMAIL_MAX_LENGTH: usize = 254;

// =============================================================================
// Phone numbers
// =============================================================================

/// Minimum digit count for numbers carrying an explicit country code
pub const PHONE_MIN_INTERNATIONAL_DIGITS: usize = 8;

/// Maximum digit count allowed by E.164
pub const PHONE_MAX_INTERNATIONAL_DIGITS: usize = 15;

/// Brazilian country calling code
pub const BRAZIL_COUNTRY_CODE: &str = "55";

/// North American country calling code
pub const NANP_COUNTRY_CODE: &str = "1";

// =============================================================================
// Account lockout
// =============================================================================

/// Failed logins tolerated before an account is locked
pub const DEFAULT_MAX_FAILED_ATTEMPTS: u32 = 5;

/// Default lockout duration in minutes
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 15;
