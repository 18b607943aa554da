//! Email address value object.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{EMAIL_MAX_LABEL_LENGTH, EMAIL_MAX_LENGTH, EMAIL_MAX_LOCAL_PART_LENGTH};
use crate::error::{DomainError, DomainResult};

const INVALID: &str = "Invalid email format";

/// Punctuation allowed in the local part besides ASCII alphanumerics.
const LOCAL_PART_PUNCTUATION: &str = "!#$%&'*+/=?^_`{|}~.-";

/// Normalized `local@domain` address.
///
/// The stored value is trimmed and lowercased. The domain is checked through
/// its IDN (punycode) form; [`Email::domain`] keeps the Unicode spelling and
/// [`Email::domain_ascii`] the ASCII-compatible one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email {
    value: String,
    local_part: String,
    domain: String,
    domain_ascii: String,
}

impl Email {
    /// Parse and normalize an email address.
    ///
    /// # Errors
    /// Returns [`DomainError::InvalidFormat`] with a message starting with
    /// `"Invalid email format"` when any rule is broken.
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(invalid("value is empty"));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(invalid("whitespace is not allowed"));
        }

        let value = trimmed.to_lowercase();
        if value.matches('@').count() != 1 {
            return Err(invalid("exactly one '@' is required"));
        }
        let (local_part, domain) = value
            .split_once('@')
            .ok_or_else(|| invalid("exactly one '@' is required"))?;
        if local_part.is_empty() || domain.is_empty() {
            return Err(invalid("'@' cannot be the first or last character"));
        }

        validate_local_part(local_part)?;
        let domain_ascii = validate_domain(domain)?;

        if local_part.len() + 1 + domain_ascii.len() > EMAIL_MAX_LENGTH {
            return Err(invalid("address is too long"));
        }

        Ok(Self {
            local_part: local_part.to_string(),
            domain: domain.to_string(),
            domain_ascii,
            value,
        })
    }

    /// Full normalized address.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn local_part(&self) -> &str {
        &self.local_part
    }

    /// Domain as typed (lowercased, may contain Unicode).
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// ASCII-compatible (punycode) form of the domain.
    pub fn domain_ascii(&self) -> &str {
        &self.domain_ascii
    }
}

fn invalid(reason: &str) -> DomainError {
    DomainError::invalid_format(format!("{}: {}", INVALID, reason))
}

fn validate_local_part(local: &str) -> DomainResult<()> {
    if local.chars().count() > EMAIL_MAX_LOCAL_PART_LENGTH {
        return Err(invalid("local part is too long"));
    }
    if !local
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || LOCAL_PART_PUNCTUATION.contains(c))
    {
        return Err(invalid("local part contains invalid characters"));
    }
    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return Err(invalid("local part has a misplaced dot"));
    }
    Ok(())
}

/// Checks the domain and returns its lowercase ASCII form.
fn validate_domain(domain: &str) -> DomainResult<String> {
    let ascii = idna::domain_to_ascii(domain)
        .map_err(|_| invalid("domain is not a valid internationalized name"))?
        .to_lowercase();

    let labels: Vec<&str> = ascii.split('.').collect();
    if labels.len() < 2 {
        return Err(invalid("domain must contain a dot"));
    }
    for label in labels {
        if label.is_empty() || label.len() > EMAIL_MAX_LABEL_LENGTH {
            return Err(invalid("domain label has an invalid length"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(invalid("domain label contains invalid characters"));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(invalid("domain label cannot start or end with '-'"));
        }
    }
    Ok(ascii)
}

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Email {}

impl Hash for Email {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl FromStr for Email {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.value
    }
}
