//! Brazilian CPF document number value object.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

static PLAIN_CPF: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{11}$").expect("valid regex"));
static MASKED_CPF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{3}\.\d{3}\.\d{3}-\d{2}$").expect("valid regex"));

/// CPF number, accepted either as 11 plain digits or as `###.###.###-##`.
///
/// Equality is by the canonical digits, so a masked and a plain spelling of
/// the same CPF compare equal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentNumber {
    raw: String,
    digits: String,
}

impl DocumentNumber {
    /// Parse a CPF.
    ///
    /// # Errors
    /// * `"Document number cannot be null or empty"` for blank input
    /// * `"Invalid document number format"` when neither shape matches
    /// * `"Invalid document number"` when the check digits fail or all
    ///   digits are identical
    pub fn parse(raw: &str) -> DomainResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::invalid_format(
                "Document number cannot be null or empty",
            ));
        }
        if !PLAIN_CPF.is_match(raw) && !MASKED_CPF.is_match(raw) {
            return Err(DomainError::invalid_format(format!(
                "Invalid document number format: '{}'",
                raw
            )));
        }

        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
        if !Self::is_valid_cpf(&digits) {
            return Err(DomainError::invalid_format("Invalid document number"));
        }

        Ok(Self {
            raw: raw.to_string(),
            digits,
        })
    }

    /// Checks 11 ASCII digits against the CPF rules.
    ///
    /// Sequences of one repeated digit are refused even where the mod-11
    /// arithmetic would accept them.
    pub fn is_valid_cpf(digits: &str) -> bool {
        let numbers: Vec<u32> = digits.chars().filter_map(|c| c.to_digit(10)).collect();
        if numbers.len() != 11 || digits.len() != 11 {
            return false;
        }
        if numbers.iter().all(|&d| d == numbers[0]) {
            return false;
        }

        let first = check_digit(&numbers[..9], 10);
        let second = check_digit(&numbers[..10], 11);
        numbers[9] == first && numbers[10] == second
    }

    /// Trimmed input, mask preserved.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Canonical 11 digits.
    pub fn digits(&self) -> &str {
        &self.digits
    }

    /// Canonical `###.###.###-##` spelling.
    pub fn formatted(&self) -> String {
        let d = &self.digits;
        format!("{}.{}.{}-{}", &d[0..3], &d[3..6], &d[6..9], &d[9..11])
    }
}

/// Weighted sum with weights descending from `start_weight`, reduced mod 11.
fn check_digit(digits: &[u32], start_weight: u32) -> u32 {
    let sum: u32 = digits
        .iter()
        .zip((2..=start_weight).rev())
        .map(|(d, w)| d * w)
        .sum();
    let remainder = sum % 11;
    if remainder < 2 {
        0
    } else {
        11 - remainder
    }
}

impl PartialEq for DocumentNumber {
    fn eq(&self, other: &Self) -> bool {
        self.digits == other.digits
    }
}

impl Eq for DocumentNumber {}

impl Hash for DocumentNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.digits.hash(state);
    }
}

impl fmt::Display for DocumentNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for DocumentNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DocumentNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DocumentNumber> for String {
    fn from(document: DocumentNumber) -> Self {
        document.digits
    }
}
