//! Phone number value object with E.164 canonical form.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BRAZIL_COUNTRY_CODE, NANP_COUNTRY_CODE, PHONE_MAX_INTERNATIONAL_DIGITS,
    PHONE_MIN_INTERNATIONAL_DIGITS,
};
use crate::error::{DomainError, DomainResult};

/// Trailing extension token: `ext`, `ext.`, `x`, `ramal` or `;ext=`.
static EXTENSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\s*(?:;\s*ext=|ext\.?|x|ramal)\s*:?\s*(\d{1,6})\s*$").expect("valid regex")
});

const SEPARATORS: &str = " ()-./";

/// Phone number normalized to E.164 (`+<country code><national number>`).
///
/// Input with a leading `+` is treated as international. Input without it is
/// interpreted with the default country; only `BR` is supported, where the
/// number must be a two-digit DDD followed by an 8-digit landline or a
/// 9-digit mobile starting with `9`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber {
    raw: String,
    e164: String,
    country_code: String,
    national_number: String,
    extension: Option<String>,
}

impl PhoneNumber {
    /// Parse a phone number.
    ///
    /// # Errors
    /// [`DomainError::InvalidFormat`] with `"Phone number cannot be null or
    /// empty"` for blank input, or a message starting with
    /// `"Invalid phone number"` for every other failure.
    pub fn parse(raw: &str, default_country: Option<&str>) -> DomainResult<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DomainError::invalid_format(
                "Phone number cannot be null or empty",
            ));
        }

        let (main, extension) = match EXTENSION.captures(raw) {
            Some(caps) => {
                let start = caps.get(0).map_or(raw.len(), |m| m.start());
                (raw[..start].trim(), caps.get(1).map(|m| m.as_str().to_string()))
            }
            None => (raw, None),
        };
        if main.is_empty() {
            return Err(invalid("missing number before extension"));
        }

        let plus_count = main.matches('+').count();
        if plus_count > 1 {
            return Err(invalid("multiple '+' signs"));
        }
        let international = main.starts_with('+');
        if plus_count == 1 && !international {
            return Err(invalid("'+' is only allowed as the first character"));
        }
        if main
            .chars()
            .any(|c| !(c.is_ascii_digit() || c == '+' || SEPARATORS.contains(c)))
        {
            return Err(invalid("unexpected characters"));
        }

        let digits: String = main.chars().filter(char::is_ascii_digit).collect();
        let (country_code, national_number) = if international {
            split_international(&digits)?
        } else {
            split_national(&digits, default_country)?
        };

        Ok(Self {
            raw: raw.to_string(),
            e164: format!("+{}{}", country_code, national_number),
            country_code,
            national_number,
            extension,
        })
    }

    /// Trimmed input as given.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn e164(&self) -> &str {
        &self.e164
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    pub fn national_number(&self) -> &str {
        &self.national_number
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    /// Whether this is a Brazilian mobile number.
    pub fn is_brazilian_mobile(&self) -> bool {
        self.country_code == BRAZIL_COUNTRY_CODE && self.national_number.len() == 11
    }

    /// Presentation form hiding the middle digits.
    ///
    /// Keeps the country and area codes, the leading `9` of Brazilian mobiles
    /// and the last four digits.
    pub fn masked(&self) -> String {
        let national = &self.national_number;
        let split = national.len().saturating_sub(4);
        let last4 = &national[split..];

        if self.country_code == BRAZIL_COUNTRY_CODE && national.len() >= 10 {
            let ddd = &national[..2];
            let subscriber = &national[2..];
            let hidden = subscriber.len() - 4;
            if self.is_brazilian_mobile() {
                return format!(
                    "+{} ({}) {}{}-{}",
                    self.country_code,
                    ddd,
                    &subscriber[..1],
                    "*".repeat(hidden - 1),
                    last4
                );
            }
            return format!("+{} ({}) {}-{}", self.country_code, ddd, "*".repeat(hidden), last4);
        }

        format!("+{} {}{}", self.country_code, "*".repeat(split), last4)
    }
}

fn invalid(reason: &str) -> DomainError {
    DomainError::invalid_format(format!("Invalid phone number format: {}", reason))
}

fn split_international(digits: &str) -> DomainResult<(String, String)> {
    if !(PHONE_MIN_INTERNATIONAL_DIGITS..=PHONE_MAX_INTERNATIONAL_DIGITS).contains(&digits.len()) {
        return Err(invalid(&format!(
            "expected {} to {} digits, got {}",
            PHONE_MIN_INTERNATIONAL_DIGITS,
            PHONE_MAX_INTERNATIONAL_DIGITS,
            digits.len()
        )));
    }

    // Heuristic: only BR and NANP codes are recognised, everything else is
    // assumed to use a three-digit code.
    let cc_len = if digits.starts_with(BRAZIL_COUNTRY_CODE) {
        BRAZIL_COUNTRY_CODE.len()
    } else if digits.starts_with(NANP_COUNTRY_CODE) {
        NANP_COUNTRY_CODE.len()
    } else {
        3
    };
    Ok((digits[..cc_len].to_string(), digits[cc_len..].to_string()))
}

fn split_national(digits: &str, default_country: Option<&str>) -> DomainResult<(String, String)> {
    let country = default_country
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .ok_or_else(|| invalid("a default country is required without a '+' prefix"))?;
    if country != "BR" {
        return Err(invalid(&format!("unsupported default country '{}'", country)));
    }

    if digits.len() != 10 && digits.len() != 11 {
        return Err(invalid("Brazilian numbers need a DDD plus 8 or 9 digits"));
    }
    let (ddd, subscriber) = digits.split_at(2);
    if ddd == "00" {
        return Err(invalid("invalid DDD '00'"));
    }
    if subscriber.len() == 9 && !subscriber.starts_with('9') {
        return Err(invalid("mobile numbers must start with 9"));
    }
    if subscriber.len() == 8 && (subscriber.starts_with('0') || subscriber.starts_with('9')) {
        return Err(invalid("landline numbers cannot start with 0 or 9"));
    }

    Ok((BRAZIL_COUNTRY_CODE.to_string(), digits.to_string()))
}

impl PartialEq for PhoneNumber {
    fn eq(&self, other: &Self) -> bool {
        self.e164 == other.e164
    }
}

impl Eq for PhoneNumber {}

impl Hash for PhoneNumber {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.e164.hash(state);
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.extension {
            Some(ext) => write!(f, "{};ext={}", self.e164, ext),
            None => f.write_str(&self.e164),
        }
    }
}

/// Parses international (`+`-prefixed) input only.
impl FromStr for PhoneNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s, None)
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value, None)
    }
}

impl From<PhoneNumber> for String {
    fn from(phone: PhoneNumber) -> Self {
        phone.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn br(raw: &str) -> DomainResult<PhoneNumber> {
        PhoneNumber::parse(raw, Some("BR"))
    }

    fn assert_invalid(result: DomainResult<PhoneNumber>) {
        let err = result.unwrap_err();
        assert!(err.to_string().contains("Invalid phone number"), "{}", err);
    }

    #[test]
    fn test_brazilian_mobile() {
        let phone = br("(11) 99999-9999").unwrap();
        assert_eq!(phone.e164(), "+5511999999999");
        assert_eq!(phone.country_code(), "55");
        assert_eq!(phone.national_number(), "11999999999");
        assert_eq!(phone.raw(), "(11) 99999-9999");
        assert!(phone.extension().is_none());
    }

    #[test]
    fn test_brazilian_landline() {
        let phone = br("(21) 3333-4444").unwrap();
        assert_eq!(phone.e164(), "+552133334444");
        assert!(!phone.is_brazilian_mobile());
    }

    #[test]
    fn test_brazilian_shape_rules() {
        assert_invalid(br("(11) 89999-9999"));
        assert_invalid(br("(11) 0333-4444"));
        assert_invalid(br("(11) 9333-4444"));
        assert_invalid(br("(00) 99999-9999"));
        assert_invalid(br("999-9999"));
        assert_invalid(br("(11) 99999-99999"));
    }

    #[test]
    fn test_default_country_required_without_plus() {
        assert_invalid(PhoneNumber::parse("11999999999", None));
        assert_invalid(PhoneNumber::parse("11999999999", Some("  ")));
        assert_invalid(PhoneNumber::parse("4155552671", Some("US")));
        assert!(PhoneNumber::parse("11999999999", Some("br")).is_ok());
    }

    #[test]
    fn test_international_country_codes() {
        let us = PhoneNumber::parse("+1 (415) 555-2671", None).unwrap();
        assert_eq!(us.country_code(), "1");
        assert_eq!(us.national_number(), "4155552671");
        assert_eq!(us.e164(), "+14155552671");

        let brazil = PhoneNumber::parse("+55 11 99999-9999", Some("US")).unwrap();
        assert_eq!(brazil.country_code(), "55");
        assert_eq!(brazil.national_number(), "11999999999");

        let portugal = PhoneNumber::parse("+351 912 345 678", None).unwrap();
        assert_eq!(portugal.country_code(), "351");
        assert_eq!(portugal.national_number(), "912345678");
    }

    #[test]
    fn test_international_digit_count() {
        assert_invalid(PhoneNumber::parse("+1234567", None));
        assert!(PhoneNumber::parse("+12345678", None).is_ok());
        assert!(PhoneNumber::parse("+123456789012345", None).is_ok());
        assert_invalid(PhoneNumber::parse("+1234567890123456", None));
    }

    #[test]
    fn test_plus_placement() {
        assert_invalid(PhoneNumber::parse("++5511999999999", None));
        assert_invalid(PhoneNumber::parse("55+11999999999", Some("BR")));
    }

    #[test]
    fn test_rejects_letters() {
        assert_invalid(br("(11) 9999A-9999"));
    }

    #[test]
    fn test_blank_input() {
        let err = br("  ").unwrap_err();
        assert!(err.to_string().contains("Phone number cannot be null or empty"));
    }

    #[test]
    fn test_extension_is_stripped_before_validation() {
        let phone = br("(11) 3333-4444 ramal 215").unwrap();
        assert_eq!(phone.e164(), "+551133334444");
        assert_eq!(phone.extension(), Some("215"));

        let phone = PhoneNumber::parse("+1 415 555 2671 EXT. 12", None).unwrap();
        assert_eq!(phone.extension(), Some("12"));
        assert_eq!(phone.e164(), "+14155552671");

        let phone = PhoneNumber::parse("+1 415 555 2671x9", None).unwrap();
        assert_eq!(phone.extension(), Some("9"));
    }

    #[test]
    fn test_equality_by_e164() {
        let a = br("(11) 99999-9999").unwrap();
        let b = PhoneNumber::parse("+55 11 99999 9999", None).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_masking() {
        assert_eq!(br("(11) 99876-5432").unwrap().masked(), "+55 (11) 9****-5432");
        assert_eq!(br("(21) 3333-4444").unwrap().masked(), "+55 (21) ****-4444");
        assert_eq!(
            PhoneNumber::parse("+1 415 555 2671", None).unwrap().masked(),
            "+1 ******2671"
        );
    }

    #[test]
    fn test_serde_round_trip_keeps_extension() {
        let phone = br("(11) 3333-4444 ramal 215").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert_eq!(json, "\"+551133334444;ext=215\"");
        let back: PhoneNumber = serde_json::from_str(&json).unwrap();
        assert_eq!(back, phone);
        assert_eq!(back.extension(), Some("215"));
    }

    proptest! {
        #[test]
        fn prop_mobile_needs_leading_nine(
            ddd in 11u32..=99,
            first in 0u32..=9,
            rest in "[0-9]{8}",
        ) {
            let raw = format!("{}{}{}", ddd, first, rest);
            let parsed = br(&raw);
            prop_assert_eq!(parsed.is_ok(), first == 9);
            if let Ok(phone) = parsed {
                prop_assert!(phone.is_brazilian_mobile());
                prop_assert_eq!(phone.e164(), format!("+55{}", raw));
            }
        }

        #[test]
        fn prop_landline_rejects_leading_zero_or_nine(
            ddd in 11u32..=99,
            first in 0u32..=9,
            rest in "[0-9]{7}",
        ) {
            let raw = format!("({}) {}{}", ddd, first, rest);
            prop_assert_eq!(br(&raw).is_ok(), first != 0 && first != 9);
        }
    }
}
