//! Date of birth value object.

use std::fmt;

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// A calendar date that is not in the future.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "NaiveDate", into = "NaiveDate")]
pub struct DateOfBirth(NaiveDate);

impl DateOfBirth {
    /// Validate against today's UTC date.
    pub fn new(date: NaiveDate) -> DomainResult<Self> {
        Self::new_as_of(date, today())
    }

    /// Validate against an explicit "today". Same-day dates are accepted.
    pub fn new_as_of(date: NaiveDate, today: NaiveDate) -> DomainResult<Self> {
        if date > today {
            return Err(DomainError::out_of_range(format!(
                "Date of birth cannot be in the future: {}",
                date
            )));
        }
        Ok(Self(date))
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Age in whole years as of today (UTC).
    pub fn age(&self) -> u32 {
        self.age_on(today())
    }

    /// Age in whole years on `on`; zero when `on` precedes the birth date.
    pub fn age_on(&self, on: NaiveDate) -> u32 {
        let born = self.0;
        let mut years = on.year() - born.year();
        if (on.month(), on.day()) < (born.month(), born.day()) {
            years -= 1;
        }
        years.max(0) as u32
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

impl fmt::Display for DateOfBirth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl TryFrom<NaiveDate> for DateOfBirth {
    type Error = DomainError;

    fn try_from(value: NaiveDate) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DateOfBirth> for NaiveDate {
    fn from(value: DateOfBirth) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_future_date_is_rejected() {
        let err = DateOfBirth::new_as_of(date(2024, 6, 2), date(2024, 6, 1)).unwrap_err();
        assert!(matches!(err, DomainError::OutOfRange(_)));
        assert!(err.to_string().contains("Date of birth cannot be in the future"));
    }

    #[test]
    fn test_today_is_accepted() {
        let today = date(2024, 6, 1);
        assert!(DateOfBirth::new_as_of(today, today).is_ok());
    }

    #[test]
    fn test_tomorrow_against_real_clock() {
        let tomorrow = Utc::now().date_naive().succ_opt().unwrap();
        assert!(DateOfBirth::new(tomorrow).is_err());
    }

    #[test]
    fn test_age_before_and_after_anniversary() {
        let dob = DateOfBirth::new_as_of(date(1990, 8, 15), date(2024, 1, 1)).unwrap();
        assert_eq!(dob.age_on(date(2024, 8, 14)), 33);
        assert_eq!(dob.age_on(date(2024, 8, 15)), 34);
        assert_eq!(dob.age_on(date(2024, 12, 31)), 34);
    }

    #[test]
    fn test_leap_day_birthday() {
        let dob = DateOfBirth::new_as_of(date(2000, 2, 29), date(2024, 1, 1)).unwrap();
        assert_eq!(dob.age_on(date(2023, 2, 28)), 22);
        assert_eq!(dob.age_on(date(2023, 3, 1)), 23);
    }
}
