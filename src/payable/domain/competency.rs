//! Calendar month a statutory obligation accrues to.

use super::PayableDomainError;
use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A calendar month and year, displayed as `MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Competency {
    year: i32,
    month: u32,
}

impl Competency {
    /// Creates a competency.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::InvalidCompetency`] when the month is
    /// outside `1..=12`.
    pub const fn new(year: i32, month: u32) -> Result<Self, PayableDomainError> {
        if month == 0 || month > 12 {
            return Err(PayableDomainError::InvalidCompetency { year, month });
        }
        Ok(Self { year, month })
    }

    /// Returns the competency containing `date`.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Returns the calendar year.
    #[must_use]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the calendar month.
    #[must_use]
    pub const fn month(self) -> u32 {
        self.month
    }

    /// Returns the following month, wrapping December into January.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Returns the `MM/YYYY` label.
    #[must_use]
    pub fn label(self) -> String {
        self.to_string()
    }

    /// Returns `day` of the following month, clamped to that month's length.
    ///
    /// # Errors
    ///
    /// Returns [`PayableDomainError::DueDateOutOfRange`] when the date is
    /// not representable.
    pub fn due_date(self, day: u32) -> Result<NaiveDate, PayableDomainError> {
        let following = self.next();
        let out_of_range = || PayableDomainError::DueDateOutOfRange(self);
        let first = NaiveDate::from_ymd_opt(following.year, following.month, 1)
            .ok_or_else(out_of_range)?;
        let last_day = first
            .checked_add_months(Months::new(1))
            .and_then(|date| date.pred_opt())
            .ok_or_else(out_of_range)?
            .day();
        NaiveDate::from_ymd_opt(following.year, following.month, day.clamp(1, last_day))
            .ok_or_else(out_of_range)
    }
}

impl fmt::Display for Competency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::Competency;
    use chrono::NaiveDate;
    use rstest::rstest;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid test date")
    }

    #[rstest]
    #[case(date(2024, 3, 15), 25, date(2024, 4, 25))]
    #[case(date(2024, 12, 2), 25, date(2025, 1, 25))]
    #[case(date(2024, 1, 31), 31, date(2024, 2, 29))]
    #[case(date(2023, 1, 10), 30, date(2023, 2, 28))]
    fn due_date_falls_in_following_month(
        #[case] effective: NaiveDate,
        #[case] day: u32,
        #[case] expected: NaiveDate,
    ) {
        let competency = Competency::from_date(effective);
        assert_eq!(competency.due_date(day), Ok(expected));
    }

    #[rstest]
    fn label_pads_month() {
        let competency = Competency::from_date(date(2024, 3, 15));
        assert_eq!(competency.label(), "03/2024");
        assert_eq!(competency.to_string(), "03/2024");
    }

    #[rstest]
    #[case(0)]
    #[case(13)]
    fn rejects_months_outside_calendar(#[case] month: u32) {
        assert!(Competency::new(2024, month).is_err());
    }
}
