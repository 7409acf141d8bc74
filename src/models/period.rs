//! Period-of-month model.
//!
//! Computed attendance is stored per employee, month and period of month. This
//! module maps a period onto its inclusive date range.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Which part of a month a computation covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PeriodOfMonth {
    /// The whole month.
    #[serde(alias = "full")]
    FullMonth,
    /// Days 1 to 15.
    #[serde(alias = "first")]
    FirstHalf,
    /// Day 16 to the end of the month.
    #[serde(alias = "second")]
    SecondHalf,
}

impl PeriodOfMonth {
    /// The label used by the computed-attendance store.
    pub fn label(self) -> &'static str {
        match self {
            PeriodOfMonth::FullMonth => "Full Month",
            PeriodOfMonth::FirstHalf => "1st Half",
            PeriodOfMonth::SecondHalf => "2nd Half",
        }
    }

    /// Returns the inclusive date range of this period in the given month.
    ///
    /// Returns `None` for an invalid year/month.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::PeriodOfMonth;
    /// use chrono::NaiveDate;
    ///
    /// let (start, end) = PeriodOfMonth::SecondHalf.date_range(2024, 2).unwrap();
    /// assert_eq!(start, NaiveDate::from_ymd_opt(2024, 2, 16).unwrap());
    /// assert_eq!(end, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    /// ```
    pub fn date_range(self, year: i32, month: u32) -> Option<(NaiveDate, NaiveDate)> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)?;
        let last = last_day_of_month(first)?;
        let range = match self {
            PeriodOfMonth::FullMonth => (first, last),
            PeriodOfMonth::FirstHalf => (first, first.with_day(15)?),
            PeriodOfMonth::SecondHalf => (first.with_day(16)?, last),
        };
        Some(range)
    }
}

impl std::fmt::Display for PeriodOfMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl std::str::FromStr for PeriodOfMonth {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "full" | "full_month" | "full month" => Ok(PeriodOfMonth::FullMonth),
            "first" | "first_half" | "1st half" => Ok(PeriodOfMonth::FirstHalf),
            "second" | "second_half" | "2nd half" => Ok(PeriodOfMonth::SecondHalf),
            other => Err(format!("unknown period of month: {}", other)),
        }
    }
}

fn last_day_of_month(first: NaiveDate) -> Option<NaiveDate> {
    let (year, month) = if first.month() == 12 {
        (first.year() + 1, 1)
    } else {
        (first.year(), first.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1)?.pred_opt()
}
