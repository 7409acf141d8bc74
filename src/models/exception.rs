//! Approved exception records and holidays.
//!
//! These records justify an absence or a missing punch. The engine consumes
//! them as already-fetched facts; only records whose status reads as approved
//! take part in the computation.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Returns true if a holiday status means the holiday is in effect.
///
/// Holiday stores disagree on the spelling (`1`, `true`, `active`,
/// `Approved`), so the comparison is trimmed and case-insensitive.
///
/// # Example
///
/// ```
/// use attendance_engine::models::status_reads_approved;
///
/// assert!(status_reads_approved(" APPROVED "));
/// assert!(status_reads_approved("1"));
/// assert!(!status_reads_approved("For Approval"));
/// ```
pub fn status_reads_approved(status: &str) -> bool {
    matches!(
        status.trim().to_ascii_lowercase().as_str(),
        "approved" | "1" | "true" | "yes" | "active"
    )
}

/// Returns true if an employee exception status is exactly "approved".
///
/// Travel, CTO, fix-log and locator approvals are only ever stored as the
/// word, so `1` or `active` do not count. Case and surrounding spaces are
/// ignored.
///
/// ```
/// use attendance_engine::models::exception_status_approved;
///
/// assert!(exception_status_approved("APPROVED"));
/// assert!(!exception_status_approved("1"));
/// assert!(!exception_status_approved(""));
/// ```
pub fn exception_status_approved(status: &str) -> bool {
    status.trim().eq_ignore_ascii_case("approved")
}

/// The kind of an employee exception record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExceptionKind {
    /// Official travel.
    Travel,
    /// Compensatory time off (CTO/CDO).
    CompensatoryTimeOff,
    /// Approved manual time-fix request.
    FixLog,
    /// Field-duty locator slip.
    Locator,
}

impl std::fmt::Display for ExceptionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExceptionKind::Travel => write!(f, "Travel"),
            ExceptionKind::CompensatoryTimeOff => write!(f, "CTO"),
            ExceptionKind::FixLog => write!(f, "Fix Log"),
            ExceptionKind::Locator => write!(f, "Locator"),
        }
    }
}

/// An employee-specific exception covering one date.
///
/// A record without a date is malformed and never matches.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{ExceptionKind, ExceptionRecord};
/// use chrono::NaiveDate;
///
/// let travel = ExceptionRecord {
///     kind: ExceptionKind::Travel,
///     employee_id: "1042".to_string(),
///     date: NaiveDate::from_ymd_opt(2025, 3, 5),
///     status: "Approved".to_string(),
/// };
/// assert!(travel.is_approved());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionRecord {
    /// What kind of exception this is.
    pub kind: ExceptionKind,
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The covered date.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// The stored approval status.
    pub status: String,
}

impl ExceptionRecord {
    /// Returns true if the record's status is "approved".
    pub fn is_approved(&self) -> bool {
        exception_status_approved(&self.status)
    }
}

/// A global holiday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HolidayRecord {
    /// The name of the holiday (e.g. "Independence Day").
    pub name: String,
    /// The holiday date. For recurring holidays only month and day matter.
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Whether the holiday repeats on the same month-day every year.
    #[serde(default)]
    pub recurring: bool,
    /// The stored status.
    pub status: String,
}

impl HolidayRecord {
    /// Returns true if the holiday is active.
    pub fn is_approved(&self) -> bool {
        status_reads_approved(&self.status)
    }

    /// Returns true if this holiday falls on `date`.
    ///
    /// Recurring holidays match by month-day in any year; fixed holidays need
    /// the exact date. Status is not considered here.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::models::HolidayRecord;
    /// use chrono::NaiveDate;
    ///
    /// let christmas = HolidayRecord {
    ///     name: "Christmas Day".to_string(),
    ///     date: NaiveDate::from_ymd_opt(2001, 12, 25),
    ///     recurring: true,
    ///     status: "1".to_string(),
    /// };
    /// assert!(christmas.falls_on(NaiveDate::from_ymd_opt(2025, 12, 25).unwrap()));
    /// ```
    pub fn falls_on(&self, date: NaiveDate) -> bool {
        match self.date {
            Some(holiday) if self.recurring => {
                holiday.month() == date.month() && holiday.day() == date.day()
            }
            Some(holiday) => holiday == date,
            None => false,
        }
    }
}
