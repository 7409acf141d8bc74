//! Attendance report models.
//!
//! This module contains the [`AttendanceReport`] type and the structures it is
//! made of: one [`DailyAttendanceRecord`] per calendar date, the
//! [`PeriodSummary`] totals, per-kind exception counts and an audit trace.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How a calendar date is treated before any punches are considered.
///
/// # Example
///
/// ```
/// use attendance_engine::models::DayKind;
///
/// assert!(DayKind::Weekend.is_non_work_day());
/// assert!(!DayKind::Workday.is_non_work_day());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    /// A regular working day.
    Workday,
    /// A Saturday or Sunday (or another configured weekend day).
    Weekend,
    /// An approved holiday on a day that would otherwise be worked.
    Holiday,
}

impl DayKind {
    /// Returns true for weekends and holidays.
    pub fn is_non_work_day(self) -> bool {
        !matches!(self, DayKind::Workday)
    }
}

/// Which approved exceptions applied to a date.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionFlags {
    /// An approved travel record covers the date.
    pub has_travel: bool,
    /// An approved compensatory time off record covers the date.
    pub has_compensatory_time_off: bool,
    /// An approved fix-log request covers the date.
    pub has_fix_log: bool,
    /// An approved locator slip covers the date.
    pub has_locator: bool,
    /// An approved holiday falls on the date.
    pub has_holiday: bool,
}

impl ExceptionFlags {
    /// Returns true if any employee exception (not a holiday) applied.
    pub fn any_employee_exception(&self) -> bool {
        self.has_travel || self.has_compensatory_time_off || self.has_fix_log || self.has_locator
    }
}

/// The computed attendance for one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyAttendanceRecord {
    /// The calendar date.
    pub date: NaiveDate,
    /// Workday, weekend or holiday.
    pub day_kind: DayKind,
    /// Selected AM check-in punch, if any.
    pub am_check_in: Option<NaiveTime>,
    /// Selected AM check-out punch, if any.
    pub am_check_out: Option<NaiveTime>,
    /// Selected PM check-in punch, if any.
    pub pm_check_in: Option<NaiveTime>,
    /// Selected PM check-out punch, if any.
    pub pm_check_out: Option<NaiveTime>,
    /// Late arrival plus early departure minutes.
    pub lateness_minutes: i64,
    /// Credit derived purely from the selected punches.
    pub time_based_credit: Decimal,
    /// Final credit after exceptions, weekends and holidays.
    pub day_credit: Decimal,
    /// The exceptions that applied to this date.
    pub exceptions: ExceptionFlags,
    /// Short human-readable annotation (e.g. "Travel", "Weekend").
    pub remarks: String,
}

/// Totals over a date range.
///
/// # Example
///
/// ```
/// use attendance_engine::models::PeriodSummary;
/// use rust_decimal::Decimal;
///
/// let summary = PeriodSummary {
///     total_lateness_minutes: 0,
///     total_days: Decimal::from(10),
///     net_days: Decimal::from(10),
///     equivalent_days_deducted: Decimal::ZERO,
/// };
/// assert_eq!(summary.net_days, summary.total_days);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Sum of daily lateness in minutes.
    pub total_lateness_minutes: i64,
    /// Sum of daily credits.
    pub total_days: Decimal,
    /// Days remaining after deducting lateness, never negative.
    pub net_days: Decimal,
    /// Per-day lateness converted to days and accumulated day by day.
    pub equivalent_days_deducted: Decimal,
}

/// Number of distinct in-range dates covered by each exception kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionCounts {
    /// Dates covered by approved travel.
    pub travels: u32,
    /// Dates covered by approved compensatory time off.
    pub compensatory_time_off: u32,
    /// Dates covered by approved fix-log requests.
    pub fix_logs: u32,
    /// Dates covered by approved locator slips.
    pub locators: u32,
}

/// A single step in the audit trace recording a computation decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A recoverable data problem found while computing.
///
/// Warnings never change how a valid input is computed; they report inputs
/// that were skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning (e.g. `UNPARSEABLE_TIMESTAMP`).
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level ("low", "medium", "high").
    pub severity: String,
}

impl AuditWarning {
    /// Creates a warning.
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        severity: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            severity: severity.into(),
        }
    }
}

/// The complete audit trace for a computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of computation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during computation.
    pub warnings: Vec<AuditWarning>,
}

/// The full result of computing attendance for one employee and range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReport {
    /// The employee the report is for.
    pub employee_id: String,
    /// First date of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the range (inclusive).
    pub end_date: NaiveDate,
    /// Name of the schedule the punches were reconciled against.
    pub schedule_name: Option<String>,
    /// One record per calendar date, in date order.
    pub days: Vec<DailyAttendanceRecord>,
    /// Totals over the range.
    pub summary: PeriodSummary,
    /// Per-kind exception counts.
    pub exception_counts: ExceptionCounts,
    /// Decisions and warnings.
    pub audit_trace: AuditTrace,
}
