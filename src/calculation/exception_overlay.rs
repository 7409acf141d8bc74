//! Exception overlay.
//!
//! Approved travel, compensatory time off, fix-log and locator records excuse
//! a day entirely. Weekends and approved holidays are non-work days: a
//! non-work day without punches earns nothing, and one with punches keeps
//! whatever its punches earned.

use std::collections::{BTreeSet, HashMap};

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{
    AuditWarning, DayKind, ExceptionCounts, ExceptionFlags, ExceptionKind, ExceptionRecord,
    HolidayRecord,
};

/// Approved exceptions and holidays indexed by date for one employee.
#[derive(Debug, Clone, Default)]
pub struct ExceptionCalendar {
    dates: HashMap<ExceptionKind, BTreeSet<NaiveDate>>,
    holidays: Vec<HolidayRecord>,
    weekend_days: Vec<Weekday>,
}

impl ExceptionCalendar {
    /// Indexes the approved records that belong to `employee_id`.
    ///
    /// Records for other employees and records whose status does not read as
    /// approved are skipped. Records without a date are skipped with a
    /// `MALFORMED_EXCEPTION` or `MALFORMED_HOLIDAY` warning.
    pub fn build(
        employee_id: &str,
        exceptions: &[ExceptionRecord],
        holidays: &[HolidayRecord],
        weekend_days: &[Weekday],
        warnings: &mut Vec<AuditWarning>,
    ) -> Self {
        let mut dates: HashMap<ExceptionKind, BTreeSet<NaiveDate>> = HashMap::new();

        for record in exceptions.iter().filter(|r| r.employee_id == employee_id) {
            let Some(date) = record.date else {
                warnings.push(AuditWarning::new(
                    "MALFORMED_EXCEPTION",
                    format!("{} record for employee {} has no date", record.kind, employee_id),
                    "medium",
                ));
                continue;
            };
            if record.is_approved() {
                dates.entry(record.kind).or_default().insert(date);
            }
        }

        let mut approved_holidays = Vec::new();
        for holiday in holidays {
            if holiday.date.is_none() {
                warnings.push(AuditWarning::new(
                    "MALFORMED_HOLIDAY",
                    format!("Holiday '{}' has no date", holiday.name),
                    "medium",
                ));
                continue;
            }
            if holiday.is_approved() {
                approved_holidays.push(holiday.clone());
            }
        }

        debug!(
            employee_id = %employee_id,
            exception_kinds = dates.len(),
            holidays = approved_holidays.len(),
            "Built exception calendar"
        );

        Self {
            dates,
            holidays: approved_holidays,
            weekend_days: weekend_days.to_vec(),
        }
    }

    fn covers(&self, kind: ExceptionKind, date: NaiveDate) -> bool {
        self.dates.get(&kind).is_some_and(|dates| dates.contains(&date))
    }

    /// Returns the first approved holiday falling on `date`.
    pub fn holiday_on(&self, date: NaiveDate) -> Option<&HolidayRecord> {
        self.holidays.iter().find(|holiday| holiday.falls_on(date))
    }

    /// Returns the exceptions that apply on `date`.
    pub fn flags_for(&self, date: NaiveDate) -> ExceptionFlags {
        ExceptionFlags {
            has_travel: self.covers(ExceptionKind::Travel, date),
            has_compensatory_time_off: self.covers(ExceptionKind::CompensatoryTimeOff, date),
            has_fix_log: self.covers(ExceptionKind::FixLog, date),
            has_locator: self.covers(ExceptionKind::Locator, date),
            has_holiday: self.holiday_on(date).is_some(),
        }
    }

    /// Classifies `date` as a workday, weekend or holiday.
    ///
    /// A holiday falling on a weekend is reported as a weekend.
    pub fn day_kind(&self, date: NaiveDate) -> DayKind {
        if self.weekend_days.contains(&date.weekday()) {
            DayKind::Weekend
        } else if self.holiday_on(date).is_some() {
            DayKind::Holiday
        } else {
            DayKind::Workday
        }
    }

    /// Counts the distinct dates in `[start, end]` covered by each kind.
    pub fn counts_within(&self, start: NaiveDate, end: NaiveDate) -> ExceptionCounts {
        let count = |kind| {
            self.dates
                .get(&kind)
                .map_or(0, |dates| dates.range(start..=end).count() as u32)
        };

        ExceptionCounts {
            travels: count(ExceptionKind::Travel),
            compensatory_time_off: count(ExceptionKind::CompensatoryTimeOff),
            fix_logs: count(ExceptionKind::FixLog),
            locators: count(ExceptionKind::Locator),
        }
    }
}

/// Which overlay rule decided the final credit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlayRule {
    /// An approved employee exception forced a full day.
    ApprovedException,
    /// A weekend or holiday without time-based credit.
    NonWorkDay,
    /// The time-based credit was kept.
    TimeBased,
}

/// The final credit for a day and the rule that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayDecision {
    /// Final day credit.
    pub day_credit: Decimal,
    /// The rule that applied.
    pub rule: OverlayRule,
}

/// Applies approved exceptions, weekends and holidays to a time-based credit.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{OverlayRule, apply_exception_overlay};
/// use attendance_engine::models::{DayKind, ExceptionFlags};
/// use rust_decimal::Decimal;
///
/// let travel = ExceptionFlags { has_travel: true, ..ExceptionFlags::default() };
/// let decision = apply_exception_overlay(Decimal::ZERO, &travel, DayKind::Workday);
/// assert_eq!(decision.day_credit, Decimal::ONE);
/// assert_eq!(decision.rule, OverlayRule::ApprovedException);
///
/// let decision = apply_exception_overlay(Decimal::ZERO, &ExceptionFlags::default(), DayKind::Weekend);
/// assert_eq!(decision.day_credit, Decimal::ZERO);
/// ```
pub fn apply_exception_overlay(
    time_based_credit: Decimal,
    flags: &ExceptionFlags,
    day_kind: DayKind,
) -> OverlayDecision {
    if flags.any_employee_exception() {
        return OverlayDecision {
            day_credit: Decimal::ONE,
            rule: OverlayRule::ApprovedException,
        };
    }

    let is_non_work_day = day_kind.is_non_work_day() || flags.has_holiday;
    if is_non_work_day && time_based_credit.is_zero() {
        return OverlayDecision {
            day_credit: Decimal::ZERO,
            rule: OverlayRule::NonWorkDay,
        };
    }

    OverlayDecision {
        day_credit: time_based_credit,
        rule: OverlayRule::TimeBased,
    }
}

/// Builds the short remark shown next to a day, e.g. `"Travel, Weekend"`.
pub fn build_remarks(flags: &ExceptionFlags, day_kind: DayKind, holiday_name: Option<&str>) -> String {
    let mut parts: Vec<String> = Vec::new();

    let kinds = [
        (flags.has_travel, ExceptionKind::Travel),
        (flags.has_compensatory_time_off, ExceptionKind::CompensatoryTimeOff),
        (flags.has_fix_log, ExceptionKind::FixLog),
        (flags.has_locator, ExceptionKind::Locator),
    ];
    parts.extend(
        kinds
            .into_iter()
            .filter(|(present, _)| *present)
            .map(|(_, kind)| kind.to_string()),
    );

    if flags.has_holiday {
        match holiday_name {
            Some(name) if !name.trim().is_empty() => parts.push(format!("Holiday ({})", name.trim())),
            _ => parts.push("Holiday".to_string()),
        }
    }
    if day_kind == DayKind::Weekend {
        parts.push("Weekend".to_string());
    }

    parts.join(", ")
}
