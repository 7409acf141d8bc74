//! Period aggregation.
//!
//! Runs window resolution, punch selection, lateness, day credit and the
//! exception overlay for every date in an inclusive range, then sums the
//! results into a [`PeriodSummary`].

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use super::day_credit::classify_day_credit;
use super::exception_overlay::{
    ExceptionCalendar, OverlayDecision, OverlayRule, apply_exception_overlay, build_remarks,
};
use super::lateness::{LatenessBreakdown, calculate_lateness};
use super::normalizer::{normalize_timestamp, time_from_minutes};
use super::punch_selection::select_punches;
use super::windows::{ResolvedSchedule, WindowSource, resolve_windows};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceReport, AuditStep, AuditTrace, AuditWarning, Checkpoint, ClockPunch,
    DailyAttendanceRecord, ExceptionRecord, HolidayRecord, PeriodSummary, ShiftSchedule,
};

/// Everything needed to compute one employee's attendance over a range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceInput {
    /// The employee being computed.
    pub employee_id: String,
    /// The employee's resolved shift schedule.
    pub schedule: ShiftSchedule,
    /// Raw punches; order does not matter.
    #[serde(default)]
    pub punches: Vec<ClockPunch>,
    /// The employee's exception records.
    #[serde(default)]
    pub exceptions: Vec<ExceptionRecord>,
    /// Global holidays.
    #[serde(default)]
    pub holidays: Vec<HolidayRecord>,
    /// First date of the range (inclusive).
    pub start_date: NaiveDate,
    /// Last date of the range (inclusive).
    pub end_date: NaiveDate,
}

/// The outcome of evaluating a single date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayEvaluation {
    /// The daily record.
    pub record: DailyAttendanceRecord,
    /// Lateness per checkpoint.
    pub lateness: LatenessBreakdown,
    /// The overlay rule that produced the final credit.
    pub overlay: OverlayDecision,
}

/// Evaluates one date from its punches (minutes since midnight).
pub fn evaluate_day(
    date: NaiveDate,
    punch_minutes: &[u32],
    schedule: &ResolvedSchedule,
    calendar: &ExceptionCalendar,
) -> DayEvaluation {
    let selections = select_punches(punch_minutes, schedule);
    let lateness = calculate_lateness(schedule, &selections);
    let time_based = classify_day_credit(selections.presence());

    let day_kind = calendar.day_kind(date);
    let exceptions = calendar.flags_for(date);
    let overlay = apply_exception_overlay(time_based.value(), &exceptions, day_kind);
    let holiday_name = calendar.holiday_on(date).map(|h| h.name.as_str());

    let record = DailyAttendanceRecord {
        date,
        day_kind,
        am_check_in: selections.time(Checkpoint::AmCheckIn),
        am_check_out: selections.time(Checkpoint::AmCheckOut),
        pm_check_in: selections.time(Checkpoint::PmCheckIn),
        pm_check_out: selections.time(Checkpoint::PmCheckOut),
        lateness_minutes: lateness.total,
        time_based_credit: time_based.value(),
        day_credit: overlay.day_credit,
        exceptions,
        remarks: build_remarks(&exceptions, day_kind, holiday_name),
    };

    DayEvaluation {
        record,
        lateness,
        overlay,
    }
}

/// Computes attendance for every date in the input's range.
///
/// # Errors
///
/// - [`EngineError::InvalidDateRange`] if the range ends before it starts
/// - [`EngineError::DateRangeTooLong`] if the range exceeds `max_range_days`
/// - [`EngineError::NoShiftSchedule`] if the schedule has no active checkpoint
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{AttendanceInput, compute_attendance};
/// use attendance_engine::config::EngineConfig;
/// use attendance_engine::models::{CheckpointDefinition, ClockPunch, ShiftSchedule};
/// use chrono::{NaiveDate, NaiveTime};
/// use rust_decimal::Decimal;
///
/// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let day = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
/// let input = AttendanceInput {
///     employee_id: "1042".to_string(),
///     schedule: ShiftSchedule {
///         am_check_in: CheckpointDefinition::at(at(8, 0)),
///         pm_check_out: CheckpointDefinition::at(at(17, 0)),
///         ..ShiftSchedule::default()
///     },
///     punches: vec![
///         ClockPunch::new("1042", "2025-03-03 08:10:00"),
///         ClockPunch::new("1042", "2025-03-03 17:00:00"),
///     ],
///     exceptions: vec![],
///     holidays: vec![],
///     start_date: day,
///     end_date: day,
/// };
///
/// let report = compute_attendance(&input, &EngineConfig::default()).unwrap();
/// assert_eq!(report.summary.total_lateness_minutes, 10);
/// assert_eq!(report.summary.total_days, Decimal::ONE);
/// ```
pub fn compute_attendance(
    input: &AttendanceInput,
    config: &EngineConfig,
) -> EngineResult<AttendanceReport> {
    compute_range(input, input.start_date, input.end_date, config)
}

/// Computes a single date with the same rules as [`compute_attendance`].
///
/// The input's own range is ignored. Used by consumers that need one day's
/// detail, such as a fix-time suggestion.
pub fn compute_day(
    input: &AttendanceInput,
    date: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<DailyAttendanceRecord> {
    let report = compute_range(input, date, date, config)?;
    report
        .days
        .into_iter()
        .next()
        .ok_or(EngineError::InvalidDateRange {
            start: date,
            end: date,
        })
}

/// Rejects a range that ends before it starts or spans more than the
/// configured number of days.
pub fn check_date_range(start: NaiveDate, end: NaiveDate, config: &EngineConfig) -> EngineResult<()> {
    if end < start {
        return Err(EngineError::InvalidDateRange { start, end });
    }
    let max_days = config.max_range_days();
    if (end - start).num_days() >= i64::from(max_days) {
        return Err(EngineError::DateRangeTooLong {
            start,
            end,
            max_days,
        });
    }
    Ok(())
}

fn compute_range(
    input: &AttendanceInput,
    start: NaiveDate,
    end: NaiveDate,
    config: &EngineConfig,
) -> EngineResult<AttendanceReport> {
    check_date_range(start, end, config)?;
    if !input.schedule.has_active_checkpoint() {
        return Err(EngineError::NoShiftSchedule {
            employee_id: input.employee_id.clone(),
        });
    }

    debug!(
        employee_id = %input.employee_id,
        start = %start,
        end = %end,
        punches = input.punches.len(),
        "Computing attendance"
    );

    let mut trace = AuditTrace::default();
    let resolved = resolve_windows(&input.schedule, config.fallback_windows());

    for checkpoint in resolved.iter().filter(|c| c.source == WindowSource::Unresolved) {
        trace.warnings.push(AuditWarning::new(
            "INCOMPLETE_WINDOW",
            format!(
                "{} is active but has no acceptance window; no punch will be selected",
                checkpoint.checkpoint
            ),
            "high",
        ));
    }

    trace.steps.push(AuditStep {
        step_number: 1,
        rule_id: "window_resolution".to_string(),
        rule_name: "Shift Window Resolution".to_string(),
        input: json!({
            "schedule": input.schedule,
        }),
        output: json!({
            "checkpoints": resolved.iter().collect::<Vec<_>>(),
        }),
        reasoning: window_reasoning(&resolved),
    });

    let punches_by_date = group_punch_minutes(input, &mut trace.warnings);
    let calendar = ExceptionCalendar::build(
        &input.employee_id,
        &input.exceptions,
        &input.holidays,
        config.weekend_days(),
        &mut trace.warnings,
    );

    let mut days = Vec::new();
    for date in start.iter_days().take_while(|date| *date <= end) {
        let punch_minutes = punches_by_date.get(&date).map_or(&[][..], Vec::as_slice);
        let evaluation = evaluate_day(date, punch_minutes, &resolved, &calendar);

        trace.steps.push(day_audit_step(
            trace.steps.len() as u32 + 1,
            punch_minutes,
            &evaluation,
        ));
        days.push(evaluation.record);
    }

    let summary = summarize(&days, config);

    debug!(
        employee_id = %input.employee_id,
        days = days.len(),
        total_days = %summary.total_days,
        total_lateness_minutes = summary.total_lateness_minutes,
        warnings = trace.warnings.len(),
        "Computed attendance"
    );

    Ok(AttendanceReport {
        employee_id: input.employee_id.clone(),
        start_date: start,
        end_date: end,
        schedule_name: input.schedule.name.clone(),
        days,
        summary,
        exception_counts: calendar.counts_within(start, end),
        audit_trace: trace,
    })
}

/// Normalizes the employee's punches and buckets them by date.
fn group_punch_minutes(
    input: &AttendanceInput,
    warnings: &mut Vec<AuditWarning>,
) -> BTreeMap<NaiveDate, Vec<u32>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<u32>> = BTreeMap::new();

    for punch in &input.punches {
        if punch.employee_id != input.employee_id {
            warnings.push(AuditWarning::new(
                "FOREIGN_PUNCH",
                format!(
                    "Punch '{}' belongs to employee {}, not {}",
                    punch.timestamp, punch.employee_id, input.employee_id
                ),
                "low",
            ));
            continue;
        }

        match normalize_timestamp(&punch.timestamp) {
            Some(normalized) => by_date
                .entry(normalized.date)
                .or_default()
                .push(normalized.minute_of_day()),
            None => warnings.push(AuditWarning::new(
                "UNPARSEABLE_TIMESTAMP",
                format!("Punch timestamp '{}' could not be read", punch.timestamp),
                "medium",
            )),
        }
    }

    by_date
}

/// Sums daily records into period totals.
///
/// Lateness converts to days at `minutes_per_day`. The deduction is
/// accumulated day by day and then rounded; net days use the total lateness.
/// Both round half away from zero.
pub fn summarize(days: &[DailyAttendanceRecord], config: &EngineConfig) -> PeriodSummary {
    let minutes_per_day = Decimal::from(config.minutes_per_day());

    let total_lateness_minutes: i64 = days.iter().map(|d| d.lateness_minutes).sum();
    let total_days: Decimal = days.iter().map(|d| d.day_credit).sum();
    let equivalent_days_deducted = days
        .iter()
        .map(|d| Decimal::from(d.lateness_minutes) / minutes_per_day)
        .sum::<Decimal>()
        .round_dp_with_strategy(
            config.deduction_decimal_places(),
            RoundingStrategy::MidpointAwayFromZero,
        );

    let net_days = (total_days - Decimal::from(total_lateness_minutes) / minutes_per_day)
        .max(Decimal::ZERO)
        .round_dp_with_strategy(
            config.net_days_decimal_places(),
            RoundingStrategy::MidpointAwayFromZero,
        );

    PeriodSummary {
        total_lateness_minutes,
        total_days: total_days.normalize(),
        net_days: net_days.normalize(),
        equivalent_days_deducted: equivalent_days_deducted.normalize(),
    }
}

fn window_reasoning(resolved: &ResolvedSchedule) -> String {
    let parts: Vec<String> = resolved
        .iter()
        .map(|c| match (c.source, c.window) {
            (WindowSource::Inactive, _) => format!("{} inactive", c.checkpoint),
            (WindowSource::Unresolved, _) | (_, None) => {
                format!("{} has no window", c.checkpoint)
            }
            (source, Some(window)) => format!(
                "{} {}-{} ({})",
                c.checkpoint,
                format_minute(window.start),
                format_minute(window.end),
                if source == WindowSource::Explicit { "explicit" } else { "fallback" }
            ),
        })
        .collect();
    parts.join("; ")
}

fn day_audit_step(step_number: u32, punch_minutes: &[u32], evaluation: &DayEvaluation) -> AuditStep {
    let record = &evaluation.record;
    let mut sorted = punch_minutes.to_vec();
    sorted.sort_unstable();
    let punches: Vec<String> = sorted.iter().map(|&m| format_minute(m)).collect();

    let selected = Checkpoint::ALL
        .iter()
        .filter(|&&c| record_time(record, c).is_some())
        .count();

    let rule = match evaluation.overlay.rule {
        OverlayRule::ApprovedException => "approved exception",
        OverlayRule::NonWorkDay => "non-work day",
        OverlayRule::TimeBased => "time-based",
    };

    AuditStep {
        step_number,
        rule_id: "daily_attendance".to_string(),
        rule_name: "Daily Attendance".to_string(),
        input: json!({
            "date": record.date,
            "day_kind": record.day_kind,
            "punches": punches,
        }),
        output: json!({
            "am_check_in": record.am_check_in,
            "am_check_out": record.am_check_out,
            "pm_check_in": record.pm_check_in,
            "pm_check_out": record.pm_check_out,
            "lateness_minutes": evaluation.lateness.per_checkpoint,
            "time_based_credit": record.time_based_credit.to_string(),
            "day_credit": record.day_credit.to_string(),
            "overlay_rule": evaluation.overlay.rule,
        }),
        reasoning: format!(
            "{}: {} of 4 checkpoints punched, {} minute(s) late, time-based credit {}, final credit {} ({})",
            record.date,
            selected,
            record.lateness_minutes,
            record.time_based_credit,
            record.day_credit,
            rule
        ),
    }
}

fn record_time(record: &DailyAttendanceRecord, checkpoint: Checkpoint) -> Option<NaiveTime> {
    match checkpoint {
        Checkpoint::AmCheckIn => record.am_check_in,
        Checkpoint::AmCheckOut => record.am_check_out,
        Checkpoint::PmCheckIn => record.pm_check_in,
        Checkpoint::PmCheckOut => record.pm_check_out,
    }
}

fn format_minute(minute: u32) -> String {
    time_from_minutes(minute)
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_else(|| minute.to_string())
}
