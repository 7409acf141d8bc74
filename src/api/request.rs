//! Request types for the attendance engine API.
//!
//! Stored records reach the API under several spellings (`USERID`,
//! `CHECKTIME`, `shifttimemode`, status as text, number or boolean). Those
//! differences are absorbed here so the engine only ever sees clean domain
//! types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::calculation::{
    AttendanceInput, ShiftAssignment, ShiftTimeMode, extract_clock_time, extract_date,
    merge_assignments,
};
use crate::error::EngineError;
use crate::models::{
    CheckpointDefinition, ClockPunch, ExceptionKind, ExceptionRecord, HolidayRecord,
    PeriodOfMonth, ShiftSchedule,
};

/// Why a request could not be turned into engine input.
#[derive(Debug, Error)]
pub enum RequestError {
    /// The request is structurally valid JSON but semantically incomplete.
    #[error("{0}")]
    Validation(String),
    /// The engine rejected a field.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Request body for the `/compute-attendance` endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComputeAttendanceRequest {
    /// The employee being computed.
    #[serde(alias = "userId", alias = "USERID", alias = "emp_objid")]
    pub employee_id: String,
    /// An already-merged schedule. Takes precedence over `assignments`.
    #[serde(default)]
    pub schedule: Option<ScheduleRequest>,
    /// Shift assignments to merge when no schedule is given.
    #[serde(default)]
    pub assignments: Vec<AssignmentRequest>,
    /// Raw punches.
    #[serde(default, alias = "logs")]
    pub punches: Vec<PunchRequest>,
    /// The employee's exception records.
    #[serde(default)]
    pub exceptions: Vec<ExceptionRequest>,
    /// Global holidays.
    #[serde(default)]
    pub holidays: Vec<HolidayRequest>,
    /// First date of the range. Wins over `period`.
    #[serde(default, alias = "startDate")]
    pub start_date: Option<NaiveDate>,
    /// Last date of the range. Wins over `period`.
    #[serde(default, alias = "endDate")]
    pub end_date: Option<NaiveDate>,
    /// A month and half-month selector used when no dates are given.
    #[serde(default)]
    pub period: Option<PeriodRequest>,
}

/// A month and period-of-month.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeriodRequest {
    /// Calendar year.
    pub year: i32,
    /// Calendar month, 1-12.
    pub month: u32,
    /// Which part of the month.
    #[serde(default = "default_period_of_month")]
    pub period: PeriodOfMonth,
}

fn default_period_of_month() -> PeriodOfMonth {
    PeriodOfMonth::FullMonth
}

/// A merged schedule as stored, one flat field per checkpoint bound.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScheduleRequest {
    /// Display name.
    #[serde(default, alias = "SHIFTNAME")]
    pub name: Option<String>,
    /// Expected AM check-in.
    #[serde(default, alias = "SHIFT_AMCHECKIN")]
    pub am_check_in: Option<String>,
    /// AM check-in window start.
    #[serde(default, alias = "SHIFT_AMCHECKIN_START")]
    pub am_check_in_start: Option<String>,
    /// AM check-in window end.
    #[serde(default, alias = "SHIFT_AMCHECKIN_END")]
    pub am_check_in_end: Option<String>,
    /// Expected AM check-out.
    #[serde(default, alias = "SHIFT_AMCHECKOUT")]
    pub am_check_out: Option<String>,
    /// AM check-out window start.
    #[serde(default, alias = "SHIFT_AMCHECKOUT_START")]
    pub am_check_out_start: Option<String>,
    /// AM check-out window end.
    #[serde(default, alias = "SHIFT_AMCHECKOUT_END")]
    pub am_check_out_end: Option<String>,
    /// Expected PM check-in.
    #[serde(default, alias = "SHIFT_PMCHECKIN")]
    pub pm_check_in: Option<String>,
    /// PM check-in window start.
    #[serde(default, alias = "SHIFT_PMCHECKIN_START")]
    pub pm_check_in_start: Option<String>,
    /// PM check-in window end.
    #[serde(default, alias = "SHIFT_PMCHECKIN_END")]
    pub pm_check_in_end: Option<String>,
    /// Expected PM check-out.
    #[serde(default, alias = "SHIFT_PMCHECKOUT")]
    pub pm_check_out: Option<String>,
    /// PM check-out window start.
    #[serde(default, alias = "SHIFT_PMCHECKOUT_START")]
    pub pm_check_out_start: Option<String>,
    /// PM check-out window end.
    #[serde(default, alias = "SHIFT_PMCHECKOUT_END")]
    pub pm_check_out_end: Option<String>,
}

/// One stored shift assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentRequest {
    /// Shift name.
    #[serde(default, alias = "shiftname")]
    pub shift_name: Option<String>,
    /// AM, PM or AMPM.
    #[serde(alias = "shifttimemode")]
    pub mode: ShiftTimeMode,
    /// Expected check-in.
    #[serde(default, alias = "shift_checkin")]
    pub check_in: Option<String>,
    /// Check-in window start.
    #[serde(default, alias = "shift_checkin_start")]
    pub check_in_start: Option<String>,
    /// Check-in window end.
    #[serde(default, alias = "shift_checkin_end")]
    pub check_in_end: Option<String>,
    /// Expected check-out.
    #[serde(default, alias = "shift_checkout")]
    pub check_out: Option<String>,
    /// Check-out window start.
    #[serde(default, alias = "shift_checkout_start")]
    pub check_out_start: Option<String>,
    /// Check-out window end.
    #[serde(default, alias = "shift_checkout_end")]
    pub check_out_end: Option<String>,
}

/// One raw punch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PunchRequest {
    /// Owner of the punch; defaults to the request's employee.
    #[serde(default, alias = "USERID", alias = "userId")]
    pub employee_id: Option<String>,
    /// The stored timestamp text.
    #[serde(alias = "CHECKTIME", alias = "checktime", alias = "CheckTime")]
    pub timestamp: String,
}

/// One exception record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExceptionRequest {
    /// The exception kind.
    pub kind: ExceptionKind,
    /// Owner of the record; defaults to the request's employee.
    #[serde(default)]
    pub employee_id: Option<String>,
    /// The covered date as stored; unreadable text counts as missing.
    #[serde(default)]
    pub date: Option<String>,
    /// Approval status as text, number or boolean. A missing status is
    /// empty and never reads as approved.
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: String,
}

/// One holiday record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HolidayRequest {
    /// The holiday name.
    #[serde(default, alias = "HOLIDAYNAME")]
    pub name: String,
    /// The holiday date as stored.
    #[serde(default, alias = "HOLIDAYDATE")]
    pub date: Option<String>,
    /// Whether the holiday repeats every year.
    #[serde(default, alias = "isRecurring", deserialize_with = "deserialize_flag")]
    pub recurring: bool,
    /// Status as text, number or boolean; empty when missing.
    #[serde(default, deserialize_with = "deserialize_status")]
    pub status: String,
}

/// Reads a status stored as text, number or boolean into text.
fn deserialize_status<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        Value::Number(number) => number.to_string(),
        Value::Bool(flag) => flag.to_string(),
        _ => String::new(),
    })
}

/// Reads a flag stored as boolean, `0`/`1` or text.
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Bool(flag) => flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::String(text) => matches!(
            text.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "y"
        ),
        _ => false,
    })
}

/// Parses an optional clock-time field. Blank text counts as absent.
fn parse_clock(field: &str, value: Option<&str>) -> Result<Option<NaiveTime>, EngineError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => extract_clock_time(text)
            .map(Some)
            .ok_or_else(|| EngineError::InvalidSchedule {
                field: field.to_string(),
                message: format!("'{}' is not a clock time", text),
            }),
    }
}

fn definition(
    field: &str,
    expected: &Option<String>,
    start: &Option<String>,
    end: &Option<String>,
) -> Result<CheckpointDefinition, EngineError> {
    Ok(CheckpointDefinition {
        expected: parse_clock(field, expected.as_deref())?,
        window_start: parse_clock(&format!("{}_start", field), start.as_deref())?,
        window_end: parse_clock(&format!("{}_end", field), end.as_deref())?,
    })
}

impl TryFrom<ScheduleRequest> for ShiftSchedule {
    type Error = EngineError;

    fn try_from(req: ScheduleRequest) -> Result<Self, Self::Error> {
        Ok(ShiftSchedule {
            name: req.name.filter(|name| !name.trim().is_empty()),
            am_check_in: definition(
                "am_check_in",
                &req.am_check_in,
                &req.am_check_in_start,
                &req.am_check_in_end,
            )?,
            am_check_out: definition(
                "am_check_out",
                &req.am_check_out,
                &req.am_check_out_start,
                &req.am_check_out_end,
            )?,
            pm_check_in: definition(
                "pm_check_in",
                &req.pm_check_in,
                &req.pm_check_in_start,
                &req.pm_check_in_end,
            )?,
            pm_check_out: definition(
                "pm_check_out",
                &req.pm_check_out,
                &req.pm_check_out_start,
                &req.pm_check_out_end,
            )?,
        })
    }
}

impl TryFrom<AssignmentRequest> for ShiftAssignment {
    type Error = EngineError;

    fn try_from(req: AssignmentRequest) -> Result<Self, Self::Error> {
        Ok(ShiftAssignment {
            shift_name: req.shift_name,
            mode: req.mode,
            check_in: parse_clock("check_in", req.check_in.as_deref())?,
            check_in_start: parse_clock("check_in_start", req.check_in_start.as_deref())?,
            check_in_end: parse_clock("check_in_end", req.check_in_end.as_deref())?,
            check_out: parse_clock("check_out", req.check_out.as_deref())?,
            check_out_start: parse_clock("check_out_start", req.check_out_start.as_deref())?,
            check_out_end: parse_clock("check_out_end", req.check_out_end.as_deref())?,
        })
    }
}

impl ComputeAttendanceRequest {
    /// Resolves the inclusive date range from explicit dates or a period.
    pub fn date_range(&self) -> Result<(NaiveDate, NaiveDate), RequestError> {
        match (self.start_date, self.end_date, self.period) {
            (Some(start), Some(end), _) => Ok((start, end)),
            (_, _, Some(period)) => period
                .period
                .date_range(period.year, period.month)
                .ok_or_else(|| {
                    RequestError::Validation(format!(
                        "invalid period: {}-{:02} {}",
                        period.year, period.month, period.period
                    ))
                }),
            _ => Err(RequestError::Validation(
                "either start_date and end_date or period is required".to_string(),
            )),
        }
    }

    /// Resolves the schedule; an empty schedule means none is assigned.
    fn resolve_schedule(&self) -> Result<ShiftSchedule, EngineError> {
        if let Some(schedule) = &self.schedule {
            return schedule.clone().try_into();
        }

        let assignments = self
            .assignments
            .iter()
            .cloned()
            .map(ShiftAssignment::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(merge_assignments(&assignments).unwrap_or_default())
    }
}

impl TryFrom<ComputeAttendanceRequest> for AttendanceInput {
    type Error = RequestError;

    fn try_from(req: ComputeAttendanceRequest) -> Result<Self, Self::Error> {
        let employee_id = req.employee_id.trim().to_string();
        if employee_id.is_empty() {
            return Err(RequestError::Validation("employee_id must not be empty".to_string()));
        }

        let (start_date, end_date) = req.date_range()?;
        let schedule = req.resolve_schedule()?;

        let punches = req
            .punches
            .into_iter()
            .map(|p| ClockPunch {
                employee_id: p.employee_id.unwrap_or_else(|| employee_id.clone()),
                timestamp: p.timestamp,
            })
            .collect();

        let exceptions = req
            .exceptions
            .into_iter()
            .map(|e| ExceptionRecord {
                kind: e.kind,
                employee_id: e.employee_id.unwrap_or_else(|| employee_id.clone()),
                date: e.date.as_deref().and_then(extract_date),
                status: e.status,
            })
            .collect();

        let holidays = req
            .holidays
            .into_iter()
            .map(|h| HolidayRecord {
                name: h.name,
                date: h.date.as_deref().and_then(extract_date),
                recurring: h.recurring,
                status: h.status,
            })
            .collect();

        Ok(AttendanceInput {
            employee_id,
            schedule,
            punches,
            exceptions,
            holidays,
            start_date,
            end_date,
        })
    }
}

/// Request body for the `/raw-logs` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLogsRequest {
    /// Raw punches.
    #[serde(default, alias = "logs")]
    pub punches: Vec<PunchRequest>,
    /// First date of the range.
    #[serde(alias = "startDate")]
    pub start_date: NaiveDate,
    /// Last date of the range.
    #[serde(alias = "endDate")]
    pub end_date: NaiveDate,
}
