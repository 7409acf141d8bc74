//! Shift assignment merge.
//!
//! An employee can hold several shift assignments at once, each covering the
//! morning, the afternoon or both. They are merged into one [`ShiftSchedule`]:
//! the first morning-bearing assignment fills the AM checkpoints and the first
//! afternoon-bearing assignment fills the PM checkpoints.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::models::{CheckpointDefinition, ShiftSchedule};

/// The half of the day an assignment covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftTimeMode {
    /// Morning only.
    #[serde(rename = "AM", alias = "am")]
    Am,
    /// Afternoon only.
    #[serde(rename = "PM", alias = "pm")]
    Pm,
    /// Both halves use the same check-in and check-out.
    #[serde(rename = "AMPM", alias = "ampm")]
    AmPm,
}

impl ShiftTimeMode {
    /// Returns true if the assignment fills the AM checkpoints.
    pub fn covers_am(self) -> bool {
        matches!(self, ShiftTimeMode::Am | ShiftTimeMode::AmPm)
    }

    /// Returns true if the assignment fills the PM checkpoints.
    pub fn covers_pm(self) -> bool {
        matches!(self, ShiftTimeMode::Pm | ShiftTimeMode::AmPm)
    }
}

/// One shift assigned to an employee, with a single check-in/check-out pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftAssignment {
    /// Name of the shift.
    #[serde(default)]
    pub shift_name: Option<String>,
    /// Which half of the day the pair applies to.
    pub mode: ShiftTimeMode,
    /// Expected check-in.
    #[serde(default)]
    pub check_in: Option<NaiveTime>,
    /// Check-in window start.
    #[serde(default)]
    pub check_in_start: Option<NaiveTime>,
    /// Check-in window end.
    #[serde(default)]
    pub check_in_end: Option<NaiveTime>,
    /// Expected check-out.
    #[serde(default)]
    pub check_out: Option<NaiveTime>,
    /// Check-out window start.
    #[serde(default)]
    pub check_out_start: Option<NaiveTime>,
    /// Check-out window end.
    #[serde(default)]
    pub check_out_end: Option<NaiveTime>,
}

impl ShiftAssignment {
    fn check_in_definition(&self) -> CheckpointDefinition {
        CheckpointDefinition {
            expected: self.check_in,
            window_start: self.check_in_start,
            window_end: self.check_in_end,
        }
    }

    fn check_out_definition(&self) -> CheckpointDefinition {
        CheckpointDefinition {
            expected: self.check_out,
            window_start: self.check_out_start,
            window_end: self.check_out_end,
        }
    }
}

/// Merges assignments into a single schedule.
///
/// Returns `None` for an empty slice. Distinct, non-empty shift names are
/// joined with `" / "` in first-seen order.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{ShiftAssignment, ShiftTimeMode, merge_assignments};
/// use chrono::NaiveTime;
///
/// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0);
/// let morning = ShiftAssignment {
///     shift_name: Some("Morning".to_string()),
///     mode: ShiftTimeMode::Am,
///     check_in: at(8, 0),
///     check_in_start: None,
///     check_in_end: None,
///     check_out: at(12, 0),
///     check_out_start: None,
///     check_out_end: None,
/// };
/// let afternoon = ShiftAssignment {
///     shift_name: Some("Afternoon".to_string()),
///     mode: ShiftTimeMode::Pm,
///     check_in: at(13, 0),
///     check_out: at(17, 0),
///     ..morning.clone()
/// };
///
/// let schedule = merge_assignments(&[morning, afternoon]).unwrap();
/// assert_eq!(schedule.name.as_deref(), Some("Morning / Afternoon"));
/// assert_eq!(schedule.pm_check_in.expected, at(13, 0));
/// ```
pub fn merge_assignments(assignments: &[ShiftAssignment]) -> Option<ShiftSchedule> {
    if assignments.is_empty() {
        return None;
    }

    let mut schedule = ShiftSchedule::default();

    if let Some(am) = assignments.iter().find(|a| a.mode.covers_am()) {
        schedule.am_check_in = am.check_in_definition();
        schedule.am_check_out = am.check_out_definition();
    }
    if let Some(pm) = assignments.iter().find(|a| a.mode.covers_pm()) {
        schedule.pm_check_in = pm.check_in_definition();
        schedule.pm_check_out = pm.check_out_definition();
    }

    let mut names: Vec<&str> = Vec::new();
    for name in assignments
        .iter()
        .filter_map(|a| a.shift_name.as_deref())
        .map(str::trim)
        .filter(|name| !name.is_empty())
    {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    if !names.is_empty() {
        schedule.name = Some(names.join(" / "));
    }

    Some(schedule)
}
