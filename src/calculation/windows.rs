//! Shift window resolution.
//!
//! Decides which checkpoints of a schedule are active and which acceptance
//! window each active checkpoint uses: the explicit window when both bounds
//! are present, otherwise the configured fallback for that checkpoint.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::normalizer::minutes_since_midnight;
use crate::config::FallbackWindows;
use crate::models::{Checkpoint, ShiftSchedule};

/// An inclusive range of minutes since midnight.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::TimeWindow;
///
/// let window = TimeWindow::from_minutes(450, 510); // 07:30-08:30
/// assert!(window.contains(450));
/// assert!(window.contains(510));
/// assert!(!window.contains(511));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// First minute (inclusive).
    pub start: u32,
    /// Last minute (inclusive).
    pub end: u32,
}

impl TimeWindow {
    /// Creates a window from two clock times.
    pub fn new(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: minutes_since_midnight(start),
            end: minutes_since_midnight(end),
        }
    }

    /// Creates a window from minutes since midnight.
    pub const fn from_minutes(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Returns true if `minute` lies inside the window, bounds included.
    pub fn contains(&self, minute: u32) -> bool {
        minute >= self.start && minute <= self.end
    }
}

/// Fallback for the AM check-in: 04:00-11:59.
pub const DEFAULT_AM_CHECK_IN_WINDOW: TimeWindow = TimeWindow::from_minutes(4 * 60, 11 * 60 + 59);

/// Fallback for the AM check-out: 11:00-12:30.
pub const DEFAULT_AM_CHECK_OUT_WINDOW: TimeWindow =
    TimeWindow::from_minutes(11 * 60, 12 * 60 + 30);

/// Fallback for the PM check-in: 12:31-14:00.
pub const DEFAULT_PM_CHECK_IN_WINDOW: TimeWindow =
    TimeWindow::from_minutes(12 * 60 + 31, 14 * 60);

/// Fallback for the PM check-out: 14:01-23:59.
pub const DEFAULT_PM_CHECK_OUT_WINDOW: TimeWindow =
    TimeWindow::from_minutes(14 * 60 + 1, 23 * 60 + 59);

/// Where a resolved window came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowSource {
    /// The checkpoint has no expected time.
    Inactive,
    /// Both bounds came from the schedule.
    Explicit,
    /// The configured fallback was substituted.
    Fallback,
    /// Active, but neither an explicit pair nor a fallback exists.
    Unresolved,
}

/// A checkpoint after window resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCheckpoint {
    /// Which checkpoint this is.
    pub checkpoint: Checkpoint,
    /// Expected time in minutes since midnight; `None` when inactive.
    pub expected: Option<u32>,
    /// Acceptance window; `None` when inactive or unresolved.
    pub window: Option<TimeWindow>,
    /// How the window was obtained.
    pub source: WindowSource,
}

impl ResolvedCheckpoint {
    /// Returns true if the checkpoint has an expected time.
    pub fn is_active(&self) -> bool {
        self.expected.is_some()
    }

    /// Returns the window only if the checkpoint can select punches.
    pub fn selectable_window(&self) -> Option<TimeWindow> {
        if self.is_active() { self.window } else { None }
    }
}

/// All four checkpoints of a schedule after window resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedSchedule {
    checkpoints: [ResolvedCheckpoint; 4],
}

impl ResolvedSchedule {
    /// Returns the resolved checkpoint.
    pub fn get(&self, checkpoint: Checkpoint) -> &ResolvedCheckpoint {
        &self.checkpoints[checkpoint.index()]
    }

    /// Iterates checkpoints in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &ResolvedCheckpoint> {
        self.checkpoints.iter()
    }

    /// Returns true if any checkpoint is active.
    pub fn has_active_checkpoint(&self) -> bool {
        self.checkpoints.iter().any(ResolvedCheckpoint::is_active)
    }
}

/// Resolves the active flag and acceptance window of every checkpoint.
///
/// # Arguments
///
/// * `schedule` - The employee's shift schedule
/// * `fallbacks` - Per-checkpoint windows used when the schedule has none
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{resolve_windows, TimeWindow, WindowSource};
/// use attendance_engine::config::FallbackWindows;
/// use attendance_engine::models::{Checkpoint, CheckpointDefinition, ShiftSchedule};
/// use chrono::NaiveTime;
///
/// let schedule = ShiftSchedule {
///     am_check_in: CheckpointDefinition::at(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
///     ..ShiftSchedule::default()
/// };
/// let resolved = resolve_windows(&schedule, &FallbackWindows::default());
///
/// let am_in = resolved.get(Checkpoint::AmCheckIn);
/// assert_eq!(am_in.source, WindowSource::Fallback);
/// assert_eq!(am_in.window, Some(TimeWindow::from_minutes(240, 719)));
/// assert_eq!(resolved.get(Checkpoint::PmCheckIn).source, WindowSource::Inactive);
/// ```
pub fn resolve_windows(schedule: &ShiftSchedule, fallbacks: &FallbackWindows) -> ResolvedSchedule {
    let checkpoints = Checkpoint::ALL.map(|checkpoint| {
        let definition = schedule.definition(checkpoint);

        let Some(expected) = definition.expected else {
            return ResolvedCheckpoint {
                checkpoint,
                expected: None,
                window: None,
                source: WindowSource::Inactive,
            };
        };

        let (window, source) = match (definition.window_start, definition.window_end) {
            (Some(start), Some(end)) => (Some(TimeWindow::new(start, end)), WindowSource::Explicit),
            _ => match fallbacks.get(checkpoint) {
                Some(fallback) => (Some(fallback), WindowSource::Fallback),
                None => (None, WindowSource::Unresolved),
            },
        };

        ResolvedCheckpoint {
            checkpoint,
            expected: Some(minutes_since_midnight(expected)),
            window,
            source,
        }
    });

    ResolvedSchedule { checkpoints }
}
