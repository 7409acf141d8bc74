//! Shift schedule model and checkpoint types.
//!
//! A shift schedule describes up to four daily checkpoints. Each checkpoint has
//! an expected time, used for lateness, and an optional acceptance window,
//! used for punch selection.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One of the four expected daily clock events.
///
/// # Example
///
/// ```
/// use attendance_engine::models::Checkpoint;
///
/// assert!(Checkpoint::PmCheckIn.is_check_in());
/// assert!(!Checkpoint::PmCheckOut.is_check_in());
/// assert_eq!(Checkpoint::ALL.len(), 4);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Checkpoint {
    /// Morning arrival.
    AmCheckIn,
    /// Mid-day departure.
    AmCheckOut,
    /// Return from the mid-day break.
    PmCheckIn,
    /// End-of-day departure.
    PmCheckOut,
}

impl Checkpoint {
    /// All checkpoints in evaluation order.
    pub const ALL: [Checkpoint; 4] = [
        Checkpoint::AmCheckIn,
        Checkpoint::AmCheckOut,
        Checkpoint::PmCheckIn,
        Checkpoint::PmCheckOut,
    ];

    /// Returns true for the two arrival checkpoints.
    pub fn is_check_in(self) -> bool {
        matches!(self, Checkpoint::AmCheckIn | Checkpoint::PmCheckIn)
    }

    /// Position of the checkpoint in [`Checkpoint::ALL`].
    pub fn index(self) -> usize {
        match self {
            Checkpoint::AmCheckIn => 0,
            Checkpoint::AmCheckOut => 1,
            Checkpoint::PmCheckIn => 2,
            Checkpoint::PmCheckOut => 3,
        }
    }

    /// The snake_case field name used in schedules and reports.
    pub fn field_name(self) -> &'static str {
        match self {
            Checkpoint::AmCheckIn => "am_check_in",
            Checkpoint::AmCheckOut => "am_check_out",
            Checkpoint::PmCheckIn => "pm_check_in",
            Checkpoint::PmCheckOut => "pm_check_out",
        }
    }
}

impl std::fmt::Display for Checkpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Checkpoint::AmCheckIn => write!(f, "AM check-in"),
            Checkpoint::AmCheckOut => write!(f, "AM check-out"),
            Checkpoint::PmCheckIn => write!(f, "PM check-in"),
            Checkpoint::PmCheckOut => write!(f, "PM check-out"),
        }
    }
}

/// Definition of a single checkpoint within a schedule.
///
/// The checkpoint is active iff `expected` is present. The window bounds are
/// only honoured when both are present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointDefinition {
    /// Expected clock time for lateness comparison.
    #[serde(default)]
    pub expected: Option<NaiveTime>,
    /// First minute of the acceptance window (inclusive).
    #[serde(default)]
    pub window_start: Option<NaiveTime>,
    /// Last minute of the acceptance window (inclusive).
    #[serde(default)]
    pub window_end: Option<NaiveTime>,
}

impl CheckpointDefinition {
    /// An active checkpoint with no explicit window.
    pub fn at(expected: NaiveTime) -> Self {
        Self {
            expected: Some(expected),
            window_start: None,
            window_end: None,
        }
    }

    /// Sets an explicit acceptance window.
    pub fn with_window(mut self, start: NaiveTime, end: NaiveTime) -> Self {
        self.window_start = Some(start);
        self.window_end = Some(end);
        self
    }

    /// Returns true if this checkpoint takes part in the computation.
    pub fn is_active(&self) -> bool {
        self.expected.is_some()
    }
}

/// An employee's resolved shift schedule.
///
/// # Example
///
/// ```
/// use attendance_engine::models::{Checkpoint, CheckpointDefinition, ShiftSchedule};
/// use chrono::NaiveTime;
///
/// let schedule = ShiftSchedule {
///     name: Some("Morning".to_string()),
///     am_check_in: CheckpointDefinition::at(NaiveTime::from_hms_opt(8, 0, 0).unwrap()),
///     ..ShiftSchedule::default()
/// };
/// assert!(schedule.has_active_checkpoint());
/// assert!(!schedule.definition(Checkpoint::PmCheckOut).is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftSchedule {
    /// Display name, possibly several shift names joined with " / ".
    #[serde(default)]
    pub name: Option<String>,
    /// Morning arrival checkpoint.
    #[serde(default)]
    pub am_check_in: CheckpointDefinition,
    /// Mid-day departure checkpoint.
    #[serde(default)]
    pub am_check_out: CheckpointDefinition,
    /// Afternoon arrival checkpoint.
    #[serde(default)]
    pub pm_check_in: CheckpointDefinition,
    /// End-of-day departure checkpoint.
    #[serde(default)]
    pub pm_check_out: CheckpointDefinition,
}

impl ShiftSchedule {
    /// Returns the definition for a checkpoint.
    pub fn definition(&self, checkpoint: Checkpoint) -> &CheckpointDefinition {
        match checkpoint {
            Checkpoint::AmCheckIn => &self.am_check_in,
            Checkpoint::AmCheckOut => &self.am_check_out,
            Checkpoint::PmCheckIn => &self.pm_check_in,
            Checkpoint::PmCheckOut => &self.pm_check_out,
        }
    }

    /// Returns a mutable reference to the definition for a checkpoint.
    pub fn definition_mut(&mut self, checkpoint: Checkpoint) -> &mut CheckpointDefinition {
        match checkpoint {
            Checkpoint::AmCheckIn => &mut self.am_check_in,
            Checkpoint::AmCheckOut => &mut self.am_check_out,
            Checkpoint::PmCheckIn => &mut self.pm_check_in,
            Checkpoint::PmCheckOut => &mut self.pm_check_out,
        }
    }

    /// Returns true if at least one checkpoint has an expected time.
    pub fn has_active_checkpoint(&self) -> bool {
        Checkpoint::ALL
            .iter()
            .any(|&checkpoint| self.definition(checkpoint).is_active())
    }
}
