//! Daily punch classification.
//!
//! Assigns a day's punches to the four checkpoints. Each active checkpoint
//! takes the earliest punch inside its window, except the PM check-out which
//! takes the latest. Windows may overlap, so one punch can fill two slots.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::day_credit::CheckpointPresence;
use super::normalizer::time_from_minutes;
use super::windows::ResolvedSchedule;
use crate::models::Checkpoint;

/// The punch chosen for each checkpoint on one day, in minutes since midnight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckpointSelections {
    selected: [Option<u32>; 4],
}

impl CheckpointSelections {
    /// Builds selections in checkpoint order (AM-in, AM-out, PM-in, PM-out).
    pub fn new(selected: [Option<u32>; 4]) -> Self {
        Self { selected }
    }

    /// Returns the selected minute for a checkpoint.
    pub fn get(&self, checkpoint: Checkpoint) -> Option<u32> {
        self.selected[checkpoint.index()]
    }

    /// Returns the selected punch as a clock time.
    pub fn time(&self, checkpoint: Checkpoint) -> Option<NaiveTime> {
        self.get(checkpoint).and_then(time_from_minutes)
    }

    /// Which checkpoints have a selected punch.
    pub fn presence(&self) -> CheckpointPresence {
        CheckpointPresence::new(self.selected.map(|minute| minute.is_some()))
    }
}

/// Selects the punch for every checkpoint from one day's punches.
///
/// `punch_minutes` need not be sorted. Inactive or unresolved checkpoints
/// never select a punch.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{resolve_windows, select_punches};
/// use attendance_engine::config::FallbackWindows;
/// use attendance_engine::models::{Checkpoint, CheckpointDefinition, ShiftSchedule};
/// use chrono::NaiveTime;
///
/// let at = |h, m| NaiveTime::from_hms_opt(h, m, 0).unwrap();
/// let schedule = ShiftSchedule {
///     am_check_in: CheckpointDefinition::at(at(8, 0)),
///     pm_check_out: CheckpointDefinition::at(at(17, 0)),
///     ..ShiftSchedule::default()
/// };
/// let resolved = resolve_windows(&schedule, &FallbackWindows::default());
///
/// // 07:55, 08:10, 17:02, 17:30
/// let selections = select_punches(&[1050, 475, 490, 1022], &resolved);
/// assert_eq!(selections.get(Checkpoint::AmCheckIn), Some(475));
/// assert_eq!(selections.get(Checkpoint::PmCheckOut), Some(1050));
/// assert_eq!(selections.get(Checkpoint::AmCheckOut), None);
/// ```
pub fn select_punches(punch_minutes: &[u32], schedule: &ResolvedSchedule) -> CheckpointSelections {
    let selected = Checkpoint::ALL.map(|checkpoint| {
        let window = schedule.get(checkpoint).selectable_window()?;
        let in_window = punch_minutes
            .iter()
            .copied()
            .filter(|&minute| window.contains(minute));

        match checkpoint {
            Checkpoint::PmCheckOut => in_window.max(),
            _ => in_window.min(),
        }
    });

    CheckpointSelections { selected }
}
