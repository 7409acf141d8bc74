//! Lateness calculation.
//!
//! Check-ins count minutes after the expected time. Check-outs count minutes
//! before it, so leaving early is penalized and staying late is not.

use serde::{Deserialize, Serialize};

use super::punch_selection::CheckpointSelections;
use super::windows::ResolvedSchedule;
use crate::models::Checkpoint;

/// Lateness minutes per checkpoint and their daily total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatenessBreakdown {
    /// Minutes per checkpoint, in checkpoint order.
    pub per_checkpoint: [i64; 4],
    /// Sum over the four checkpoints.
    pub total: i64,
}

impl LatenessBreakdown {
    /// Returns the minutes charged to one checkpoint.
    pub fn minutes(&self, checkpoint: Checkpoint) -> i64 {
        self.per_checkpoint[checkpoint.index()]
    }
}

/// Minutes charged for one checkpoint given its expected and actual times.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::checkpoint_lateness;
/// use attendance_engine::models::Checkpoint;
///
/// assert_eq!(checkpoint_lateness(Checkpoint::AmCheckIn, 480, 485), 5);
/// assert_eq!(checkpoint_lateness(Checkpoint::AmCheckIn, 480, 470), 0);
/// assert_eq!(checkpoint_lateness(Checkpoint::PmCheckOut, 1020, 1000), 20);
/// assert_eq!(checkpoint_lateness(Checkpoint::PmCheckOut, 1020, 1080), 0);
/// ```
pub fn checkpoint_lateness(checkpoint: Checkpoint, expected: u32, actual: u32) -> i64 {
    let difference = if checkpoint.is_check_in() {
        i64::from(actual) - i64::from(expected)
    } else {
        i64::from(expected) - i64::from(actual)
    };
    difference.max(0)
}

/// Sums lateness over every active checkpoint that has a selected punch.
pub fn calculate_lateness(
    schedule: &ResolvedSchedule,
    selections: &CheckpointSelections,
) -> LatenessBreakdown {
    let per_checkpoint = Checkpoint::ALL.map(|checkpoint| {
        match (schedule.get(checkpoint).expected, selections.get(checkpoint)) {
            (Some(expected), Some(actual)) => checkpoint_lateness(checkpoint, expected, actual),
            _ => 0,
        }
    });

    LatenessBreakdown {
        per_checkpoint,
        total: per_checkpoint.iter().sum(),
    }
}
