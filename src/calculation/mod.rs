//! Calculation logic for the attendance engine.
//!
//! The pipeline runs per date, in dependency order: timestamp normalization,
//! shift window resolution, punch selection, lateness, day credit and the
//! exception overlay. The period aggregator drives the pipeline over a date
//! range and sums the results. Schedule merging and the raw log view sit
//! beside the pipeline.

mod day_credit;
mod exception_overlay;
mod lateness;
mod normalizer;
mod period_aggregator;
mod punch_selection;
mod raw_logs;
mod schedule_merge;
mod windows;

pub use day_credit::{CheckpointPresence, DayCredit, classify_day_credit};
pub use exception_overlay::{
    ExceptionCalendar, OverlayDecision, OverlayRule, apply_exception_overlay, build_remarks,
};
pub use lateness::{LatenessBreakdown, calculate_lateness, checkpoint_lateness};
pub use normalizer::{
    NormalizedTimestamp, extract_clock_time, extract_date, minutes_since_midnight,
    normalize_timestamp, time_from_minutes,
};
pub use period_aggregator::{
    AttendanceInput, DayEvaluation, check_date_range, compute_attendance, compute_day,
    evaluate_day, summarize,
};
pub use punch_selection::{CheckpointSelections, select_punches};
pub use raw_logs::{RawDayLogs, group_raw_logs};
pub use schedule_merge::{ShiftAssignment, ShiftTimeMode, merge_assignments};
pub use windows::{
    DEFAULT_AM_CHECK_IN_WINDOW, DEFAULT_AM_CHECK_OUT_WINDOW, DEFAULT_PM_CHECK_IN_WINDOW,
    DEFAULT_PM_CHECK_OUT_WINDOW, ResolvedCheckpoint, ResolvedSchedule, TimeWindow, WindowSource,
    resolve_windows,
};
