//! Core data models for the attendance engine.
//!
//! This module contains the inputs the engine consumes (punches, schedules,
//! exception and holiday records) and the report it produces.

mod attendance_report;
mod exception;
mod period;
mod punch;
mod schedule;

pub use attendance_report::{
    AttendanceReport, AuditStep, AuditTrace, AuditWarning, DailyAttendanceRecord, DayKind,
    ExceptionCounts, ExceptionFlags, PeriodSummary,
};
pub use exception::{
    ExceptionKind, ExceptionRecord, HolidayRecord, exception_status_approved, status_reads_approved,
};
pub use period::PeriodOfMonth;
pub use punch::ClockPunch;
pub use schedule::{Checkpoint, CheckpointDefinition, ShiftSchedule};
