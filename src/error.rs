//! Error types for the attendance engine.
//!
//! Hard failures are reported through [`EngineError`]. Recoverable data
//! problems (an unreadable punch, an exception record without a date) are not
//! errors; they surface as warnings in the report's audit trace.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the attendance engine.
///
/// # Example
///
/// ```
/// use attendance_engine::error::EngineError;
///
/// let error = EngineError::NoShiftSchedule {
///     employee_id: "1042".to_string(),
/// };
/// assert_eq!(error.to_string(), "No shift schedule assigned to employee 1042");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// The employee's schedule has no active checkpoint, so attendance
    /// cannot be computed at all.
    #[error("No shift schedule assigned to employee {employee_id}")]
    NoShiftSchedule {
        /// The employee whose schedule is empty.
        employee_id: String,
    },

    /// The requested range ends before it starts.
    #[error("Invalid date range: {start} is after {end}")]
    InvalidDateRange {
        /// First date of the requested range.
        start: NaiveDate,
        /// Last date of the requested range.
        end: NaiveDate,
    },

    /// The requested range spans more days than the engine accepts.
    #[error("Date range {start} to {end} exceeds the limit of {max_days} days")]
    DateRangeTooLong {
        /// First date of the requested range.
        start: NaiveDate,
        /// Last date of the requested range.
        end: NaiveDate,
        /// The configured limit.
        max_days: u32,
    },

    /// A schedule field could not be read as a clock time.
    #[error("Invalid shift schedule field '{field}': {message}")]
    InvalidSchedule {
        /// The schedule field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
