//! Response types for the attendance engine API.
//!
//! This module defines the success envelopes and the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::request::RequestError;
use crate::calculation::RawDayLogs;
use crate::error::EngineError;
use crate::models::{AttendanceReport, PeriodOfMonth};

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::NoShiftSchedule { employee_id } => ApiErrorResponse {
                status: StatusCode::NOT_FOUND,
                error: ApiError::with_details(
                    "NO_SHIFT_SCHEDULE",
                    "No shift schedule assigned to employee",
                    format!(
                        "Employee {} has no schedule with an expected check time",
                        employee_id
                    ),
                ),
            },
            EngineError::InvalidDateRange { start, end } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_DATE_RANGE",
                    format!("Invalid date range: {} is after {}", start, end),
                    "The end date must not precede the start date",
                ),
            },
            EngineError::DateRangeTooLong {
                start,
                end,
                max_days,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_DATE_RANGE",
                    format!("Invalid date range: {} to {} is too long", start, end),
                    format!("A single computation covers at most {} days", max_days),
                ),
            },
            EngineError::InvalidSchedule { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_SCHEDULE",
                    format!("Invalid shift schedule field '{}': {}", field, message),
                    "The schedule data contains invalid information",
                ),
            },
        }
    }
}

impl From<RequestError> for ApiErrorResponse {
    fn from(error: RequestError) -> Self {
        match error {
            RequestError::Validation(message) => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::validation_error(message),
            },
            RequestError::Engine(err) => err.into(),
        }
    }
}

/// Success body of `/compute-attendance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceResponse {
    /// Unique identifier of this computation, matching the request logs.
    pub calculation_id: Uuid,
    /// When the computation finished.
    pub timestamp: DateTime<Utc>,
    /// Version of the engine that produced the report.
    pub engine_version: String,
    /// Time spent computing, in microseconds.
    pub duration_us: u64,
    /// The computed report.
    pub report: AttendanceReport,
}

/// One entry of a batch response, in request order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItem {
    /// The employee the entry is for.
    pub employee_id: String,
    /// HTTP status the single request would have returned.
    pub status: u16,
    /// The result on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AttendanceResponse>,
    /// The error on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

/// Body of `/periods/:year/:month/:period`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodResponse {
    /// Calendar year.
    pub year: i32,
    /// Calendar month.
    pub month: u32,
    /// Which part of the month.
    pub period: PeriodOfMonth,
    /// Display label, e.g. "1st Half".
    pub label: String,
    /// First date (inclusive).
    pub start_date: NaiveDate,
    /// Last date (inclusive).
    pub end_date: NaiveDate,
}

/// Body of `/raw-logs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawLogsResponse {
    /// One entry per date.
    pub days: Vec<RawDayLogs>,
}
