//! HTTP API module for the attendance engine.
//!
//! This module provides the REST endpoints that compute attendance reports,
//! group raw logs and resolve periods of a month into date ranges.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    AssignmentRequest, ComputeAttendanceRequest, ExceptionRequest, HolidayRequest,
    PeriodRequest, PunchRequest, RawLogsRequest, RequestError, ScheduleRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, AttendanceResponse, BatchItem, PeriodResponse, RawLogsResponse,
};
pub use state::AppState;
