//! HTTP request handlers for the attendance engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde::Serialize;
use tokio::task::JoinSet;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{AttendanceInput, compute_attendance, group_raw_logs};
use crate::config::EngineConfig;
use crate::models::{ClockPunch, PeriodOfMonth};

use super::request::{ComputeAttendanceRequest, RawLogsRequest};
use super::response::{
    ApiError, ApiErrorResponse, AttendanceResponse, BatchItem, PeriodResponse, RawLogsResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/compute-attendance", post(compute_attendance_handler))
        .route("/compute-attendance/batch", post(batch_handler))
        .route("/raw-logs", post(raw_logs_handler))
        .route("/periods/:year/:month/:period", get(period_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn error_response(error: ApiErrorResponse) -> Response {
    json_response(error.status, error.error)
}

/// Maps a JSON extraction failure to an API error.
fn rejection_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

/// Converts one request and runs it through the engine.
fn run_computation(
    request: ComputeAttendanceRequest,
    config: &EngineConfig,
    calculation_id: Uuid,
) -> Result<AttendanceResponse, ApiErrorResponse> {
    let input = AttendanceInput::try_from(request)?;

    let start_time = Instant::now();
    let report = compute_attendance(&input, config)?;
    let duration = start_time.elapsed();

    info!(
        correlation_id = %calculation_id,
        employee_id = %report.employee_id,
        days = report.days.len(),
        total_days = %report.summary.total_days,
        total_lateness_minutes = report.summary.total_lateness_minutes,
        duration_us = duration.as_micros(),
        "Attendance computed"
    );

    Ok(AttendanceResponse {
        calculation_id,
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        duration_us: u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        report,
    })
}

/// Handler for POST /compute-attendance.
///
/// Accepts punches, a schedule (or shift assignments), exception records
/// and a date range, and returns the attendance report.
async fn compute_attendance_handler(
    State(state): State<AppState>,
    payload: Result<Json<ComputeAttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                rejection_error(rejection, correlation_id),
            );
        }
    };

    let employee_id = request.employee_id.clone();
    match run_computation(request, state.config().config(), correlation_id) {
        Ok(result) => json_response(StatusCode::OK, result),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                employee_id = %employee_id,
                code = %err.error.code,
                error = %err.error.message,
                "Attendance computation failed"
            );
            error_response(err)
        }
    }
}

/// Handler for POST /compute-attendance/batch.
///
/// Computes several employees concurrently on the blocking pool and returns
/// one entry per request, in request order.
async fn batch_handler(
    State(state): State<AppState>,
    payload: Result<Json<Vec<ComputeAttendanceRequest>>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let requests = match payload {
        Ok(Json(reqs)) => reqs,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                rejection_error(rejection, correlation_id),
            );
        }
    };
    info!(
        correlation_id = %correlation_id,
        employees = requests.len(),
        "Processing batch attendance request"
    );

    let employee_ids: Vec<String> = requests.iter().map(|r| r.employee_id.clone()).collect();
    let mut tasks = JoinSet::new();
    for (index, request) in requests.into_iter().enumerate() {
        let state = state.clone();
        tasks.spawn_blocking(move || {
            let result = run_computation(request, state.config().config(), Uuid::new_v4());
            (index, result)
        });
    }

    let mut items: Vec<Option<BatchItem>> = vec![None; employee_ids.len()];
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((index, result)) => {
                let employee_id = employee_ids[index].clone();
                items[index] = Some(match result {
                    Ok(response) => BatchItem {
                        employee_id,
                        status: StatusCode::OK.as_u16(),
                        result: Some(response),
                        error: None,
                    },
                    Err(err) => BatchItem {
                        employee_id,
                        status: err.status.as_u16(),
                        result: None,
                        error: Some(err.error),
                    },
                });
            }
            Err(err) => {
                warn!(correlation_id = %correlation_id, error = %err, "Batch task failed");
            }
        }
    }

    let items: Vec<BatchItem> = items
        .into_iter()
        .zip(employee_ids)
        .map(|(item, employee_id)| {
            item.unwrap_or_else(|| BatchItem {
                employee_id,
                status: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
                result: None,
                error: Some(ApiError::new("CALCULATION_ERROR", "Computation did not complete")),
            })
        })
        .collect();

    json_response(StatusCode::OK, items)
}

/// Handler for POST /raw-logs.
async fn raw_logs_handler(
    State(state): State<AppState>,
    payload: Result<Json<RawLogsRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return json_response(
                StatusCode::BAD_REQUEST,
                rejection_error(rejection, correlation_id),
            );
        }
    };

    let punches: Vec<ClockPunch> = request
        .punches
        .into_iter()
        .map(|p| ClockPunch::new(p.employee_id.unwrap_or_default(), p.timestamp))
        .collect();

    match group_raw_logs(
        &punches,
        request.start_date,
        request.end_date,
        state.config().config(),
    ) {
        Ok(days) => {
            info!(
                correlation_id = %correlation_id,
                punches = punches.len(),
                days = days.len(),
                "Raw logs grouped"
            );
            json_response(StatusCode::OK, RawLogsResponse { days })
        }
        Err(err) => error_response(err.into()),
    }
}

/// Handler for GET /periods/:year/:month/:period.
async fn period_handler(Path((year, month, period)): Path<(i32, u32, String)>) -> Response {
    let period: PeriodOfMonth = match period.parse() {
        Ok(period) => period,
        Err(message) => {
            return json_response(StatusCode::BAD_REQUEST, ApiError::validation_error(message));
        }
    };

    match period.date_range(year, month) {
        Some((start_date, end_date)) => json_response(
            StatusCode::OK,
            PeriodResponse {
                year,
                month,
                period,
                label: period.label().to_string(),
                start_date,
                end_date,
            },
        ),
        None => json_response(
            StatusCode::BAD_REQUEST,
            ApiError::validation_error(format!("invalid month: {}-{:02}", year, month)),
        ),
    }
}
