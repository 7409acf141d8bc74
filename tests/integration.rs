//! Integration tests for the attendance engine HTTP API.
//!
//! This test suite covers:
//! - Punch selection and lateness against explicit and fallback windows
//! - Day credit for complete, half and empty days
//! - Weekends, holidays and approved exceptions
//! - Period totals and net days
//! - Stored field-name variants at the request boundary
//! - Error cases
//! - Batch computation

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use std::str::FromStr;
use tower::ServiceExt;

use attendance_engine::api::{AppState, create_router};
use attendance_engine::config::ConfigLoader;

// =============================================================================
// Test Helpers
// =============================================================================

fn create_test_state() -> AppState {
    let config = ConfigLoader::load("./config/default").expect("Failed to load config");
    AppState::new(config)
}

fn create_router_for_test() -> Router {
    create_router(create_test_state())
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();

    (status, json)
}

async fn post_compute(router: Router, body: Value) -> (StatusCode, Value) {
    post_json(router, "/compute-attendance", body).await
}

/// A four-checkpoint schedule with explicit windows.
fn regular_schedule() -> Value {
    json!({
        "name": "Regular",
        "am_check_in": "08:00", "am_check_in_start": "07:30", "am_check_in_end": "08:30",
        "am_check_out": "12:00", "am_check_out_start": "11:30", "am_check_out_end": "12:30",
        "pm_check_in": "13:00", "pm_check_in_start": "12:31", "pm_check_in_end": "14:00",
        "pm_check_out": "17:00", "pm_check_out_start": "16:30", "pm_check_out_end": "18:00"
    })
}

/// A four-checkpoint schedule that relies on the fallback windows.
fn fallback_schedule() -> Value {
    json!({
        "name": "Regular",
        "am_check_in": "08:00",
        "am_check_out": "12:00",
        "pm_check_in": "13:00",
        "pm_check_out": "17:00"
    })
}

fn create_request(schedule: Value, timestamps: &[&str], start: &str, end: &str) -> Value {
    let punches: Vec<Value> = timestamps
        .iter()
        .map(|ts| json!({"employee_id": "1042", "timestamp": ts}))
        .collect();
    json!({
        "employee_id": "1042",
        "schedule": schedule,
        "punches": punches,
        "start_date": start,
        "end_date": end
    })
}

fn day<'a>(result: &'a Value, index: usize) -> &'a Value {
    &result["report"]["days"][index]
}

fn assert_decimal(value: &Value, expected: &str) {
    let actual = value.as_str().unwrap();
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {}, got {}",
        expected,
        actual
    );
}

fn warning_codes(result: &Value) -> Vec<String> {
    result["report"]["audit_trace"]["warnings"]
        .as_array()
        .unwrap()
        .iter()
        .map(|w| w["code"].as_str().unwrap().to_string())
        .collect()
}

// =============================================================================
// SECTION 1: Daily classification
// =============================================================================

#[tokio::test]
async fn test_am_only_shift_late_five_minutes() {
    let schedule = json!({
        "name": "Morning",
        "am_check_in": "08:00", "am_check_in_start": "07:30", "am_check_in_end": "08:30",
        "am_check_out": "12:00", "am_check_out_start": "11:30", "am_check_out_end": "12:30"
    });
    let request = create_request(
        schedule,
        &["2025-03-03 08:05:00", "2025-03-03 12:00:00"],
        "2025-03-03",
        "2025-03-03",
    );

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(day(&result, 0)["am_check_in"], "08:05:00");
    assert_eq!(day(&result, 0)["am_check_out"], "12:00:00");
    assert_eq!(day(&result, 0)["lateness_minutes"], 5);
    assert_decimal(&day(&result, 0)["day_credit"], "0.5");
}

#[tokio::test]
async fn test_four_punches_full_day_late_departure_not_penalized() {
    let request = create_request(
        regular_schedule(),
        &[
            "2025-03-03 17:05:00",
            "2025-03-03 08:05:00",
            "2025-03-03 13:00:00",
            "2025-03-03 12:00:00",
        ],
        "2025-03-03",
        "2025-03-03",
    );

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(day(&result, 0)["pm_check_out"], "17:05:00");
    assert_eq!(day(&result, 0)["lateness_minutes"], 5);
    assert_decimal(&day(&result, 0)["day_credit"], "1");
}

#[tokio::test]
async fn test_early_departure_counts_as_lateness() {
    let request = create_request(
        regular_schedule(),
        &[
            "2025-03-03 07:55:00",
            "2025-03-03 11:45:00",
            "2025-03-03 13:10:00",
            "2025-03-03 16:40:00",
        ],
        "2025-03-03",
        "2025-03-03",
    );

    let (_, result) = post_compute(create_router_for_test(), request).await;

    // 0 + 15 early + 10 late + 20 early
    assert_eq!(day(&result, 0)["lateness_minutes"], 45);
}

#[tokio::test]
async fn test_fallback_windows_half_day() {
    let request = create_request(
        fallback_schedule(),
        &["2025-03-03 08:00:00", "2025-03-03 12:00:00"],
        "2025-03-03",
        "2025-03-03",
    );

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(day(&result, 0)["am_check_in"], "08:00:00");
    assert_eq!(day(&result, 0)["am_check_out"], "12:00:00");
    assert!(day(&result, 0)["pm_check_in"].is_null());
    assert_decimal(&day(&result, 0)["day_credit"], "0.5");
}

#[tokio::test]
async fn test_overlap_punch_fills_two_checkpoints() {
    // 11:30 lies in both the AM check-in and AM check-out fallback windows.
    let request = create_request(
        fallback_schedule(),
        &["2025-03-03 11:30:00"],
        "2025-03-03",
        "2025-03-03",
    );

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(day(&result, 0)["am_check_in"], "11:30:00");
    assert_eq!(day(&result, 0)["am_check_out"], "11:30:00");
    assert_eq!(day(&result, 0)["lateness_minutes"], 240);
    assert_decimal(&day(&result, 0)["day_credit"], "0.5");
}

#[tokio::test]
async fn test_in_and_out_only_is_full_day() {
    let request = create_request(
        fallback_schedule(),
        &["2025-03-03 08:00:00", "2025-03-03 17:00:00"],
        "2025-03-03",
        "2025-03-03",
    );

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_decimal(&day(&result, 0)["day_credit"], "1");
    assert_eq!(day(&result, 0)["lateness_minutes"], 0);
}

#[tokio::test]
async fn test_utc_suffix_read_literally() {
    let request = create_request(
        fallback_schedule(),
        &["2025-03-03T23:30:00.000Z", "2025-03-03T07:45:00.000Z"],
        "2025-03-03",
        "2025-03-04",
    );

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(day(&result, 0)["am_check_in"], "07:45:00");
    assert_eq!(day(&result, 0)["pm_check_out"], "23:30:00");
    assert!(day(&result, 1)["am_check_in"].is_null());
}

// =============================================================================
// SECTION 2: Weekends, holidays and exceptions
// =============================================================================

#[tokio::test]
async fn test_saturday_without_punches_earns_nothing() {
    let request = create_request(regular_schedule(), &[], "2025-03-08", "2025-03-08");

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(day(&result, 0)["day_kind"], "weekend");
    assert_eq!(day(&result, 0)["remarks"], "Weekend");
    assert_eq!(day(&result, 0)["lateness_minutes"], 0);
    assert_decimal(&day(&result, 0)["day_credit"], "0");
}

#[tokio::test]
async fn test_weekend_work_keeps_time_based_credit() {
    let request = create_request(
        regular_schedule(),
        &["2025-03-08 08:00:00", "2025-03-08 12:00:00"],
        "2025-03-08",
        "2025-03-08",
    );

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_decimal(&day(&result, 0)["day_credit"], "0.5");
}

#[tokio::test]
async fn test_travel_without_punches_is_full_day() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-05", "2025-03-05");
    request["exceptions"] = json!([
        {"kind": "travel", "date": "2025-03-05", "status": "Approved"}
    ]);

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&day(&result, 0)["time_based_credit"], "0");
    assert_decimal(&day(&result, 0)["day_credit"], "1");
    assert_eq!(day(&result, 0)["exceptions"]["has_travel"], true);
    assert_eq!(day(&result, 0)["remarks"], "Travel");
    assert_eq!(result["report"]["exception_counts"]["travels"], 1);
}

#[tokio::test]
async fn test_each_exception_kind_forces_full_day() {
    for kind in ["travel", "compensatory_time_off", "fix_log", "locator"] {
        let mut request = create_request(regular_schedule(), &[], "2025-03-05", "2025-03-05");
        request["exceptions"] = json!([{"kind": kind, "date": "2025-03-05", "status": "APPROVED"}]);

        let (_, result) = post_compute(create_router_for_test(), request).await;

        assert_decimal(&day(&result, 0)["day_credit"], "1");
    }
}

#[tokio::test]
async fn test_pending_or_foreign_exception_ignored() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-05", "2025-03-05");
    request["exceptions"] = json!([
        {"kind": "travel", "date": "2025-03-05", "status": "For Approval"},
        {"kind": "locator", "employee_id": "2000", "date": "2025-03-05", "status": "Approved"}
    ]);

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_decimal(&day(&result, 0)["day_credit"], "0");
    assert_eq!(result["report"]["exception_counts"]["travels"], 0);
    assert_eq!(result["report"]["exception_counts"]["locators"], 0);
}

#[tokio::test]
async fn test_exception_without_status_ignored() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-05", "2025-03-05");
    request["exceptions"] = json!([{"kind": "travel", "date": "2025-03-05"}]);

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_decimal(&day(&result, 0)["day_credit"], "0");
    assert_eq!(day(&result, 0)["exceptions"]["has_travel"], false);
    assert_eq!(result["report"]["exception_counts"]["travels"], 0);
}

#[tokio::test]
async fn test_exception_status_must_read_approved() {
    for status in [json!(1), json!("Active"), json!(true), json!("yes")] {
        let mut request = create_request(regular_schedule(), &[], "2025-03-05", "2025-03-05");
        request["exceptions"] = json!([{"kind": "locator", "date": "2025-03-05", "status": status}]);

        let (_, result) = post_compute(create_router_for_test(), request).await;

        assert_decimal(&day(&result, 0)["day_credit"], "0");
    }
}

#[tokio::test]
async fn test_holiday_without_status_ignored() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-04", "2025-03-04");
    request["holidays"] = json!([{"name": "Founding Anniversary", "date": "2025-03-04"}]);

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(day(&result, 0)["day_kind"], "workday");
}

#[tokio::test]
async fn test_holiday_without_punches_earns_nothing() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-04", "2025-03-04");
    request["holidays"] = json!([
        {"name": "Founding Anniversary", "date": "2025-03-04", "recurring": false, "status": "1"}
    ]);

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(day(&result, 0)["day_kind"], "holiday");
    assert_eq!(day(&result, 0)["remarks"], "Holiday (Founding Anniversary)");
    assert_decimal(&day(&result, 0)["day_credit"], "0");
}

#[tokio::test]
async fn test_recurring_holiday_matches_other_year() {
    let mut request = create_request(regular_schedule(), &[], "2025-06-12", "2025-06-12");
    request["holidays"] = json!([
        {"name": "Independence Day", "date": "1998-06-12", "isRecurring": "1", "status": "Active"}
    ]);

    let (_, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(day(&result, 0)["day_kind"], "holiday");
    assert_eq!(day(&result, 0)["exceptions"]["has_holiday"], true);
}

#[tokio::test]
async fn test_malformed_records_reported_as_warnings() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-03", "2025-03-03");
    request["exceptions"] = json!([{"kind": "fix_log", "date": "", "status": "Approved"}]);
    request["holidays"] = json!([{"name": "Undated", "status": "1"}]);

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        warning_codes(&result),
        vec!["MALFORMED_EXCEPTION", "MALFORMED_HOLIDAY"]
    );
}

// =============================================================================
// SECTION 3: Period totals
// =============================================================================

#[tokio::test]
async fn test_ten_days_of_thirty_minutes() {
    let dates = [
        "2025-03-03", "2025-03-04", "2025-03-05", "2025-03-06", "2025-03-07",
        "2025-03-10", "2025-03-11", "2025-03-12", "2025-03-13", "2025-03-14",
    ];
    let timestamps: Vec<String> = dates
        .iter()
        .flat_map(|d| {
            ["08:30", "12:00", "13:00", "17:00"]
                .iter()
                .map(move |t| format!("{} {}:00", d, t))
        })
        .collect();
    let refs: Vec<&str> = timestamps.iter().map(String::as_str).collect();
    let request = create_request(fallback_schedule(), &refs, "2025-03-03", "2025-03-14");

    let (status, result) = post_compute(create_router_for_test(), request).await;
    let summary = &result["report"]["summary"];

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["report"]["days"].as_array().unwrap().len(), 12);
    assert_eq!(summary["total_lateness_minutes"], 300);
    assert_decimal(&summary["total_days"], "10");
    assert_decimal(&summary["equivalent_days_deducted"], "0.63");
    assert_decimal(&summary["net_days"], "9.375");
}

#[tokio::test]
async fn test_seven_minutes_deducts_one_hundredth() {
    let request = create_request(
        regular_schedule(),
        &["2025-03-03 08:07:00", "2025-03-03 17:00:00"],
        "2025-03-03",
        "2025-03-03",
    );

    let (_, result) = post_compute(create_router_for_test(), request).await;
    let summary = &result["report"]["summary"];

    assert_eq!(summary["total_lateness_minutes"], 7);
    assert_eq!(summary["equivalent_days_deducted"], "0.01");
    assert_decimal(&summary["net_days"], "0.9854");
}

#[tokio::test]
async fn test_period_selector_resolves_range() {
    let mut request = create_request(regular_schedule(), &[], "2025-01-01", "2025-01-01");
    let object = request.as_object_mut().unwrap();
    object.remove("start_date");
    object.remove("end_date");
    object.insert(
        "period".to_string(),
        json!({"year": 2024, "month": 2, "period": "second_half"}),
    );

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["report"]["start_date"], "2024-02-16");
    assert_eq!(result["report"]["end_date"], "2024-02-29");
    assert_eq!(result["report"]["days"].as_array().unwrap().len(), 14);
}

#[tokio::test]
async fn test_identical_requests_give_identical_reports() {
    let request = create_request(
        regular_schedule(),
        &["2025-03-03 08:12:00", "2025-03-03 16:50:00", "2025-03-04 08:00:00"],
        "2025-03-01",
        "2025-03-31",
    );

    let (_, first) = post_compute(create_router_for_test(), request.clone()).await;
    let (_, second) = post_compute(create_router_for_test(), request).await;

    assert_eq!(first["report"], second["report"]);
    assert_ne!(first["calculation_id"], second["calculation_id"]);
}

#[tokio::test]
async fn test_audit_trace_steps() {
    let request = create_request(regular_schedule(), &[], "2025-03-01", "2025-03-03");

    let (_, result) = post_compute(create_router_for_test(), request).await;
    let steps = result["report"]["audit_trace"]["steps"].as_array().unwrap();

    assert_eq!(steps.len(), 4);
    assert_eq!(steps[0]["rule_id"], "window_resolution");
    assert_eq!(steps[1]["rule_id"], "daily_attendance");
    assert_eq!(steps[3]["input"]["date"], "2025-03-03");
}

// =============================================================================
// SECTION 4: Stored field names
// =============================================================================

#[tokio::test]
async fn test_stored_field_names_accepted() {
    let request = json!({
        "USERID": "1042",
        "assignments": [
            {
                "shiftname": "Regular",
                "shifttimemode": "AMPM",
                "shift_checkin": "1970-01-01T08:00:00.000Z",
                "shift_checkout": "1970-01-01T17:00:00.000Z"
            }
        ],
        "logs": [
            {"USERID": "1042", "CHECKTIME": "2025-03-03T08:10:00.000Z"},
            {"USERID": "1042", "CHECKTIME": "2025-03-03T17:00:00.000Z"}
        ],
        "startDate": "2025-03-03",
        "endDate": "2025-03-03"
    });

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["report"]["schedule_name"], "Regular");
    assert_eq!(day(&result, 0)["am_check_in"], "08:10:00");
    assert_eq!(day(&result, 0)["pm_check_out"], "17:00:00");
    assert_decimal(&day(&result, 0)["day_credit"], "1");
}

#[tokio::test]
async fn test_bad_and_foreign_punches_become_warnings() {
    let mut request = create_request(
        regular_schedule(),
        &["03/03/2025 08:00", "2025-03-03 08:00:00"],
        "2025-03-03",
        "2025-03-03",
    );
    request["punches"]
        .as_array_mut()
        .unwrap()
        .push(json!({"employee_id": "2000", "timestamp": "2025-03-03 12:00:00"}));

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        warning_codes(&result),
        vec!["UNPARSEABLE_TIMESTAMP", "FOREIGN_PUNCH"]
    );
    assert_eq!(day(&result, 0)["am_check_in"], "08:00:00");
    assert!(day(&result, 0)["am_check_out"].is_null());
}

// =============================================================================
// SECTION 5: Error cases
// =============================================================================

#[tokio::test]
async fn test_no_schedule_returns_404() {
    let request = create_request(json!({"name": "Empty"}), &[], "2025-03-03", "2025-03-03");

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(result["code"], "NO_SHIFT_SCHEDULE");
}

#[tokio::test]
async fn test_reversed_range_returns_400() {
    let request = create_request(regular_schedule(), &[], "2025-03-31", "2025-03-01");

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_overlong_range_returns_400() {
    let request = create_request(regular_schedule(), &[], "0001-01-01", "9999-12-31");

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_overlong_raw_logs_range_returns_400() {
    let body = json!({"punches": [], "start_date": "2000-01-01", "end_date": "2025-12-31"});

    let (status, result) = post_json(create_router_for_test(), "/raw-logs", body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_DATE_RANGE");
}

#[tokio::test]
async fn test_bad_schedule_time_returns_400() {
    let request = create_request(
        json!({"am_check_in": "eight o'clock"}),
        &[],
        "2025-03-03",
        "2025-03-03",
    );

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "INVALID_SCHEDULE");
}

#[tokio::test]
async fn test_missing_range_returns_400() {
    let mut request = create_request(regular_schedule(), &[], "2025-03-03", "2025-03-03");
    request.as_object_mut().unwrap().remove("end_date");

    let (status, result) = post_compute(create_router_for_test(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(result["code"], "VALIDATION_ERROR");
}

// =============================================================================
// SECTION 6: Batch
// =============================================================================

#[tokio::test]
async fn test_batch_of_employees() {
    let requests: Vec<Value> = (0..20)
        .map(|i| {
            let mut request = create_request(
                regular_schedule(),
                &["2025-03-03 08:00:00", "2025-03-03 17:00:00"],
                "2025-03-03",
                "2025-03-03",
            );
            request["employee_id"] = json!(format!("emp_{:02}", i));
            request["punches"] = json!([
                {"timestamp": "2025-03-03 08:00:00"},
                {"timestamp": "2025-03-03 17:00:00"}
            ]);
            request
        })
        .collect();

    let (status, result) =
        post_json(create_router_for_test(), "/compute-attendance/batch", json!(requests)).await;

    assert_eq!(status, StatusCode::OK);
    let items = result.as_array().unwrap();
    assert_eq!(items.len(), 20);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item["employee_id"], format!("emp_{:02}", i));
        assert_eq!(item["status"], 200);
        assert_decimal(&item["result"]["report"]["summary"]["total_days"], "1");
    }
}
