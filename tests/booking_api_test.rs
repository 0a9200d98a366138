//! HTTP tests for catalog, availability and booking endpoints.

mod helpers;

use axum::http::StatusCode;
use chrono::{Duration, TimeZone, Utc};
use serde_json::json;

use helpers::{Actor, MONDAY, TUESDAY, TestApp};

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/health", None, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_missing_identity_is_unauthorized() {
    let app = TestApp::new();
    let response = app.request("GET", "/api/services", None, None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["error"], "UNAUTHORIZED");

    let bogus = Actor {
        role: "concierge",
        ..Actor::guest()
    };
    let response = app.request("GET", "/api/services", None, Some(&bogus)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_guest_cannot_use_operator_routes() {
    let app = TestApp::new();
    let response = app
        .request(
            "POST",
            "/api/admin/services",
            Some(helpers::massage()),
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_service_detail_and_listing() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    let response = app
        .request("GET", &format!("/api/services/{id}"), None, Some(&app.guest))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["duration_label"], "1h");
    assert_eq!(response.body["data"]["available_days"], json!(["MONDAY"]));

    let response = app
        .request(
            "GET",
            &format!("/api/services/{id}/availability?date={MONDAY}"),
            None,
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let slots = response.body["data"].as_array().expect("slot list");
    let times: Vec<_> = slots
        .iter()
        .map(|s| (s["time"].as_str().unwrap(), s["end_time"].as_str().unwrap()))
        .collect();
    assert_eq!(times, vec![("09:00", "10:00"), ("10:00", "11:00")]);
    assert_eq!(slots[0]["spots_left"], 5);

    let response = app
        .request(
            "GET",
            &format!("/api/services/{id}/availability?date={TUESDAY}"),
            None,
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.body["data"], json!([]));
}

#[tokio::test]
async fn test_check_availability_quotes_price() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    let response = app
        .request(
            "POST",
            &format!("/api/services/{id}/availability/check"),
            Some(json!({ "date": MONDAY, "time": "10:00", "participants": 3 })),
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["available"], true);
    assert_eq!(response.body["data"]["total_price"], "120.00");

    let response = app
        .request(
            "POST",
            &format!("/api/services/{id}/availability/check"),
            Some(json!({ "date": TUESDAY, "time": "10:00", "participants": 3 })),
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let data = &response.body["data"];
    assert_eq!(data["available"], false);
    assert_eq!(data["reason"], "NOT_OFFERED_ON_WEEKDAY");
    assert_eq!(data["message"], "This service is not offered on Tuesdays");
    assert_eq!(data["retryable"], false);
}

#[tokio::test]
async fn test_booking_against_generated_slots() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    let response = app
        .request(
            "POST",
            &format!("/api/admin/services/{id}/slots/generate"),
            Some(json!({ "from": MONDAY, "to": MONDAY })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["inserted"], 2);

    let response = app
        .request(
            "POST",
            &format!("/api/admin/services/{id}/slots/generate"),
            Some(json!({ "from": MONDAY, "to": MONDAY })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.body["data"]["inserted"], 0);
    assert_eq!(response.body["data"]["skipped"], 2);

    let response = app.book(&app.guest, &id, MONDAY, "09:00", 2).await;
    assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
    assert_eq!(response.body["data"]["status"], "PENDING");
    assert_eq!(response.body["data"]["total_price"], "80.00");
    assert!(response.body["data"]["time_slot_id"].is_string());

    let response = app.book(&Actor::guest(), &id, MONDAY, "09:00", 4).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["reason"], "INSUFFICIENT_SPOTS");
    assert_eq!(response.body["spots_left"], 3);
    assert_eq!(response.body["message"], "Only 3 spots left");

    let response = app
        .request(
            "GET",
            &format!("/api/admin/services/{id}/slots?from={MONDAY}&to={MONDAY}"),
            None,
            Some(&app.staff),
        )
        .await;
    let slots = response.body["data"].as_array().expect("slots");
    assert_eq!(slots[0]["booked"], 2);
    assert_eq!(slots[0]["status"], "PARTIAL");
    assert_eq!(slots[1]["status"], "EMPTY");

    let response = app
        .request(
            "GET",
            &format!("/api/admin/services/{id}/occupancy?from={MONDAY}&to={MONDAY}"),
            None,
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["summary"]["total_booked"], 2);
    assert_eq!(response.body["data"]["summary"]["total_capacity"], 10);
    assert_eq!(response.body["data"]["daily"][0]["date"], MONDAY);
}

#[tokio::test]
async fn test_closed_slot_and_capacity_edit() {
    let app = TestApp::new();
    let id = app.create_massage().await;
    app.request(
        "POST",
        &format!("/api/admin/services/{id}/slots/generate"),
        Some(json!({ "from": MONDAY, "to": MONDAY })),
        Some(&app.staff),
    )
    .await;
    let response = app
        .request(
            "GET",
            &format!("/api/admin/services/{id}/slots?from={MONDAY}&to={MONDAY}"),
            None,
            Some(&app.staff),
        )
        .await;
    let slot_id = response.body["data"][1]["id"].as_str().unwrap().to_string();

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/slots/{slot_id}"),
            Some(json!({ "is_available": false })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["is_available"], false);

    let response = app.book(&app.guest, &id, MONDAY, "10:00", 1).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["reason"], "SLOT_CLOSED");

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/slots/{slot_id}"),
            Some(json!({ "capacity": -1 })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["error"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_lead_time_rejection() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    app.clock
        .set(Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap() + Duration::minutes(1));
    let response = app.book(&app.guest, &id, MONDAY, "09:00", 1).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["reason"], "INSUFFICIENT_NOTICE");
    assert_eq!(
        response.body["message"],
        "This service requires at least 2 hours advance notice"
    );

    let response = app.book(&app.guest, &id, MONDAY, "10:00", 1).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_booking_lifecycle() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    let response = app.book(&app.guest, &id, MONDAY, "10:00", 2).await;
    let booking_id = response.body["data"]["id"].as_str().unwrap().to_string();

    let response = app
        .request("GET", "/api/bookings/mine", None, Some(&app.guest))
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);

    let stranger = Actor::guest();
    let response = app
        .request(
            "GET",
            &format!("/api/bookings/{booking_id}"),
            None,
            Some(&stranger),
        )
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/bookings/{booking_id}/status"),
            Some(json!({ "status": "CONFIRMED" })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "CONFIRMED");
    assert!(response.body["data"]["confirmed_at"].is_string());

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/bookings/{booking_id}/payment"),
            Some(json!({ "payment_status": "PAID", "payment_reference": "txn-42" })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.body["data"]["payment_status"], "PAID");

    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/cancel"),
            None,
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["data"]["status"], "CANCELLED");

    let response = app
        .request(
            "POST",
            &format!("/api/bookings/{booking_id}/cancel"),
            None,
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);

    // cancelled capacity is free again
    let response = app.book(&stranger, &id, MONDAY, "10:00", 5).await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_invalid_requests() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    let response = app
        .request(
            "POST",
            "/api/bookings",
            Some(json!({
                "service_id": id,
                "booking_date": MONDAY,
                "booking_time": "09:00",
                "participants": 1,
                "special_requests": "x".repeat(1001),
            })),
            Some(&app.guest),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.body["details"]["special_requests"].is_array());

    let response = app.book(&app.guest, &id, MONDAY, "9:7", 1).await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    let response = app.book(&app.guest, &id, MONDAY, "09:30", 1).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["reason"], "NOT_ON_SCHEDULE");

    let mut draft = helpers::massage();
    draft["start_time"] = json!("11:00");
    draft["end_time"] = json!("09:00");
    let response = app
        .request("POST", "/api/admin/services", Some(draft), Some(&app.staff))
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_inactive_service_hidden_from_guests() {
    let app = TestApp::new();
    let id = app.create_massage().await;

    let response = app
        .request(
            "PUT",
            &format!("/api/admin/services/{id}/active"),
            Some(json!({ "is_active": false })),
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.body["data"]["is_active"], false);

    let response = app
        .request("GET", &format!("/api/services/{id}"), None, Some(&app.guest))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = app
        .request("GET", "/api/services", None, Some(&app.guest))
        .await;
    assert_eq!(response.body["data"]["total_items"], 0);

    let response = app
        .request(
            "GET",
            "/api/services?include_inactive=true",
            None,
            Some(&app.staff),
        )
        .await;
    assert_eq!(response.body["data"]["total_items"], 1);

    let response = app.book(&app.guest, &id, MONDAY, "09:00", 1).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response.body["reason"], "SERVICE_INACTIVE");
}
