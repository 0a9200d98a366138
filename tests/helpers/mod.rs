//! Shared test helpers for HTTP tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{TimeZone, Utc};
use serde_json::{Value, json};
use tower::ServiceExt;

use resort_api::AppState;
use resort_core::config::AppConfig;
use resort_core::traits::FixedClock;
use resort_core::types::id::UserId;
use resort_database::MemoryBookingStore;

/// Caller identity sent in the upstream headers.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub id: UserId,
    pub role: &'static str,
}

impl Actor {
    pub fn guest() -> Self {
        Self {
            id: UserId::new(),
            role: "guest",
        }
    }

    pub fn staff() -> Self {
        Self {
            id: UserId::new(),
            role: "staff",
        }
    }
}

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Clock frozen at 2026-02-23 08:00 UTC
    pub clock: Arc<FixedClock>,
    pub staff: Actor,
    pub guest: Actor,
}

/// Parsed response
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

impl TestApp {
    /// Create a new test application over an empty memory store
    pub fn new() -> Self {
        let store = Arc::new(MemoryBookingStore::new());
        let clock = Arc::new(FixedClock::new(
            Utc.with_ymd_and_hms(2026, 2, 23, 8, 0, 0).unwrap(),
        ));
        let state = AppState::new(AppConfig::default(), store, clock.clone())
            .expect("Failed to build state");

        Self {
            router: resort_api::build_app(state),
            clock,
            staff: Actor::staff(),
            guest: Actor::guest(),
        }
    }

    /// Make a request against the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        actor: Option<&Actor>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json");

        if let Some(actor) = actor {
            req = req
                .header("x-user-id", actor.id.to_string())
                .header("x-user-role", actor.role);
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }

    /// Create the standard massage service and return its id
    pub async fn create_massage(&self) -> String {
        let response = self
            .request("POST", "/api/admin/services", Some(massage()), Some(&self.staff))
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{}", response.body);
        response.body["data"]["id"]
            .as_str()
            .expect("service id")
            .to_string()
    }

    /// Book as `actor`
    pub async fn book(
        &self,
        actor: &Actor,
        service_id: &str,
        date: &str,
        time: &str,
        participants: i32,
    ) -> TestResponse {
        self.request(
            "POST",
            "/api/bookings",
            Some(json!({
                "service_id": service_id,
                "booking_date": date,
                "booking_time": time,
                "participants": participants,
            })),
            Some(actor),
        )
        .await
    }
}

/// Mondays only, 09:00-11:00, hour-long sessions for up to 5 guests at 40.00 each.
pub fn massage() -> Value {
    json!({
        "name": "Deep Tissue Massage",
        "description": "Sixty minutes of focused pressure",
        "service_type": "SPA",
        "category": "WELLNESS",
        "price": "40.00",
        "price_per_person": true,
        "duration": 60,
        "min_capacity": 1,
        "max_capacity": 5,
        "available_days": ["MONDAY"],
        "start_time": "09:00",
        "end_time": "11:00",
        "slot_interval": 60,
        "advance_booking_hours": 2,
    })
}

/// 2026-03-02
pub const MONDAY: &str = "2026-03-02";
/// 2026-03-03
pub const TUESDAY: &str = "2026-03-03";
