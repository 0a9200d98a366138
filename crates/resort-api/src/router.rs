//! Route definitions for the resort HTTP API.
//!
//! All routes are organized by domain and mounted under `/api`.
//! The router receives `AppState` and passes it to all handlers via Axum's `State` extractor.

use axum::{
    Router, middleware as axum_middleware,
    routing::{get, post, put},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the API router with request logging.
///
/// Receives the fully-constructed `AppState` and threads it through
/// every route via `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(health_routes())
        .merge(service_routes())
        .merge(booking_routes())
        .merge(admin_routes());

    Router::new()
        .nest("/api", api_routes)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}

/// Catalog browsing and availability
fn service_routes() -> Router<AppState> {
    Router::new()
        .route("/services", get(handlers::services::list_services))
        .route("/services/{id}", get(handlers::services::get_service))
        .route(
            "/services/{id}/availability",
            get(handlers::services::availability),
        )
        .route(
            "/services/{id}/availability/check",
            post(handlers::services::check_availability),
        )
}

/// Guest bookings
fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/bookings", post(handlers::bookings::create_booking))
        .route("/bookings/mine", get(handlers::bookings::list_my_bookings))
        .route("/bookings/{id}", get(handlers::bookings::get_booking))
        .route(
            "/bookings/{id}/cancel",
            post(handlers::bookings::cancel_booking),
        )
}

/// Operator endpoints
fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/services", post(handlers::admin::create_service))
        .route("/admin/services/{id}", put(handlers::admin::update_service))
        .route(
            "/admin/services/{id}/active",
            put(handlers::admin::set_service_active),
        )
        .route(
            "/admin/services/{id}/slots/generate",
            post(handlers::admin::generate_slots),
        )
        .route(
            "/admin/services/{id}/slots",
            get(handlers::admin::list_slots),
        )
        .route(
            "/admin/services/{id}/occupancy",
            get(handlers::admin::occupancy),
        )
        .route("/admin/slots/{id}", put(handlers::admin::update_slot))
        .route(
            "/admin/bookings/{id}/status",
            put(handlers::admin::transition_booking),
        )
        .route(
            "/admin/bookings/{id}/payment",
            put(handlers::admin::record_payment),
        )
}
