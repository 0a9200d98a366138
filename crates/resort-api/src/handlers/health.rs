//! Health check handlers.

use axum::Json;
use axum::extract::State;

use resort_core::error::AppError;

use crate::dto::response::{ApiResponse, HealthResponse};
use crate::error::ApiResult;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> ApiResult<Json<ApiResponse<HealthResponse>>> {
    state
        .store
        .health_check()
        .await
        .map_err(|e| AppError::service_unavailable(format!("Booking store unreachable: {}", e.message)))?;

    Ok(Json(ApiResponse::ok(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    })))
}
