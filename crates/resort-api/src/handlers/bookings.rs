//! Guest booking handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::Validate;

use resort_core::types::id::BookingId;
use resort_core::types::pagination::PageResponse;
use resort_entity::booking::ServiceBooking;
use resort_service::BookingOutcome;

use crate::dto::request::CreateBookingRequest;
use crate::dto::response::{AdmissionResponse, ApiResponse};
use crate::error::ApiResult;
use crate::extractors::{Caller, PaginationParams};
use crate::state::AppState;

/// POST /api/bookings
///
/// `201` with the booking, `422` with the rejection, or `409` when the
/// rejection came from losing a race and a retry may succeed.
pub async fn create_booking(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<CreateBookingRequest>,
) -> ApiResult<Response> {
    req.validate()?;

    let response = match state.bookings.book(&caller, req.into()).await? {
        BookingOutcome::Booked(booking) => {
            (StatusCode::CREATED, Json(ApiResponse::ok(booking))).into_response()
        }
        BookingOutcome::Rejected(rejection) => {
            let status = if rejection.is_retryable() {
                StatusCode::CONFLICT
            } else {
                StatusCode::UNPROCESSABLE_ENTITY
            };
            (status, Json(AdmissionResponse::from(&rejection))).into_response()
        }
    };
    Ok(response)
}

/// GET /api/bookings/mine
pub async fn list_my_bookings(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<PaginationParams>,
) -> ApiResult<Json<ApiResponse<PageResponse<ServiceBooking>>>> {
    let page = state
        .bookings
        .list_mine(&caller, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/bookings/{id}
pub async fn get_booking(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<ServiceBooking>>> {
    let booking = state.bookings.get(&caller, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// POST /api/bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BookingId>,
) -> ApiResult<Json<ApiResponse<ServiceBooking>>> {
    let booking = state.bookings.cancel(&caller, id).await?;
    Ok(Json(ApiResponse::ok(booking)))
}
