//! Operator handlers: catalog upkeep, slots, occupancy and booking lifecycle.
//!
//! Every service method called here checks the caller's role itself.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use validator::Validate;

use resort_core::types::id::{BookingId, ServiceId, TimeSlotId};
use resort_entity::booking::ServiceBooking;
use resort_service::{GenerationReport, OccupancyReport};

use crate::dto::request::{
    GenerateSlotsRequest, PaymentRequest, RangeQuery, ServiceRequest, SetActiveRequest,
    TransitionRequest, UpdateSlotRequest,
};
use crate::dto::response::{ApiResponse, ServiceDetail, SlotResponse};
use crate::error::ApiResult;
use crate::extractors::Caller;
use crate::state::AppState;

/// POST /api/admin/services
pub async fn create_service(
    State(state): State<AppState>,
    caller: Caller,
    Json(req): Json<ServiceRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<ServiceDetail>>)> {
    req.validate()?;
    let service = state.catalog.create(&caller, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(service.into()))))
}

/// PUT /api/admin/services/{id}
pub async fn update_service(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
    Json(req): Json<ServiceRequest>,
) -> ApiResult<Json<ApiResponse<ServiceDetail>>> {
    req.validate()?;
    let service = state.catalog.update(&caller, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(service.into())))
}

/// PUT /api/admin/services/{id}/active
pub async fn set_service_active(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
    Json(req): Json<SetActiveRequest>,
) -> ApiResult<Json<ApiResponse<ServiceDetail>>> {
    let service = state.catalog.set_active(&caller, id, req.is_active).await?;
    Ok(Json(ApiResponse::ok(service.into())))
}

/// POST /api/admin/services/{id}/slots/generate
pub async fn generate_slots(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
    Json(req): Json<GenerateSlotsRequest>,
) -> ApiResult<Json<ApiResponse<GenerationReport>>> {
    let report = state.slots.generate(&caller, id, req.from, req.to).await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// GET /api/admin/services/{id}/slots?from=&to=
pub async fn list_slots(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SlotResponse>>>> {
    let slots = state.slots.list(&caller, id, range.from, range.to).await?;
    Ok(Json(ApiResponse::ok(
        slots.into_iter().map(SlotResponse::from).collect(),
    )))
}

/// GET /api/admin/services/{id}/occupancy?from=&to=
pub async fn occupancy(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
    Query(range): Query<RangeQuery>,
) -> ApiResult<Json<ApiResponse<OccupancyReport>>> {
    let report = state
        .slots
        .occupancy(&caller, id, range.from, range.to)
        .await?;
    Ok(Json(ApiResponse::ok(report)))
}

/// PUT /api/admin/slots/{id}
pub async fn update_slot(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<TimeSlotId>,
    Json(req): Json<UpdateSlotRequest>,
) -> ApiResult<Json<ApiResponse<SlotResponse>>> {
    req.validate()?;
    let slot = state.slots.update(&caller, id, req.into()).await?;
    Ok(Json(ApiResponse::ok(slot.into())))
}

/// PUT /api/admin/bookings/{id}/status
pub async fn transition_booking(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BookingId>,
    Json(req): Json<TransitionRequest>,
) -> ApiResult<Json<ApiResponse<ServiceBooking>>> {
    let booking = state.bookings.transition(&caller, id, req.status).await?;
    Ok(Json(ApiResponse::ok(booking)))
}

/// PUT /api/admin/bookings/{id}/payment
pub async fn record_payment(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<BookingId>,
    Json(req): Json<PaymentRequest>,
) -> ApiResult<Json<ApiResponse<ServiceBooking>>> {
    req.validate()?;
    let booking = state
        .bookings
        .record_payment(&caller, id, req.payment_status, req.payment_reference)
        .await?;
    Ok(Json(ApiResponse::ok(booking)))
}
