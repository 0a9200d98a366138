//! Guest-facing catalog and availability handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use validator::Validate;

use resort_core::types::id::ServiceId;
use resort_core::types::pagination::PageResponse;
use resort_service::availability::SlotView;

use crate::dto::request::{CheckAvailabilityRequest, DateQuery, ServiceFilter};
use crate::dto::response::{AdmissionResponse, ApiResponse, ServiceDetail};
use crate::error::ApiResult;
use crate::extractors::{Caller, PaginationParams};
use crate::state::AppState;

/// GET /api/services
pub async fn list_services(
    State(state): State<AppState>,
    caller: Caller,
    Query(params): Query<PaginationParams>,
    Query(filter): Query<ServiceFilter>,
) -> ApiResult<Json<ApiResponse<PageResponse<ServiceDetail>>>> {
    let page = state
        .catalog
        .list(&caller, filter.include_inactive, params.into_page_request())
        .await?;
    Ok(Json(ApiResponse::ok(page.map(ServiceDetail::from))))
}

/// GET /api/services/{id}
pub async fn get_service(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
) -> ApiResult<Json<ApiResponse<ServiceDetail>>> {
    let service = state.catalog.get(&caller, id).await?;
    Ok(Json(ApiResponse::ok(service.into())))
}

/// GET /api/services/{id}/availability?date=
pub async fn availability(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<ServiceId>,
    Query(query): Query<DateQuery>,
) -> ApiResult<Json<ApiResponse<Vec<SlotView>>>> {
    let slots = state.slots.availability(&caller, id, query.date).await?;
    Ok(Json(ApiResponse::ok(slots)))
}

/// POST /api/services/{id}/availability/check
///
/// Rejections are answered with `200` and `available: false`.
pub async fn check_availability(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<ServiceId>,
    Json(req): Json<CheckAvailabilityRequest>,
) -> ApiResult<Json<ApiResponse<AdmissionResponse>>> {
    req.validate()?;
    let quote = state
        .bookings
        .check(id, req.date, &req.time, req.participants)
        .await?;
    Ok(Json(ApiResponse::ok(quote.into())))
}
