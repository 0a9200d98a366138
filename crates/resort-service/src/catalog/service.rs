//! Service catalog management.

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use resort_core::config::BookingConfig;
use resort_core::error::AppError;
use resort_core::traits::Clock;
use resort_core::types::id::ServiceId;
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_database::BookingStore;
use resort_entity::service::{HotelService, ServiceDraft};

use crate::availability::ClockTime;
use crate::context::RequestContext;

/// Shortest session the platform accepts, in minutes.
const MIN_DURATION: i32 = 15;

/// Create, edit, publish and look up hotel services.
#[derive(Debug, Clone)]
pub struct CatalogService {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    config: BookingConfig,
}

impl CatalogService {
    /// Creates a new catalog service.
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>, config: BookingConfig) -> Self {
        Self {
            store,
            clock,
            config,
        }
    }

    /// Lists services. Guests only ever see active ones.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        include_inactive: bool,
        page: PageRequest,
    ) -> Result<PageResponse<HotelService>, AppError> {
        let active_only = !(include_inactive && ctx.is_staff());
        self.store.list_services(active_only, &page).await
    }

    /// Fetches a service. Inactive services are hidden from guests.
    pub async fn get(&self, ctx: &RequestContext, id: ServiceId) -> Result<HotelService, AppError> {
        let service = self.find(id).await?;
        if !service.is_active && !ctx.is_staff() {
            return Err(AppError::not_found(format!("Service {id} not found")));
        }
        Ok(service)
    }

    /// Fetches a service regardless of its state.
    pub async fn find(&self, id: ServiceId) -> Result<HotelService, AppError> {
        self.store
            .find_service(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {id} not found")))
    }

    /// Creates a service from an operator draft.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        draft: ServiceDraft,
    ) -> Result<HotelService, AppError> {
        ctx.require_staff()?;
        validate_draft(&draft, self.config.max_participants_per_booking)?;

        let service = HotelService::from_draft(ServiceId::new(), draft, self.clock.now());
        let created = self.store.create_service(service).await?;

        info!(
            service_id = %created.id,
            name = %created.name,
            actor = %ctx.user_id,
            "Service created"
        );
        Ok(created)
    }

    /// Replaces the editable fields of a service.
    ///
    /// Slots already generated keep their capacity; regenerate or edit them
    /// to apply a new `max_capacity`.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: ServiceId,
        draft: ServiceDraft,
    ) -> Result<HotelService, AppError> {
        ctx.require_staff()?;
        validate_draft(&draft, self.config.max_participants_per_booking)?;

        let mut service = self.find(id).await?;
        service.apply_draft(draft, self.clock.now());
        let updated = self
            .store
            .update_service(service)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {id} not found")))?;

        info!(service_id = %id, actor = %ctx.user_id, "Service updated");
        Ok(updated)
    }

    /// Switches a service on or off.
    pub async fn set_active(
        &self,
        ctx: &RequestContext,
        id: ServiceId,
        active: bool,
    ) -> Result<HotelService, AppError> {
        ctx.require_staff()?;
        let service = self
            .store
            .set_service_active(id, active)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {id} not found")))?;

        info!(service_id = %id, active, actor = %ctx.user_id, "Service state changed");
        Ok(service)
    }
}

/// Check an operator draft for values the availability engine cannot run on.
pub fn validate_draft(draft: &ServiceDraft, participant_ceiling: i32) -> Result<(), AppError> {
    if draft.name.trim().is_empty() {
        return Err(AppError::validation("Service name must not be empty"));
    }
    if draft.duration < MIN_DURATION {
        return Err(AppError::validation(format!(
            "Duration must be at least {MIN_DURATION} minutes"
        )));
    }
    if draft.slot_interval <= 0 || draft.slot_interval % 5 != 0 {
        return Err(AppError::validation(
            "Slot interval must be a positive multiple of 5 minutes",
        ));
    }
    if draft.min_capacity < 1 || draft.min_capacity > draft.max_capacity {
        return Err(AppError::validation(
            "Capacity must satisfy 1 <= min_capacity <= max_capacity",
        ));
    }
    if draft.max_capacity > participant_ceiling {
        return Err(AppError::validation(format!(
            "max_capacity may not exceed {participant_ceiling}"
        )));
    }
    if draft.price < Decimal::ZERO {
        return Err(AppError::validation("Price must not be negative"));
    }
    if draft.advance_booking_hours < 0 {
        return Err(AppError::validation(
            "advance_booking_hours must not be negative",
        ));
    }
    if draft.available_days.is_empty() {
        return Err(AppError::validation("At least one weekday must be offered"));
    }

    let start: ClockTime = draft
        .start_time
        .parse()
        .map_err(|e| AppError::validation(format!("start_time: {e}")))?;
    let end: ClockTime = draft
        .end_time
        .parse()
        .map_err(|e| AppError::validation(format!("end_time: {e}")))?;
    if start >= end {
        return Err(AppError::validation("start_time must be before end_time"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use resort_core::error::ErrorKind;
    use resort_entity::service::{ServiceCategory, ServiceType, Weekday};

    fn draft() -> ServiceDraft {
        ServiceDraft {
            name: "Forest Walk".to_string(),
            description: String::new(),
            images: vec![],
            service_type: ServiceType::Experience,
            category: ServiceCategory::Nature,
            price: Decimal::new(3000, 2),
            price_per_person: true,
            duration: 90,
            min_capacity: 2,
            max_capacity: 12,
            is_active: true,
            available_days: vec![Weekday::Saturday, Weekday::Sunday],
            start_time: "08:00".to_string(),
            end_time: "16:00".to_string(),
            slot_interval: 120,
            advance_booking_hours: 12,
            requires_reservation: false,
        }
    }

    fn rejects(mutate: impl FnOnce(&mut ServiceDraft)) -> bool {
        let mut d = draft();
        mutate(&mut d);
        validate_draft(&d, 50).is_err_and(|e| e.is(ErrorKind::Validation))
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_draft(&draft(), 50).is_ok());
    }

    #[test]
    fn test_invalid_drafts() {
        assert!(rejects(|d| d.name = "  ".to_string()));
        assert!(rejects(|d| d.duration = 10));
        assert!(rejects(|d| d.slot_interval = 0));
        assert!(rejects(|d| d.slot_interval = 32));
        assert!(rejects(|d| d.min_capacity = 0));
        assert!(rejects(|d| d.min_capacity = 13));
        assert!(rejects(|d| d.max_capacity = 51));
        assert!(rejects(|d| d.price = Decimal::new(-1, 0)));
        assert!(rejects(|d| d.advance_booking_hours = -1));
        assert!(rejects(|d| d.available_days.clear()));
        assert!(rejects(|d| d.start_time = "8am".to_string()));
        assert!(rejects(|d| d.end_time = "08:00".to_string()));
    }
}
