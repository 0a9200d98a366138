//! Slot generation, listing and operator edits.

use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use resort_core::config::BookingConfig;
use resort_core::error::AppError;
use resort_core::types::id::{ServiceId, TimeSlotId};
use resort_database::{BookingStore, SlotUpdate};
use resort_entity::service::{HotelService, Weekday};
use resort_entity::slot::TimeSlot;

use crate::availability::{
    DailyOccupancy, OccupancySummary, ScheduleError, SlotView, daily_occupancy, expand_schedule,
    generate_time_slots, slot_views,
};
use crate::context::RequestContext;

/// What a generation run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub service_id: ServiceId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    /// Slots the schedule yields over the range.
    pub generated: u64,
    /// Slots newly written.
    pub inserted: u64,
    /// Slots that already existed and were left untouched.
    pub skipped: u64,
}

/// Occupancy of a service over a date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OccupancyReport {
    pub service_id: ServiceId,
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub summary: OccupancySummary,
    pub daily: Vec<DailyOccupancy>,
}

/// Manages materialized time slots.
#[derive(Debug, Clone)]
pub struct SlotService {
    store: Arc<dyn BookingStore>,
    config: BookingConfig,
}

impl SlotService {
    /// Creates a new slot service.
    pub fn new(store: Arc<dyn BookingStore>, config: BookingConfig) -> Self {
        Self { store, config }
    }

    /// Expand a service's schedule over `from..=to` and persist the slots.
    ///
    /// Running the same range twice inserts nothing the second time.
    pub async fn generate(
        &self,
        ctx: &RequestContext,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<GenerationReport, AppError> {
        ctx.require_staff()?;
        self.check_range(from, to)?;

        let service = self.service(service_id).await?;
        let slots = expand_schedule(&service, from, to).map_err(|e| schedule_fault(&service, e))?;
        let inserted = self.store.insert_slots(&slots).await?;
        let generated = slots.len() as u64;

        info!(
            service_id = %service_id,
            %from,
            %to,
            generated,
            inserted,
            actor = %ctx.user_id,
            "Time slots generated"
        );

        Ok(GenerationReport {
            service_id,
            from,
            to,
            generated,
            inserted,
            skipped: generated.saturating_sub(inserted),
        })
    }

    /// Raw slot rows for operators.
    pub async fn list(
        &self,
        ctx: &RequestContext,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<TimeSlot>, AppError> {
        ctx.require_staff()?;
        self.check_range(from, to)?;
        self.service(service_id).await?;
        self.store.list_slots(service_id, from, to).await
    }

    /// What a guest can book on `date`.
    ///
    /// Uses persisted slots when the date has any, otherwise computes the
    /// listing from the schedule and the bookings already made.
    pub async fn availability(
        &self,
        ctx: &RequestContext,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> Result<Vec<SlotView>, AppError> {
        let service = self.service(service_id).await?;
        if !service.is_active && !ctx.is_staff() {
            return Err(AppError::not_found(format!("Service {service_id} not found")));
        }
        if !service.offers(Weekday::of(date)) {
            return Ok(Vec::new());
        }

        let slots = self.store.list_slots(service_id, date, date).await?;
        if !slots.is_empty() {
            return Ok(slot_views(&slots));
        }

        let existing = self.store.active_bookings_on(service_id, date).await?;
        generate_time_slots(&service, date, &existing).map_err(|e| schedule_fault(&service, e))
    }

    /// Change a slot's capacity or open/closed flag.
    ///
    /// Capacity may be cut below the current bookings; the slot then shows
    /// negative availability until bookings are cancelled.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        slot_id: TimeSlotId,
        update: SlotUpdate,
    ) -> Result<TimeSlot, AppError> {
        ctx.require_staff()?;
        if update.capacity.is_some_and(|c| c < 0) {
            return Err(AppError::validation("Capacity must not be negative"));
        }
        if update.capacity.is_some_and(|c| c > self.config.max_participants_per_booking) {
            return Err(AppError::validation(format!(
                "Capacity may not exceed {}",
                self.config.max_participants_per_booking
            )));
        }

        let slot = self
            .store
            .update_slot(slot_id, update)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Time slot {slot_id} not found")))?;

        if slot.available() < 0 {
            warn!(
                slot_id = %slot_id,
                capacity = slot.capacity,
                booked = slot.booked,
                "Slot capacity set below existing bookings"
            );
        }
        info!(slot_id = %slot_id, actor = %ctx.user_id, "Time slot updated");
        Ok(slot)
    }

    /// Occupancy rollup for dashboards.
    pub async fn occupancy(
        &self,
        ctx: &RequestContext,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<OccupancyReport, AppError> {
        let slots = self.list(ctx, service_id, from, to).await?;
        Ok(OccupancyReport {
            service_id,
            from,
            to,
            summary: OccupancySummary::of(&slots),
            daily: daily_occupancy(&slots),
        })
    }

    async fn service(&self, id: ServiceId) -> Result<HotelService, AppError> {
        self.store
            .find_service(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {id} not found")))
    }

    fn check_range(&self, from: NaiveDate, to: NaiveDate) -> Result<(), AppError> {
        if from > to {
            return Err(ScheduleError::InvertedRange { from, to }.into());
        }
        let days = (to - from).num_days() + 1;
        if days > i64::from(self.config.max_generation_days) {
            return Err(AppError::validation(format!(
                "Date range spans {days} days, at most {} allowed",
                self.config.max_generation_days
            )));
        }
        Ok(())
    }
}

/// Log and convert a schedule problem found on a stored service.
pub(crate) fn schedule_fault(service: &HotelService, err: ScheduleError) -> AppError {
    error!(service_id = %service.id, error = %err, "Service schedule is corrupt");
    err.into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Harness, monday};
    use resort_core::error::ErrorKind;

    #[tokio::test]
    async fn test_generate_is_idempotent() {
        let h = Harness::new().await;
        let first = h
            .slots
            .generate(&h.staff, h.service.id, monday(), monday() + chrono::Duration::days(6))
            .await
            .unwrap();
        assert_eq!(first.generated, 2);
        assert_eq!(first.inserted, 2);

        let second = h
            .slots
            .generate(&h.staff, h.service.id, monday(), monday() + chrono::Duration::days(6))
            .await
            .unwrap();
        assert_eq!(second.inserted, 0);
        assert_eq!(second.skipped, 2);
    }

    #[tokio::test]
    async fn test_generate_requires_staff_and_bounded_range() {
        let h = Harness::new().await;
        let err = h
            .slots
            .generate(&h.guest, h.service.id, monday(), monday())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Authorization));

        let err = h
            .slots
            .generate(&h.staff, h.service.id, monday(), monday() + chrono::Duration::days(400))
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));

        let err = h
            .slots
            .generate(&h.staff, h.service.id, monday().succ_opt().unwrap(), monday())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn test_availability_prefers_persisted_slots() {
        let h = Harness::new().await;
        let computed = h.slots.availability(&h.guest, h.service.id, monday()).await.unwrap();
        assert_eq!(computed.len(), 2);
        assert!(computed.iter().all(|v| v.slot_id.is_none()));

        h.slots
            .generate(&h.staff, h.service.id, monday(), monday())
            .await
            .unwrap();
        let persisted = h.slots.availability(&h.guest, h.service.id, monday()).await.unwrap();
        assert_eq!(persisted.len(), 2);
        assert!(persisted.iter().all(|v| v.slot_id.is_some()));

        let tuesday = monday().succ_opt().unwrap();
        assert!(h.slots.availability(&h.guest, h.service.id, tuesday).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capacity_cut_shows_in_occupancy() {
        let h = Harness::new().await;
        h.slots
            .generate(&h.staff, h.service.id, monday(), monday())
            .await
            .unwrap();
        let slot = h.slots.list(&h.staff, h.service.id, monday(), monday()).await.unwrap()[0].clone();

        let updated = h
            .slots
            .update(
                &h.staff,
                slot.id,
                SlotUpdate {
                    capacity: Some(0),
                    is_available: Some(false),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.capacity, 0);
        assert!(!updated.is_available);

        let report = h
            .slots
            .occupancy(&h.staff, h.service.id, monday(), monday())
            .await
            .unwrap();
        assert_eq!(report.summary.total_slots, 2);
        assert_eq!(report.summary.closed_slots, 1);
        assert_eq!(report.daily.len(), 1);
    }

    #[tokio::test]
    async fn test_corrupt_schedule_is_configuration_error() {
        let h = Harness::new().await;
        let mut broken = h.service.clone();
        broken.start_time = "nine".to_string();
        h.store.update_service(broken).await.unwrap();

        let err = h
            .slots
            .generate(&h.staff, h.service.id, monday(), monday())
            .await
            .unwrap_err();
        assert!(err.is(ErrorKind::Configuration));
    }
}
