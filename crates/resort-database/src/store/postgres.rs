//! PostgreSQL-backed booking store.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;

use resort_core::error::{AppError, ErrorKind};
use resort_core::result::AppResult;
use resort_core::types::id::{BookingId, ReservationId, ServiceId, TimeSlotId, UserId};
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_entity::booking::{BookingStatus, PaymentStatus, ServiceBooking};
use resort_entity::reservation::RoomReservation;
use resort_entity::service::HotelService;
use resort_entity::slot::{NewTimeSlot, TimeSlot};

use super::{BookingCommit, BookingStore, CapacityGuard, CommitOutcome, SlotUpdate};
use crate::repositories::{
    BookingRepository, ReservationRepository, ServiceRepository, TimeSlotRepository,
};

/// [`BookingStore`] over the PostgreSQL repositories.
#[derive(Debug, Clone)]
pub struct PgBookingStore {
    pool: PgPool,
    services: ServiceRepository,
    slots: TimeSlotRepository,
    bookings: BookingRepository,
    reservations: ReservationRepository,
}

impl PgBookingStore {
    /// Build the store and its repositories over one pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            services: ServiceRepository::new(pool.clone()),
            slots: TimeSlotRepository::new(pool.clone()),
            bookings: BookingRepository::new(pool.clone()),
            reservations: ReservationRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl BookingStore for PgBookingStore {
    async fn create_service(&self, service: HotelService) -> AppResult<HotelService> {
        self.services.create(&service).await
    }

    async fn update_service(&self, service: HotelService) -> AppResult<Option<HotelService>> {
        self.services.update(&service).await
    }

    async fn set_service_active(
        &self,
        id: ServiceId,
        active: bool,
    ) -> AppResult<Option<HotelService>> {
        self.services.set_active(id, active).await
    }

    async fn find_service(&self, id: ServiceId) -> AppResult<Option<HotelService>> {
        self.services.find_by_id(id).await
    }

    async fn list_services(
        &self,
        active_only: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HotelService>> {
        self.services.find_all(active_only, page).await
    }

    async fn insert_slots(&self, slots: &[NewTimeSlot]) -> AppResult<u64> {
        self.slots.insert_many(slots).await
    }

    async fn list_slots(
        &self,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>> {
        self.slots.find_in_range(service_id, from, to).await
    }

    async fn find_slot(&self, id: TimeSlotId) -> AppResult<Option<TimeSlot>> {
        self.slots.find_by_id(id).await
    }

    async fn find_slot_at(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<Option<TimeSlot>> {
        self.slots.find_at(service_id, date, start_time).await
    }

    async fn update_slot(&self, id: TimeSlotId, update: SlotUpdate) -> AppResult<Option<TimeSlot>> {
        self.slots.update(id, &update).await
    }

    async fn active_bookings_on(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> AppResult<Vec<ServiceBooking>> {
        self.bookings.find_active_on(service_id, date).await
    }

    async fn find_booking(&self, id: BookingId) -> AppResult<Option<ServiceBooking>> {
        self.bookings.find_by_id(id).await
    }

    async fn list_user_bookings(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ServiceBooking>> {
        self.bookings.find_by_user(user_id, page).await
    }

    async fn commit_booking(
        &self,
        commit: BookingCommit,
        now: DateTime<Utc>,
    ) -> AppResult<CommitOutcome> {
        let result = match commit.guard {
            CapacityGuard::Slot(slot_id) => {
                let row = commit.booking.into_booking(BookingId::new(), Some(slot_id), now);
                self.bookings.commit_in_slot(&row, slot_id).await?
            }
            CapacityGuard::Aggregate { max_capacity } => {
                let row = commit.booking.into_booking(BookingId::new(), None, now);
                self.bookings.commit_aggregate(&row, max_capacity).await?
            }
        };

        Ok(match result {
            Ok(booking) => CommitOutcome::Committed(booking),
            Err(spots_left) => {
                debug!(spots_left, "Booking commit lost the capacity race");
                CommitOutcome::Unavailable { spots_left }
            }
        })
    }

    async fn transition_booking(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>> {
        self.bookings.transition(id, from, to, at).await
    }

    async fn record_payment(
        &self,
        id: BookingId,
        status: PaymentStatus,
        reference: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>> {
        self.bookings
            .record_payment(id, status, reference.as_deref(), at)
            .await
    }

    async fn find_reservation(&self, id: ReservationId) -> AppResult<Option<RoomReservation>> {
        self.reservations.find_by_id(id).await
    }

    async fn health_check(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Database unreachable", e))?;
        Ok(())
    }
}
