//! The data-access seam between the booking services and storage.
//!
//! [`BookingStore`] is the only interface the service layer sees. The
//! PostgreSQL implementation composes the table repositories; the memory
//! implementation keeps everything behind one async mutex.

pub mod memory;
pub mod postgres;

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use resort_core::result::AppResult;
use resort_core::types::id::{BookingId, ReservationId, ServiceId, TimeSlotId, UserId};
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_entity::booking::{BookingStatus, NewBooking, PaymentStatus, ServiceBooking};
use resort_entity::reservation::RoomReservation;
use resort_entity::service::HotelService;
use resort_entity::slot::{NewTimeSlot, TimeSlot};

pub use memory::MemoryBookingStore;
pub use postgres::PgBookingStore;

/// How a booking commit proves there is room for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityGuard {
    /// Reserve seats on a materialized slot row.
    Slot(TimeSlotId),
    /// Re-count active bookings at the same date and time against the
    /// service's `max_capacity`. If a slot row for that start was generated
    /// after admission, the commit reserves on the slot instead.
    Aggregate {
        /// Ceiling for the re-count.
        max_capacity: i32,
    },
}

/// A booking ready to be written, plus its capacity guard.
#[derive(Debug, Clone)]
pub struct BookingCommit {
    /// Booking fields.
    pub booking: NewBooking,
    /// Capacity check performed atomically with the insert.
    pub guard: CapacityGuard,
}

/// Result of an atomic commit.
#[derive(Debug, Clone)]
pub enum CommitOutcome {
    /// The booking was written.
    Committed(ServiceBooking),
    /// Another booking took the room first; nothing was written.
    Unavailable {
        /// Spots remaining at the moment of the check, never negative.
        spots_left: i32,
    },
}

/// Operator edit of a single slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotUpdate {
    /// New capacity. May be below the current `booked` count.
    pub capacity: Option<i32>,
    /// Open or close the slot.
    pub is_available: Option<bool>,
}

/// Persistence operations needed by the booking platform.
#[async_trait]
pub trait BookingStore: Send + Sync + fmt::Debug + 'static {
    /// Insert a new service.
    async fn create_service(&self, service: HotelService) -> AppResult<HotelService>;

    /// Replace a service row. Returns `None` if it does not exist.
    async fn update_service(&self, service: HotelService) -> AppResult<Option<HotelService>>;

    /// Toggle a service's `is_active` flag.
    async fn set_service_active(
        &self,
        id: ServiceId,
        active: bool,
    ) -> AppResult<Option<HotelService>>;

    /// Find a service by ID.
    async fn find_service(&self, id: ServiceId) -> AppResult<Option<HotelService>>;

    /// List services ordered by name.
    async fn list_services(
        &self,
        active_only: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HotelService>>;

    /// Persist generated slots, skipping any that already exist for the same
    /// service, date and start time. Returns the number inserted.
    ///
    /// Active bookings made before a slot existed are linked to the new slot
    /// and counted in its `booked`, atomically with respect to concurrent
    /// commits for the same service.
    async fn insert_slots(&self, slots: &[NewTimeSlot]) -> AppResult<u64>;

    /// Slots of a service in an inclusive date range, ordered by date then start.
    async fn list_slots(
        &self,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>>;

    /// Find a slot by ID.
    async fn find_slot(&self, id: TimeSlotId) -> AppResult<Option<TimeSlot>>;

    /// Find the slot of a service on `date` starting at `start_time`.
    async fn find_slot_at(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<Option<TimeSlot>>;

    /// Apply an operator edit to a slot.
    async fn update_slot(&self, id: TimeSlotId, update: SlotUpdate) -> AppResult<Option<TimeSlot>>;

    /// Bookings of a service on `date` whose status still holds capacity.
    async fn active_bookings_on(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> AppResult<Vec<ServiceBooking>>;

    /// Find a booking by ID.
    async fn find_booking(&self, id: BookingId) -> AppResult<Option<ServiceBooking>>;

    /// A guest's bookings, most recent session first.
    async fn list_user_bookings(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ServiceBooking>>;

    /// Atomically check capacity and insert the booking as `PENDING`.
    async fn commit_booking(
        &self,
        commit: BookingCommit,
        now: DateTime<Utc>,
    ) -> AppResult<CommitOutcome>;

    /// Compare-and-set the booking status, releasing slot capacity when the
    /// new status no longer holds it. `None` means the booking was not in
    /// `from` (or does not exist).
    async fn transition_booking(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>>;

    /// Record a payment outcome on a booking.
    async fn record_payment(
        &self,
        id: BookingId,
        status: PaymentStatus,
        reference: Option<String>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>>;

    /// Find a room reservation by ID.
    async fn find_reservation(&self, id: ReservationId) -> AppResult<Option<RoomReservation>>;

    /// Check that the backing storage is reachable.
    async fn health_check(&self) -> AppResult<()>;
}
