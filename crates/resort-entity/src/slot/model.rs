//! Time slot entity model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use resort_core::types::id::{ServiceId, TimeSlotId};

use super::status::SlotStatus;

/// A bookable instance of a service on one calendar date.
///
/// `capacity` is copied from the service at generation time and may later
/// be edited by an operator without regard to `booked`. As a consequence
/// [`TimeSlot::available`] can be negative; callers treat `available <= 0`
/// as "cannot book further", never as an error.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TimeSlot {
    /// Slot identifier.
    pub id: TimeSlotId,
    /// Owning service.
    pub service_id: ServiceId,
    /// Calendar date in hotel local time.
    pub date: NaiveDate,
    /// Start, `HH:MM`.
    pub start_time: String,
    /// End, `HH:MM`.
    pub end_time: String,
    /// Participants the slot can hold.
    pub capacity: i32,
    /// Participants committed so far.
    pub booked: i32,
    /// Manual open/closed override.
    pub is_available: bool,
    /// When the slot was generated.
    pub created_at: DateTime<Utc>,
    /// When the slot was last changed.
    pub updated_at: DateTime<Utc>,
}

impl TimeSlot {
    /// Remaining participants, possibly negative after a capacity cut.
    pub fn available(&self) -> i32 {
        self.capacity - self.booked
    }

    /// Occupancy classification.
    pub fn status(&self) -> SlotStatus {
        SlotStatus::of(self.booked, self.capacity)
    }

    /// Whether `participants` more could be committed right now.
    pub fn can_hold(&self, participants: i32) -> bool {
        self.is_available && self.available() >= participants
    }
}

/// A slot produced by schedule expansion, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTimeSlot {
    /// Owning service.
    pub service_id: ServiceId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Start, `HH:MM`.
    pub start_time: String,
    /// End, `HH:MM`.
    pub end_time: String,
    /// Initial capacity.
    pub capacity: i32,
}

impl NewTimeSlot {
    /// Materialize into a row with zero bookings.
    pub fn into_slot(self, id: TimeSlotId, now: DateTime<Utc>) -> TimeSlot {
        TimeSlot {
            id,
            service_id: self.service_id,
            date: self.date,
            start_time: self.start_time,
            end_time: self.end_time,
            capacity: self.capacity,
            booked: 0,
            is_available: true,
            created_at: now,
            updated_at: now,
        }
    }
}
