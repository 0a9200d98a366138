//! Service booking entity model.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use resort_core::types::id::{BookingId, ReservationId, ServiceId, TimeSlotId, UserId};

use super::status::{BookingStatus, PaymentStatus};

/// A guest's commitment of `participants` to a service at a date and time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceBooking {
    /// Booking identifier.
    pub id: BookingId,
    /// Booked service.
    pub service_id: ServiceId,
    /// Guest who booked.
    pub user_id: UserId,
    /// Room reservation the booking is attached to, if any.
    pub reservation_id: Option<ReservationId>,
    /// Slot row the booking consumed, if the slot model was used.
    pub time_slot_id: Option<TimeSlotId>,
    /// Session date.
    pub booking_date: NaiveDate,
    /// Session start, `HH:MM`.
    pub booking_time: String,
    /// Number of participants.
    pub participants: i32,
    /// Price computed at creation.
    pub total_price: Decimal,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Gateway outcome.
    pub payment_status: PaymentStatus,
    /// Gateway transaction reference.
    pub payment_reference: Option<String>,
    /// Free-text requests from the guest.
    pub special_requests: Option<String>,
    /// When the booking was created.
    pub created_at: DateTime<Utc>,
    /// When it was confirmed.
    pub confirmed_at: Option<DateTime<Utc>>,
    /// When the session started.
    pub started_at: Option<DateTime<Utc>>,
    /// When the session completed.
    pub completed_at: Option<DateTime<Utc>>,
    /// When it was cancelled.
    pub cancelled_at: Option<DateTime<Utc>>,
    /// When it was marked as a no-show.
    pub no_show_at: Option<DateTime<Utc>>,
    /// Last modification.
    pub updated_at: DateTime<Utc>,
}

impl ServiceBooking {
    /// Apply a status change and stamp the matching timestamp.
    ///
    /// Legality is checked by the caller with [`BookingStatus::can_transition_to`].
    pub fn stamp(&mut self, status: BookingStatus, at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = at;
        match status {
            BookingStatus::Pending => {}
            BookingStatus::Confirmed => self.confirmed_at = Some(at),
            BookingStatus::InProgress => self.started_at = Some(at),
            BookingStatus::Completed => self.completed_at = Some(at),
            BookingStatus::Cancelled => self.cancelled_at = Some(at),
            BookingStatus::NoShow => self.no_show_at = Some(at),
        }
    }
}

/// Fields needed to insert a booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    /// Booked service.
    pub service_id: ServiceId,
    /// Guest.
    pub user_id: UserId,
    /// Attached room reservation.
    pub reservation_id: Option<ReservationId>,
    /// Session date.
    pub booking_date: NaiveDate,
    /// Session start, `HH:MM`.
    pub booking_time: String,
    /// Number of participants.
    pub participants: i32,
    /// Frozen price.
    pub total_price: Decimal,
    /// Free-text requests.
    pub special_requests: Option<String>,
}

impl NewBooking {
    /// Materialize into a `PENDING` row.
    pub fn into_booking(
        self,
        id: BookingId,
        time_slot_id: Option<TimeSlotId>,
        now: DateTime<Utc>,
    ) -> ServiceBooking {
        ServiceBooking {
            id,
            service_id: self.service_id,
            user_id: self.user_id,
            reservation_id: self.reservation_id,
            time_slot_id,
            booking_date: self.booking_date,
            booking_time: self.booking_time,
            participants: self.participants,
            total_price: self.total_price,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
            payment_reference: None,
            special_requests: self.special_requests,
            created_at: now,
            confirmed_at: None,
            started_at: None,
            completed_at: None,
            cancelled_at: None,
            no_show_at: None,
            updated_at: now,
        }
    }
}
