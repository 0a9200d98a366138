//! Room reservation model.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use resort_core::types::id::{ReservationId, UserId};

/// Status of a room reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "reservation_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    CheckedIn,
    CheckedOut,
    Cancelled,
}

/// A guest's room stay.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoomReservation {
    /// Reservation identifier.
    pub id: ReservationId,
    /// Guest.
    pub user_id: UserId,
    /// Arrival date.
    pub check_in: NaiveDate,
    /// Departure date.
    pub check_out: NaiveDate,
    /// Current status.
    pub status: ReservationStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl RoomReservation {
    /// Whether this stay can back a service booking on `date` for `user`.
    pub fn covers(&self, user: UserId, date: NaiveDate) -> bool {
        self.user_id == user
            && matches!(
                self.status,
                ReservationStatus::Confirmed | ReservationStatus::CheckedIn
            )
            && self.check_in <= date
            && date <= self.check_out
    }
}
