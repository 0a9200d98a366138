//! Room reservation repository implementation.

use sqlx::PgPool;

use resort_core::error::{AppError, ErrorKind};
use resort_core::result::AppResult;
use resort_core::types::id::ReservationId;
use resort_entity::reservation::RoomReservation;

/// Read access to `room_reservations`, which the room-booking side owns.
#[derive(Debug, Clone)]
pub struct ReservationRepository {
    pool: PgPool,
}

impl ReservationRepository {
    /// Create a new reservation repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a reservation by ID.
    pub async fn find_by_id(&self, id: ReservationId) -> AppResult<Option<RoomReservation>> {
        sqlx::query_as::<_, RoomReservation>("SELECT * FROM room_reservations WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find reservation", e)
            })
    }
}
