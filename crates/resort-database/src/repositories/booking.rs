//! Service booking repository implementation.
//!
//! Both commit paths run inside a single transaction so that the capacity
//! check and the booking insert cannot be interleaved by a concurrent
//! request.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{PgConnection, PgPool};

use resort_core::error::{AppError, ErrorKind};
use resort_core::result::AppResult;
use resort_core::types::id::{BookingId, ServiceId, TimeSlotId, UserId};
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_entity::booking::{BookingStatus, PaymentStatus, ServiceBooking};

/// Repository for the `service_bookings` table.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a booking by ID.
    pub async fn find_by_id(&self, id: BookingId) -> AppResult<Option<ServiceBooking>> {
        sqlx::query_as::<_, ServiceBooking>("SELECT * FROM service_bookings WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db("Failed to find booking"))
    }

    /// Bookings of a service on a date that still hold capacity.
    pub async fn find_active_on(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
    ) -> AppResult<Vec<ServiceBooking>> {
        sqlx::query_as::<_, ServiceBooking>(
            "SELECT * FROM service_bookings \
             WHERE service_id = $1 AND booking_date = $2 AND status <> 'CANCELLED' \
             ORDER BY booking_time ASC, created_at ASC",
        )
        .bind(service_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(db("Failed to list bookings for date"))
    }

    /// A guest's bookings, most recent session first.
    pub async fn find_by_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ServiceBooking>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM service_bookings WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(db("Failed to count bookings"))?;

        let bookings = sqlx::query_as::<_, ServiceBooking>(
            "SELECT * FROM service_bookings WHERE user_id = $1 \
             ORDER BY booking_date DESC, booking_time DESC, created_at DESC \
             LIMIT $2 OFFSET $3",
        )
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db("Failed to list bookings"))?;

        Ok(PageResponse::new(bookings, page, total as u64))
    }

    /// Reserve seats on a slot row and insert the booking.
    ///
    /// The conditional increment only succeeds while the slot is open and
    /// has room; otherwise nothing is written and the remaining capacity
    /// is returned as `Err`.
    pub async fn commit_in_slot(
        &self,
        booking: &ServiceBooking,
        slot_id: TimeSlotId,
    ) -> AppResult<Result<ServiceBooking, i32>> {
        let mut tx = self.pool.begin().await.map_err(db("Failed to begin transaction"))?;

        let reserved: Option<TimeSlotId> = sqlx::query_scalar(
            "UPDATE time_slots SET booked = booked + $2, updated_at = NOW() \
             WHERE id = $1 AND service_id = $3 AND is_available = TRUE \
             AND booked + $2 <= capacity \
             RETURNING id",
        )
        .bind(slot_id)
        .bind(booking.participants)
        .bind(booking.service_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db("Failed to reserve slot capacity"))?;

        if reserved.is_none() {
            tx.rollback().await.map_err(db("Failed to roll back"))?;
            let left: Option<i32> = sqlx::query_scalar(
                "SELECT CASE WHEN is_available THEN capacity - booked ELSE 0 END \
                 FROM time_slots WHERE id = $1",
            )
            .bind(slot_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db("Failed to read slot capacity"))?;
            return Ok(Err(left.unwrap_or(0).max(0)));
        }

        let inserted = insert(&mut tx, booking).await?;
        tx.commit().await.map_err(db("Failed to commit booking"))?;
        Ok(Ok(inserted))
    }

    /// Insert a booking for a service without slot rows.
    ///
    /// The service row is locked for the duration of the transaction so
    /// concurrent requests for the same service serialize on the re-count.
    /// A slot row generated since admission takes over as the guard.
    pub async fn commit_aggregate(
        &self,
        booking: &ServiceBooking,
        max_capacity: i32,
    ) -> AppResult<Result<ServiceBooking, i32>> {
        let mut tx = self.pool.begin().await.map_err(db("Failed to begin transaction"))?;

        sqlx::query("SELECT id FROM hotel_services WHERE id = $1 FOR UPDATE")
            .bind(booking.service_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db("Failed to lock service"))?;

        let generated: Option<TimeSlotId> = sqlx::query_scalar(
            "SELECT id FROM time_slots WHERE service_id = $1 AND date = $2 AND start_time = $3",
        )
        .bind(booking.service_id)
        .bind(booking.booking_date)
        .bind(&booking.booking_time)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db("Failed to find slot"))?;

        if let Some(slot_id) = generated {
            tx.rollback().await.map_err(db("Failed to roll back"))?;
            let row = ServiceBooking {
                time_slot_id: Some(slot_id),
                ..booking.clone()
            };
            return self.commit_in_slot(&row, slot_id).await;
        }

        let taken: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(participants), 0) FROM service_bookings \
             WHERE service_id = $1 AND booking_date = $2 AND booking_time = $3 \
             AND status <> 'CANCELLED'",
        )
        .bind(booking.service_id)
        .bind(booking.booking_date)
        .bind(&booking.booking_time)
        .fetch_one(&mut *tx)
        .await
        .map_err(db("Failed to count booked participants"))?;

        let left = max_capacity - taken as i32;
        if left < booking.participants {
            tx.rollback().await.map_err(db("Failed to roll back"))?;
            return Ok(Err(left.max(0)));
        }

        let inserted = insert(&mut tx, booking).await?;
        tx.commit().await.map_err(db("Failed to commit booking"))?;
        Ok(Ok(inserted))
    }

    /// Move a booking from `from` to `to` if it is still in `from`.
    ///
    /// Cancelling a slot-backed booking releases its participants in the
    /// same transaction. Returns `None` when the status had already moved.
    pub async fn transition(
        &self,
        id: BookingId,
        from: BookingStatus,
        to: BookingStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>> {
        let mut tx = self.pool.begin().await.map_err(db("Failed to begin transaction"))?;

        let sql = match stamp_column(to) {
            Some(column) => format!(
                "UPDATE service_bookings SET status = $3, {column} = $4, updated_at = $4 \
                 WHERE id = $1 AND status = $2 RETURNING *"
            ),
            None => "UPDATE service_bookings SET status = $3, updated_at = $4 \
                     WHERE id = $1 AND status = $2 RETURNING *"
                .to_string(),
        };

        let updated = sqlx::query_as::<_, ServiceBooking>(&sql)
            .bind(id)
            .bind(from)
            .bind(to)
            .bind(at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(db("Failed to update booking status"))?;

        let Some(booking) = updated else {
            tx.rollback().await.map_err(db("Failed to roll back"))?;
            return Ok(None);
        };

        if from.holds_capacity() && !to.holds_capacity() {
            if let Some(slot_id) = booking.time_slot_id {
                sqlx::query(
                    "UPDATE time_slots SET booked = GREATEST(booked - $2, 0), updated_at = NOW() \
                     WHERE id = $1",
                )
                .bind(slot_id)
                .bind(booking.participants)
                .execute(&mut *tx)
                .await
                .map_err(db("Failed to release slot capacity"))?;
            }
        }

        tx.commit().await.map_err(db("Failed to commit status change"))?;
        Ok(Some(booking))
    }

    /// Record a payment outcome.
    pub async fn record_payment(
        &self,
        id: BookingId,
        status: PaymentStatus,
        reference: Option<&str>,
        at: DateTime<Utc>,
    ) -> AppResult<Option<ServiceBooking>> {
        sqlx::query_as::<_, ServiceBooking>(
            "UPDATE service_bookings SET payment_status = $2, \
             payment_reference = COALESCE($3, payment_reference), updated_at = $4 \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(reference)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(db("Failed to record payment"))
    }
}

async fn insert(conn: &mut PgConnection, b: &ServiceBooking) -> AppResult<ServiceBooking> {
    sqlx::query_as::<_, ServiceBooking>(
        "INSERT INTO service_bookings (id, service_id, user_id, reservation_id, time_slot_id, \
         booking_date, booking_time, participants, total_price, status, payment_status, \
         special_requests, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14) \
         RETURNING *",
    )
    .bind(b.id)
    .bind(b.service_id)
    .bind(b.user_id)
    .bind(b.reservation_id)
    .bind(b.time_slot_id)
    .bind(b.booking_date)
    .bind(&b.booking_time)
    .bind(b.participants)
    .bind(b.total_price)
    .bind(b.status)
    .bind(b.payment_status)
    .bind(&b.special_requests)
    .bind(b.created_at)
    .bind(b.updated_at)
    .fetch_one(conn)
    .await
    .map_err(db("Failed to insert booking"))
}

fn stamp_column(status: BookingStatus) -> Option<&'static str> {
    match status {
        BookingStatus::Pending => None,
        BookingStatus::Confirmed => Some("confirmed_at"),
        BookingStatus::InProgress => Some("started_at"),
        BookingStatus::Completed => Some("completed_at"),
        BookingStatus::Cancelled => Some("cancelled_at"),
        BookingStatus::NoShow => Some("no_show_at"),
    }
}

fn db(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}
