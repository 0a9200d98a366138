//! Time slot repository implementation.

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use resort_core::error::{AppError, ErrorKind};
use resort_core::result::AppResult;
use resort_core::types::id::{ServiceId, TimeSlotId};
use resort_entity::slot::{NewTimeSlot, TimeSlot};

use crate::store::SlotUpdate;

/// Repository for the `time_slots` table.
#[derive(Debug, Clone)]
pub struct TimeSlotRepository {
    pool: PgPool,
}

impl TimeSlotRepository {
    /// Create a new time slot repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a slot by ID.
    pub async fn find_by_id(&self, id: TimeSlotId) -> AppResult<Option<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>("SELECT * FROM time_slots WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find slot", e))
    }

    /// Find the slot of a service starting at `start_time` on `date`.
    pub async fn find_at(
        &self,
        service_id: ServiceId,
        date: NaiveDate,
        start_time: &str,
    ) -> AppResult<Option<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE service_id = $1 AND date = $2 AND start_time = $3",
        )
        .bind(service_id)
        .bind(date)
        .bind(start_time)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find slot", e))
    }

    /// List slots of a service in an inclusive date range, date then time ascending.
    pub async fn find_in_range(
        &self,
        service_id: ServiceId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> AppResult<Vec<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "SELECT * FROM time_slots WHERE service_id = $1 AND date BETWEEN $2 AND $3 \
             ORDER BY date ASC, start_time ASC",
        )
        .bind(service_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list slots", e))
    }

    /// Bulk insert generated slots. Rows that already exist for the same
    /// service, date and start time are left untouched.
    ///
    /// Runs in one transaction holding the service rows `FOR UPDATE`, the
    /// same lock slot-less booking commits take. Active bookings already
    /// made at a new slot's start are linked to it and counted in `booked`.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn insert_many(&self, slots: &[NewTimeSlot]) -> AppResult<u64> {
        if slots.is_empty() {
            return Ok(0);
        }

        let ids: Vec<Uuid> = slots.iter().map(|_| Uuid::new_v4()).collect();
        let service_ids: Vec<Uuid> = slots.iter().map(|s| s.service_id.into_uuid()).collect();
        let dates: Vec<NaiveDate> = slots.iter().map(|s| s.date).collect();
        let starts: Vec<String> = slots.iter().map(|s| s.start_time.clone()).collect();
        let ends: Vec<String> = slots.iter().map(|s| s.end_time.clone()).collect();
        let capacities: Vec<i32> = slots.iter().map(|s| s.capacity).collect();

        let mut locked = service_ids.clone();
        locked.sort();
        locked.dedup();

        let mut tx = self.pool.begin().await.map_err(db("Failed to begin transaction"))?;

        sqlx::query("SELECT id FROM hotel_services WHERE id = ANY($1) ORDER BY id FOR UPDATE")
            .bind(&locked)
            .fetch_all(&mut *tx)
            .await
            .map_err(db("Failed to lock services"))?;

        let inserted: Vec<Uuid> = sqlx::query_scalar(
            "INSERT INTO time_slots (id, service_id, date, start_time, end_time, capacity) \
             SELECT * FROM UNNEST($1::uuid[], $2::uuid[], $3::date[], $4::text[], $5::text[], $6::int4[]) \
             ON CONFLICT (service_id, date, start_time) DO NOTHING \
             RETURNING id",
        )
        .bind(&ids)
        .bind(&service_ids)
        .bind(&dates)
        .bind(&starts)
        .bind(&ends)
        .bind(&capacities)
        .fetch_all(&mut *tx)
        .await
        .map_err(db("Failed to insert slots"))?;

        if !inserted.is_empty() {
            sqlx::query(
                "UPDATE service_bookings b SET time_slot_id = t.id, updated_at = NOW() \
                 FROM time_slots t \
                 WHERE t.id = ANY($1) AND b.time_slot_id IS NULL \
                 AND b.service_id = t.service_id AND b.booking_date = t.date \
                 AND b.booking_time = t.start_time AND b.status <> 'CANCELLED'",
            )
            .bind(&inserted)
            .execute(&mut *tx)
            .await
            .map_err(db("Failed to link existing bookings"))?;

            sqlx::query(
                "UPDATE time_slots t SET booked = s.total \
                 FROM (SELECT time_slot_id, SUM(participants)::int4 AS total \
                       FROM service_bookings \
                       WHERE time_slot_id = ANY($1) AND status <> 'CANCELLED' \
                       GROUP BY time_slot_id) s \
                 WHERE t.id = s.time_slot_id",
            )
            .bind(&inserted)
            .execute(&mut *tx)
            .await
            .map_err(db("Failed to count existing bookings"))?;
        }

        tx.commit().await.map_err(db("Failed to commit slots"))?;
        Ok(inserted.len() as u64)
    }

    /// Apply an operator edit. Capacity may be set below `booked`.
    pub async fn update(&self, id: TimeSlotId, update: &SlotUpdate) -> AppResult<Option<TimeSlot>> {
        sqlx::query_as::<_, TimeSlot>(
            "UPDATE time_slots SET capacity = COALESCE($2, capacity), \
             is_available = COALESCE($3, is_available), updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(update.capacity)
        .bind(update.is_available)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update slot", e))
    }
}

fn db(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}
