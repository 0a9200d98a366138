//! Hotel service repository implementation.

use sqlx::PgPool;

use resort_core::error::{AppError, ErrorKind};
use resort_core::result::AppResult;
use resort_core::types::id::ServiceId;
use resort_core::types::pagination::{PageRequest, PageResponse};
use resort_entity::service::HotelService;

/// Repository for the `hotel_services` table.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: PgPool,
}

impl ServiceRepository {
    /// Create a new service repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find a service by ID.
    pub async fn find_by_id(&self, id: ServiceId) -> AppResult<Option<HotelService>> {
        sqlx::query_as::<_, HotelService>("SELECT * FROM hotel_services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find service", e))
    }

    /// List services ordered by name, optionally only active ones.
    pub async fn find_all(
        &self,
        active_only: bool,
        page: &PageRequest,
    ) -> AppResult<PageResponse<HotelService>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM hotel_services WHERE ($1 = FALSE OR is_active = TRUE)",
        )
        .bind(active_only)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count services", e))?;

        let services = sqlx::query_as::<_, HotelService>(
            "SELECT * FROM hotel_services WHERE ($1 = FALSE OR is_active = TRUE) \
             ORDER BY name ASC, id ASC LIMIT $2 OFFSET $3",
        )
        .bind(active_only)
        .bind(page.limit() as i64)
        .bind(page.offset() as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list services", e))?;

        Ok(PageResponse::new(services, page, total as u64))
    }

    /// Insert a service row.
    pub async fn create(&self, service: &HotelService) -> AppResult<HotelService> {
        sqlx::query_as::<_, HotelService>(
            "INSERT INTO hotel_services (id, name, description, images, service_type, category, \
             price, price_per_person, duration, min_capacity, max_capacity, is_active, \
             available_days, start_time, end_time, slot_interval, advance_booking_hours, \
             requires_reservation, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20) \
             RETURNING *",
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.images)
        .bind(service.service_type)
        .bind(service.category)
        .bind(service.price)
        .bind(service.price_per_person)
        .bind(service.duration)
        .bind(service.min_capacity)
        .bind(service.max_capacity)
        .bind(service.is_active)
        .bind(&service.available_days)
        .bind(&service.start_time)
        .bind(&service.end_time)
        .bind(service.slot_interval)
        .bind(service.advance_booking_hours)
        .bind(service.requires_reservation)
        .bind(service.created_at)
        .bind(service.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create service", e))
    }

    /// Overwrite all editable columns of a service.
    pub async fn update(&self, service: &HotelService) -> AppResult<Option<HotelService>> {
        sqlx::query_as::<_, HotelService>(
            "UPDATE hotel_services SET name = $2, description = $3, images = $4, \
             service_type = $5, category = $6, price = $7, price_per_person = $8, \
             duration = $9, min_capacity = $10, max_capacity = $11, is_active = $12, \
             available_days = $13, start_time = $14, end_time = $15, slot_interval = $16, \
             advance_booking_hours = $17, requires_reservation = $18, updated_at = $19 \
             WHERE id = $1 RETURNING *",
        )
        .bind(service.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(&service.images)
        .bind(service.service_type)
        .bind(service.category)
        .bind(service.price)
        .bind(service.price_per_person)
        .bind(service.duration)
        .bind(service.min_capacity)
        .bind(service.max_capacity)
        .bind(service.is_active)
        .bind(&service.available_days)
        .bind(&service.start_time)
        .bind(&service.end_time)
        .bind(service.slot_interval)
        .bind(service.advance_booking_hours)
        .bind(service.requires_reservation)
        .bind(service.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update service", e))
    }

    /// Toggle the soft-enable flag.
    pub async fn set_active(&self, id: ServiceId, active: bool) -> AppResult<Option<HotelService>> {
        sqlx::query_as::<_, HotelService>(
            "UPDATE hotel_services SET is_active = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to change service state", e)
        })
    }
}
