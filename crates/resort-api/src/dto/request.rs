//! Request DTOs with validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::Validate;

use resort_core::types::id::{ReservationId, ServiceId};
use resort_database::SlotUpdate;
use resort_entity::booking::{BookingStatus, PaymentStatus};
use resort_entity::service::{ServiceCategory, ServiceDraft, ServiceType, Weekday};
use resort_service::BookingRequest;

/// Admission dry-run body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CheckAvailabilityRequest {
    /// Session date.
    pub date: NaiveDate,
    /// Session start, `HH:MM`.
    #[validate(length(min = 4, max = 5, message = "Time must be HH:MM"))]
    pub time: String,
    /// Group size.
    pub participants: i32,
}

/// Booking creation body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateBookingRequest {
    /// Service to book.
    pub service_id: ServiceId,
    /// Session date.
    pub booking_date: NaiveDate,
    /// Session start, `HH:MM`.
    #[validate(length(min = 4, max = 5, message = "Time must be HH:MM"))]
    pub booking_time: String,
    /// Group size.
    pub participants: i32,
    /// Room reservation backing the booking.
    #[serde(default)]
    pub reservation_id: Option<ReservationId>,
    /// Free-text requests.
    #[serde(default)]
    #[validate(length(max = 1000, message = "Special requests are limited to 1000 characters"))]
    pub special_requests: Option<String>,
}

impl From<CreateBookingRequest> for BookingRequest {
    fn from(req: CreateBookingRequest) -> Self {
        BookingRequest {
            service_id: req.service_id,
            booking_date: req.booking_date,
            booking_time: req.booking_time,
            participants: req.participants,
            reservation_id: req.reservation_id,
            special_requests: req.special_requests,
        }
    }
}

/// Create or replace a service (operator).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ServiceRequest {
    #[validate(length(min = 1, max = 200, message = "Name must be 1-200 characters"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 20, message = "At most 20 images"))]
    pub images: Vec<String>,
    pub service_type: ServiceType,
    pub category: ServiceCategory,
    pub price: Decimal,
    #[serde(default)]
    pub price_per_person: bool,
    #[validate(range(min = 1))]
    pub duration: i32,
    #[validate(range(min = 1))]
    pub min_capacity: i32,
    #[validate(range(min = 1))]
    pub max_capacity: i32,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[validate(length(min = 1, message = "At least one operating day is required"))]
    pub available_days: Vec<Weekday>,
    pub start_time: String,
    pub end_time: String,
    #[validate(range(min = 1))]
    pub slot_interval: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub advance_booking_hours: i32,
    #[serde(default)]
    pub requires_reservation: bool,
}

fn default_true() -> bool {
    true
}

impl From<ServiceRequest> for ServiceDraft {
    fn from(req: ServiceRequest) -> Self {
        ServiceDraft {
            name: req.name,
            description: req.description,
            images: req.images,
            service_type: req.service_type,
            category: req.category,
            price: req.price,
            price_per_person: req.price_per_person,
            duration: req.duration,
            min_capacity: req.min_capacity,
            max_capacity: req.max_capacity,
            is_active: req.is_active,
            available_days: req.available_days,
            start_time: req.start_time,
            end_time: req.end_time,
            slot_interval: req.slot_interval,
            advance_booking_hours: req.advance_booking_hours,
            requires_reservation: req.requires_reservation,
        }
    }
}

/// Toggle a service on or off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

/// Inclusive date range for slot generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateSlotsRequest {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Slot capacity / open flag edit.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateSlotRequest {
    #[serde(default)]
    #[validate(range(min = 0, message = "Capacity must not be negative"))]
    pub capacity: Option<i32>,
    #[serde(default)]
    pub is_available: Option<bool>,
}

impl From<UpdateSlotRequest> for SlotUpdate {
    fn from(req: UpdateSlotRequest) -> Self {
        SlotUpdate {
            capacity: req.capacity,
            is_available: req.is_available,
        }
    }
}

/// Booking state-machine transition (operator).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitionRequest {
    pub status: BookingStatus,
}

/// Payment gateway outcome (operator).
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct PaymentRequest {
    pub payment_status: PaymentStatus,
    #[serde(default)]
    #[validate(length(min = 1, max = 255))]
    pub payment_reference: Option<String>,
}

/// `?date=` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateQuery {
    pub date: NaiveDate,
}

/// `?from=&to=` query.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

/// Service listing filter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceFilter {
    /// Operators only: include switched-off services.
    #[serde(default)]
    pub include_inactive: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_request_rejects_long_notes() {
        let req = CreateBookingRequest {
            service_id: ServiceId::new(),
            booking_date: NaiveDate::from_ymd_opt(2026, 3, 2).unwrap(),
            booking_time: "09:00".to_string(),
            participants: 2,
            reservation_id: None,
            special_requests: Some("x".repeat(1001)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_negative_slot_capacity_is_invalid() {
        let req = UpdateSlotRequest {
            capacity: Some(-1),
            is_available: None,
        };
        assert!(req.validate().is_err());
        let req = UpdateSlotRequest {
            capacity: None,
            is_available: Some(false),
        };
        assert!(req.validate().is_ok());
    }
}
