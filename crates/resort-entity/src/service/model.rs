//! Hotel service entity model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use resort_core::types::id::ServiceId;

use super::kind::{ServiceCategory, ServiceType};
use super::weekday::Weekday;

/// A bookable offering: a spa treatment or an experience.
///
/// Scheduling fields are kept in their stored form (`HH:MM` strings);
/// the availability engine parses and validates them on every use so a
/// corrupt row surfaces as a configuration error instead of an empty
/// schedule.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct HotelService {
    /// Unique service identifier.
    pub id: ServiceId,
    /// Display name.
    pub name: String,
    /// Long description.
    pub description: String,
    /// Image URLs, first is the cover.
    pub images: Vec<String>,
    /// Spa or experience.
    pub service_type: ServiceType,
    /// Subtype.
    pub category: ServiceCategory,
    /// Unit price (currency fixed by the surrounding system).
    pub price: Decimal,
    /// Whether `price` is charged once per participant.
    pub price_per_person: bool,
    /// Length of one session in minutes.
    pub duration: i32,
    /// Fewest participants accepted per booking.
    pub min_capacity: i32,
    /// Most participants a single slot can hold.
    pub max_capacity: i32,
    /// Soft-enable flag.
    pub is_active: bool,
    /// Weekdays on which the service runs.
    pub available_days: Vec<Weekday>,
    /// Opening of the operating window, `HH:MM`.
    pub start_time: String,
    /// Close of the operating window, `HH:MM`.
    pub end_time: String,
    /// Minutes between consecutive slot starts.
    pub slot_interval: i32,
    /// Minimum lead time between booking and slot start.
    pub advance_booking_hours: i32,
    /// Whether an active room reservation is a prerequisite.
    pub requires_reservation: bool,
    /// When the service was created.
    pub created_at: DateTime<Utc>,
    /// When the service was last updated.
    pub updated_at: DateTime<Utc>,
}

impl HotelService {
    /// Whether the service runs on `day`.
    pub fn offers(&self, day: Weekday) -> bool {
        self.available_days.contains(&day)
    }

    /// Build a full row from an operator draft.
    pub fn from_draft(id: ServiceId, draft: ServiceDraft, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: draft.name,
            description: draft.description,
            images: draft.images,
            service_type: draft.service_type,
            category: draft.category,
            price: draft.price,
            price_per_person: draft.price_per_person,
            duration: draft.duration,
            min_capacity: draft.min_capacity,
            max_capacity: draft.max_capacity,
            is_active: draft.is_active,
            available_days: draft.available_days,
            start_time: draft.start_time,
            end_time: draft.end_time,
            slot_interval: draft.slot_interval,
            advance_booking_hours: draft.advance_booking_hours,
            requires_reservation: draft.requires_reservation,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrite editable fields from a draft, keeping identity and creation time.
    pub fn apply_draft(&mut self, draft: ServiceDraft, now: DateTime<Utc>) {
        let id = self.id;
        let created_at = self.created_at;
        *self = Self::from_draft(id, draft, now);
        self.created_at = created_at;
    }
}

/// Operator-supplied fields for creating or replacing a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceDraft {
    /// Display name.
    pub name: String,
    /// Long description.
    #[serde(default)]
    pub description: String,
    /// Image URLs.
    #[serde(default)]
    pub images: Vec<String>,
    /// Spa or experience.
    pub service_type: ServiceType,
    /// Subtype.
    pub category: ServiceCategory,
    /// Unit price.
    pub price: Decimal,
    /// Per-person pricing flag.
    #[serde(default)]
    pub price_per_person: bool,
    /// Session length in minutes.
    pub duration: i32,
    /// Minimum participants.
    pub min_capacity: i32,
    /// Maximum participants per slot.
    pub max_capacity: i32,
    /// Soft-enable flag.
    #[serde(default = "default_true")]
    pub is_active: bool,
    /// Operating weekdays.
    pub available_days: Vec<Weekday>,
    /// Window open, `HH:MM`.
    pub start_time: String,
    /// Window close, `HH:MM`.
    pub end_time: String,
    /// Minutes between slot starts.
    pub slot_interval: i32,
    /// Minimum lead time in hours.
    #[serde(default)]
    pub advance_booking_hours: i32,
    /// Room reservation prerequisite.
    #[serde(default)]
    pub requires_reservation: bool,
}

fn default_true() -> bool {
    true
}
