//! Response DTOs.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use resort_entity::service::HotelService;
use resort_entity::slot::{SlotStatus, TimeSlot};
use resort_service::availability::{Admission, Rejection, format_duration};
use resort_service::AvailabilityQuote;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status.
    pub status: String,
    /// Version.
    pub version: String,
    /// Uptime.
    pub uptime_seconds: u64,
}

/// A service with its duration rendered for display.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceDetail {
    #[serde(flatten)]
    pub service: HotelService,
    /// `format_duration(duration)`, e.g. `"1h 30min"`.
    pub duration_label: String,
}

impl From<HotelService> for ServiceDetail {
    fn from(service: HotelService) -> Self {
        let duration_label = format_duration(service.duration);
        Self {
            service,
            duration_label,
        }
    }
}

/// A persisted slot with derived occupancy fields.
#[derive(Debug, Clone, Serialize)]
pub struct SlotResponse {
    #[serde(flatten)]
    pub slot: TimeSlot,
    /// Signed remaining room.
    pub available: i32,
    pub status: SlotStatus,
}

impl From<TimeSlot> for SlotResponse {
    fn from(slot: TimeSlot) -> Self {
        Self {
            available: slot.available(),
            status: slot.status(),
            slot,
        }
    }
}

/// Outcome of an admission check or a refused booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub retryable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spots_left: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_price: Option<Decimal>,
}

impl From<&Rejection> for AdmissionResponse {
    fn from(rejection: &Rejection) -> Self {
        let spots_left = match rejection {
            Rejection::InsufficientSpots { spots_left }
            | Rejection::SlotNoLongerAvailable { spots_left } => Some(*spots_left),
            _ => None,
        };
        Self {
            available: false,
            reason: Some(rejection.code().to_string()),
            message: Some(rejection.message()),
            retryable: rejection.is_retryable(),
            spots_left,
            total_price: None,
        }
    }
}

impl From<AvailabilityQuote> for AdmissionResponse {
    fn from(quote: AvailabilityQuote) -> Self {
        match quote.admission {
            Admission::Admitted { spots_left } => Self {
                available: true,
                reason: None,
                message: None,
                retryable: false,
                spots_left: Some(spots_left),
                total_price: Some(quote.total_price),
            },
            Admission::Rejected(rejection) => Self {
                total_price: Some(quote.total_price),
                ..Self::from(&rejection)
            },
        }
    }
}
