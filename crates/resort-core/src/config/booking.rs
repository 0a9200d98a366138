//! Booking engine configuration.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Which data-access backend holds services, slots and bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// PostgreSQL via sqlx (production).
    #[default]
    Postgres,
    /// Process-local store guarded by a Tokio mutex (single node, demos, tests).
    Memory,
}

/// Settings for slot generation and booking admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Data-access backend.
    #[serde(default)]
    pub store: StoreBackend,
    /// Offset of hotel local time from UTC, in minutes. Booking dates and
    /// times are wall-clock values in this offset.
    #[serde(default)]
    pub utc_offset_minutes: i32,
    /// Largest inclusive date range accepted by a single slot generation.
    #[serde(default = "default_max_generation_days")]
    pub max_generation_days: u32,
    /// Hard ceiling on `max_capacity` accepted for any service.
    #[serde(default = "default_max_participants")]
    pub max_participants_per_booking: i32,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            store: StoreBackend::default(),
            utc_offset_minutes: 0,
            max_generation_days: default_max_generation_days(),
            max_participants_per_booking: default_max_participants(),
        }
    }
}

impl BookingConfig {
    /// The hotel's fixed UTC offset.
    pub fn local_offset(&self) -> Result<FixedOffset, AppError> {
        FixedOffset::east_opt(self.utc_offset_minutes * 60).ok_or_else(|| {
            AppError::configuration(format!(
                "booking.utc_offset_minutes out of range: {}",
                self.utc_offset_minutes
            ))
        })
    }

    /// Check the section for values that would make the engine misbehave.
    pub fn validate(&self) -> Result<(), AppError> {
        self.local_offset()?;
        if self.max_generation_days == 0 {
            return Err(AppError::configuration(
                "booking.max_generation_days must be positive",
            ));
        }
        if self.max_participants_per_booking < 1 {
            return Err(AppError::configuration(
                "booking.max_participants_per_booking must be positive",
            ));
        }
        Ok(())
    }
}

fn default_max_generation_days() -> u32 {
    366
}

fn default_max_participants() -> i32 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_offset_out_of_range_is_configuration_error() {
        let cfg = BookingConfig {
            utc_offset_minutes: 24 * 60,
            ..BookingConfig::default()
        };
        let err = cfg.validate().expect_err("offset should be rejected");
        assert!(err.is(crate::error::ErrorKind::Configuration));
    }

    #[test]
    fn test_local_offset() {
        let cfg = BookingConfig {
            utc_offset_minutes: -300,
            ..BookingConfig::default()
        };
        assert_eq!(cfg.local_offset().expect("valid").local_minus_utc(), -300 * 60);
    }
}
