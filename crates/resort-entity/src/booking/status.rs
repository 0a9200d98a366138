//! Booking and payment status enumerations.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Lifecycle of a service booking.
///
/// ```text
/// PENDING ──► CONFIRMED ──► IN_PROGRESS ──► COMPLETED
///    │            │
///    ├────────────┴──► CANCELLED
///    └────────────┴──► NO_SHOW
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created by the guest, awaiting operator confirmation.
    Pending,
    /// Confirmed by an operator.
    Confirmed,
    /// The session is running.
    InProgress,
    /// The session took place.
    Completed,
    /// Cancelled by the guest or an operator; capacity is released.
    Cancelled,
    /// The guest did not show up; capacity stays consumed.
    NoShow,
}

impl BookingStatus {
    /// Whether no further transition is allowed.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Whether the booking still counts against slot capacity.
    pub fn holds_capacity(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Pending, NoShow)
                | (Confirmed, InProgress)
                | (Confirmed, Cancelled)
                | (Confirmed, NoShow)
                | (InProgress, Completed)
        )
    }

    /// Uppercase code.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::NoShow => "NO_SHOW",
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(Self::Pending),
            "CONFIRMED" => Ok(Self::Confirmed),
            "IN_PROGRESS" => Ok(Self::InProgress),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            "NO_SHOW" => Ok(Self::NoShow),
            other => Err(format!("unknown booking status '{other}'")),
        }
    }
}

/// Outcome reported by the external payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    /// No gateway outcome yet.
    #[default]
    Pending,
    /// Captured.
    Paid,
    /// Declined or errored.
    Failed,
    /// Money returned to the guest.
    Refunded,
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "PENDING"),
            Self::Paid => write!(f, "PAID"),
            Self::Failed => write!(f, "FAILED"),
            Self::Refunded => write!(f, "REFUNDED"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_transitions() {
        assert!(BookingStatus::Pending.can_transition_to(BookingStatus::Confirmed));
        assert!(BookingStatus::Confirmed.can_transition_to(BookingStatus::InProgress));
        assert!(BookingStatus::InProgress.can_transition_to(BookingStatus::Completed));
    }

    #[test]
    fn test_side_exits_only_before_start() {
        for from in [BookingStatus::Pending, BookingStatus::Confirmed] {
            assert!(from.can_transition_to(BookingStatus::Cancelled));
            assert!(from.can_transition_to(BookingStatus::NoShow));
        }
        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::Cancelled));
        assert!(!BookingStatus::InProgress.can_transition_to(BookingStatus::NoShow));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        let all = [
            BookingStatus::Pending,
            BookingStatus::Confirmed,
            BookingStatus::InProgress,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
            BookingStatus::NoShow,
        ];
        for from in all.into_iter().filter(BookingStatus::is_terminal) {
            assert!(all.iter().all(|to| !from.can_transition_to(*to)), "{from}");
        }
    }

    #[test]
    fn test_capacity_accounting() {
        assert!(!BookingStatus::Cancelled.holds_capacity());
        assert!(BookingStatus::NoShow.holds_capacity());
    }

    #[test]
    fn test_parse_round_trip() {
        assert_eq!("in_progress".parse::<BookingStatus>(), Ok(BookingStatus::InProgress));
        assert!("LOST".parse::<BookingStatus>().is_err());
    }
}
