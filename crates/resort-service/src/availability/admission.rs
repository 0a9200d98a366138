//! Admission checks for a requested booking.
//!
//! Gates run in a fixed order and the first failing gate is the reported
//! reason: service active, weekday, participant bounds, occupancy, lead
//! time. Rejections are ordinary values.

use std::fmt;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use resort_entity::booking::ServiceBooking;
use resort_entity::service::{HotelService, Weekday};
use resort_entity::slot::TimeSlot;

use super::schedule::{ClockTime, ScheduleError};

/// Why a booking request cannot be admitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rejection {
    /// The service is switched off.
    ServiceInactive,
    /// The service does not run on this weekday.
    NotOfferedOnWeekday {
        /// Weekday of the requested date.
        day: Weekday,
    },
    /// Fewer participants than the service accepts.
    BelowMinimum {
        /// Smallest accepted group.
        minimum: i32,
    },
    /// More participants than a session holds.
    AboveMaximum {
        /// Largest accepted group.
        maximum: i32,
    },
    /// Not enough room left at the requested time.
    InsufficientSpots {
        /// Remaining participants, never negative.
        spots_left: i32,
    },
    /// The slot was closed by an operator.
    SlotClosed,
    /// The session starts too soon.
    InsufficientNotice {
        /// Required lead time.
        hours: i32,
    },
    /// No session of this service starts at the requested time.
    NotOnSchedule {
        /// Requested start time.
        time: String,
    },
    /// The service needs a room reservation and none was given.
    ReservationRequired,
    /// The given reservation does not cover the booking date for this guest.
    ReservationNotValid,
    /// Another booking took the remaining room between check and commit.
    SlotNoLongerAvailable {
        /// Remaining participants at commit time, never negative.
        spots_left: i32,
    },
}

impl Rejection {
    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ServiceInactive => "SERVICE_INACTIVE",
            Self::NotOfferedOnWeekday { .. } => "NOT_OFFERED_ON_WEEKDAY",
            Self::BelowMinimum { .. } => "BELOW_MINIMUM",
            Self::AboveMaximum { .. } => "ABOVE_MAXIMUM",
            Self::InsufficientSpots { .. } => "INSUFFICIENT_SPOTS",
            Self::SlotClosed => "SLOT_CLOSED",
            Self::InsufficientNotice { .. } => "INSUFFICIENT_NOTICE",
            Self::NotOnSchedule { .. } => "NOT_ON_SCHEDULE",
            Self::ReservationRequired => "RESERVATION_REQUIRED",
            Self::ReservationNotValid => "RESERVATION_NOT_VALID",
            Self::SlotNoLongerAvailable { .. } => "SLOT_NO_LONGER_AVAILABLE",
        }
    }

    /// Whether trying again may succeed without changing the request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::SlotNoLongerAvailable { .. })
    }

    /// Message suitable for showing to the guest.
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ServiceInactive => write!(f, "This service is currently unavailable"),
            Self::NotOfferedOnWeekday { day } => {
                let name = day.as_str();
                write!(
                    f,
                    "This service is not offered on {}{}s",
                    &name[..1],
                    name[1..].to_lowercase()
                )
            }
            Self::BelowMinimum { minimum } => write!(f, "Minimum {minimum} participants"),
            Self::AboveMaximum { maximum } => write!(f, "Maximum {maximum} participants"),
            Self::InsufficientSpots { spots_left } => write!(f, "Only {spots_left} spots left"),
            Self::SlotClosed => write!(f, "This time slot is closed"),
            Self::InsufficientNotice { hours } => {
                write!(f, "This service requires at least {hours} hours advance notice")
            }
            Self::NotOnSchedule { time } => write!(f, "No session starts at {time}"),
            Self::ReservationRequired => {
                write!(f, "A room reservation is required for this service")
            }
            Self::ReservationNotValid => {
                write!(f, "The room reservation does not cover this date")
            }
            Self::SlotNoLongerAvailable { .. } => {
                write!(f, "This time slot is no longer available, please try again")
            }
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Admission {
    /// The request fits. `spots_left` is the room before this booking.
    Admitted {
        /// Remaining participants before admitting the request.
        spots_left: i32,
    },
    /// The request was refused.
    Rejected(Rejection),
}

impl Admission {
    /// Whether the request was admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }

    /// The rejection, if any.
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Admitted { .. } => None,
            Self::Rejected(r) => Some(r),
        }
    }
}

impl From<Result<i32, Rejection>> for Admission {
    fn from(result: Result<i32, Rejection>) -> Self {
        match result {
            Ok(spots_left) => Self::Admitted { spots_left },
            Err(rejection) => Self::Rejected(rejection),
        }
    }
}

/// Check a request against the service and the bookings already made for
/// the same date.
///
/// `existing` may contain bookings at other times or in cancelled state;
/// only those holding capacity at exactly `time` count. `now` is the
/// current hotel-local wall-clock time.
pub fn check_availability(
    service: &HotelService,
    date: NaiveDate,
    time: ClockTime,
    participants: i32,
    existing: &[ServiceBooking],
    now: NaiveDateTime,
) -> Admission {
    let run = || -> Result<i32, Rejection> {
        static_gates(service, date, participants)?;

        let key = time.to_string();
        let taken: i32 = existing
            .iter()
            .filter(|b| {
                b.service_id == service.id
                    && b.booking_date == date
                    && b.booking_time == key
                    && b.status.holds_capacity()
            })
            .map(|b| b.participants)
            .sum();
        let spots_left = service.max_capacity - taken;
        if spots_left < participants {
            return Err(Rejection::InsufficientSpots {
                spots_left: spots_left.max(0),
            });
        }

        lead_time_gate(service, time.on(date), now)?;
        Ok(spots_left)
    };
    run().into()
}

/// Same gates as [`check_availability`], with occupancy taken from a
/// materialized slot row.
///
/// Fails only when the slot's stored start time is corrupt.
pub fn check_slot_admission(
    service: &HotelService,
    slot: &TimeSlot,
    participants: i32,
    now: NaiveDateTime,
) -> Result<Admission, ScheduleError> {
    let start: ClockTime = slot.start_time.parse()?;
    let run = || -> Result<i32, Rejection> {
        static_gates(service, slot.date, participants)?;

        if !slot.is_available {
            return Err(Rejection::SlotClosed);
        }
        let spots_left = slot.available();
        if spots_left < participants {
            return Err(Rejection::InsufficientSpots {
                spots_left: spots_left.max(0),
            });
        }

        lead_time_gate(service, start.on(slot.date), now)?;
        Ok(spots_left)
    };
    Ok(run().into())
}

fn static_gates(service: &HotelService, date: NaiveDate, participants: i32) -> Result<(), Rejection> {
    if !service.is_active {
        return Err(Rejection::ServiceInactive);
    }
    let day = Weekday::of(date);
    if !service.offers(day) {
        return Err(Rejection::NotOfferedOnWeekday { day });
    }
    if participants < service.min_capacity {
        return Err(Rejection::BelowMinimum {
            minimum: service.min_capacity,
        });
    }
    if participants > service.max_capacity {
        return Err(Rejection::AboveMaximum {
            maximum: service.max_capacity,
        });
    }
    Ok(())
}

fn lead_time_gate(
    service: &HotelService,
    starts_at: NaiveDateTime,
    now: NaiveDateTime,
) -> Result<(), Rejection> {
    let required = Duration::hours(i64::from(service.advance_booking_hours));
    if starts_at - now < required {
        return Err(Rejection::InsufficientNotice {
            hours: service.advance_booking_hours,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::test_support::{booking_at, monday, spa};
    use resort_entity::booking::BookingStatus;

    fn ten(time: &str) -> ClockTime {
        time.parse().unwrap()
    }

    fn early() -> NaiveDateTime {
        (monday() - Duration::days(7)).and_hms_opt(8, 0, 0).unwrap()
    }

    #[test]
    fn test_weekday_gate_comes_first() {
        let service = spa("09:00", "17:00", 60, 60);
        let tuesday = monday().succ_opt().unwrap();
        let admission = check_availability(&service, tuesday, ten("10:00"), 99, &[], early());
        assert_eq!(
            admission,
            Admission::Rejected(Rejection::NotOfferedOnWeekday {
                day: Weekday::Tuesday
            })
        );
    }

    #[test]
    fn test_capacity_bounds() {
        let mut service = spa("09:00", "17:00", 60, 60);
        service.min_capacity = 2;
        service.max_capacity = 6;
        let check = |n| check_availability(&service, monday(), ten("10:00"), n, &[], early());

        assert_eq!(
            check(1),
            Admission::Rejected(Rejection::BelowMinimum { minimum: 2 })
        );
        assert_eq!(
            check(7),
            Admission::Rejected(Rejection::AboveMaximum { maximum: 6 })
        );
        assert!(check(2).is_admitted());
        assert!(check(6).is_admitted());
    }

    #[test]
    fn test_occupancy_accounting() {
        let service = spa("09:00", "17:00", 60, 60);
        let existing = vec![
            booking_at(&service, "10:00", 4, BookingStatus::Confirmed),
            booking_at(&service, "10:00", 3, BookingStatus::Pending),
            booking_at(&service, "11:00", 5, BookingStatus::Pending),
            booking_at(&service, "10:00", 6, BookingStatus::Cancelled),
        ];

        let admitted = check_availability(&service, monday(), ten("10:00"), 3, &existing, early());
        assert_eq!(admitted, Admission::Admitted { spots_left: 3 });

        let rejected = check_availability(&service, monday(), ten("10:00"), 4, &existing, early());
        assert_eq!(
            rejected,
            Admission::Rejected(Rejection::InsufficientSpots { spots_left: 3 })
        );
        assert_eq!(rejected.rejection().unwrap().message(), "Only 3 spots left");
    }

    #[test]
    fn test_no_show_still_holds_capacity() {
        let service = spa("09:00", "17:00", 60, 60);
        let existing = vec![booking_at(&service, "10:00", 9, BookingStatus::NoShow)];
        let admission = check_availability(&service, monday(), ten("10:00"), 2, &existing, early());
        assert_eq!(
            admission,
            Admission::Rejected(Rejection::InsufficientSpots { spots_left: 1 })
        );
    }

    #[test]
    fn test_lead_time_boundary() {
        let mut service = spa("09:00", "17:00", 60, 60);
        service.advance_booking_hours = 24;
        let starts = ten("10:00").on(monday());

        let exact = check_availability(
            &service,
            monday(),
            ten("10:00"),
            1,
            &[],
            starts - Duration::hours(24),
        );
        assert!(exact.is_admitted());

        let short = check_availability(
            &service,
            monday(),
            ten("10:00"),
            1,
            &[],
            starts - Duration::hours(23),
        );
        assert_eq!(
            short,
            Admission::Rejected(Rejection::InsufficientNotice { hours: 24 })
        );
    }

    #[test]
    fn test_occupancy_reported_before_lead_time() {
        let mut service = spa("09:00", "17:00", 60, 60);
        service.advance_booking_hours = 48;
        let existing = vec![booking_at(&service, "10:00", 10, BookingStatus::Confirmed)];
        let now = ten("09:00").on(monday());
        let admission = check_availability(&service, monday(), ten("10:00"), 1, &existing, now);
        assert_eq!(
            admission,
            Admission::Rejected(Rejection::InsufficientSpots { spots_left: 0 })
        );
    }

    #[test]
    fn test_inactive_service_rejected() {
        let mut service = spa("09:00", "17:00", 60, 60);
        service.is_active = false;
        let admission = check_availability(&service, monday(), ten("10:00"), 1, &[], early());
        assert_eq!(admission, Admission::Rejected(Rejection::ServiceInactive));
    }

    #[test]
    fn test_slot_admission_uses_row_counts() {
        let service = spa("09:00", "17:00", 60, 60);
        let mut slot = crate::availability::test_support::slot(&service, "10:00", 10, 8);

        let admission = check_slot_admission(&service, &slot, 2, early()).unwrap();
        assert_eq!(admission, Admission::Admitted { spots_left: 2 });

        let admission = check_slot_admission(&service, &slot, 3, early()).unwrap();
        assert_eq!(
            admission,
            Admission::Rejected(Rejection::InsufficientSpots { spots_left: 2 })
        );

        slot.capacity = 5;
        let admission = check_slot_admission(&service, &slot, 1, early()).unwrap();
        assert_eq!(
            admission,
            Admission::Rejected(Rejection::InsufficientSpots { spots_left: 0 })
        );

        slot.capacity = 10;
        slot.is_available = false;
        let admission = check_slot_admission(&service, &slot, 1, early()).unwrap();
        assert_eq!(admission, Admission::Rejected(Rejection::SlotClosed));
    }

    #[test]
    fn test_slot_admission_corrupt_start_time() {
        let service = spa("09:00", "17:00", 60, 60);
        let mut slot = crate::availability::test_support::slot(&service, "10:00", 10, 0);
        slot.start_time = "10h".to_string();
        assert!(check_slot_admission(&service, &slot, 1, early()).is_err());
    }

    #[test]
    fn test_only_slot_no_longer_available_is_retryable() {
        assert!(Rejection::SlotNoLongerAvailable { spots_left: 0 }.is_retryable());
        assert!(!Rejection::InsufficientSpots { spots_left: 0 }.is_retryable());
        assert!(!Rejection::SlotClosed.is_retryable());
    }

    #[test]
    fn test_rejection_serializes_with_reason_tag() {
        let json = serde_json::to_value(Rejection::BelowMinimum { minimum: 2 }).unwrap();
        assert_eq!(json["reason"], "BELOW_MINIMUM");
        assert_eq!(json["minimum"], 2);
    }
}
