//! Customer-facing slot listings for one service and date.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use resort_core::types::id::TimeSlotId;
use resort_entity::booking::ServiceBooking;
use resort_entity::service::{HotelService, Weekday};
use resort_entity::slot::TimeSlot;

use super::schedule::{Schedule, ScheduleError};

/// One bookable start time as shown to a guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotView {
    /// Session start, `HH:MM`.
    pub time: String,
    /// Session end, `HH:MM`.
    pub end_time: String,
    /// Whether at least one spot can be booked.
    pub available: bool,
    /// Remaining participants, clamped at zero.
    pub spots_left: i32,
    /// Backing slot row, when the listing comes from persisted slots.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slot_id: Option<TimeSlotId>,
}

/// Compute the listing from the schedule and the bookings already made.
///
/// Returns an empty list when the service does not run on `date`'s weekday.
pub fn generate_time_slots(
    service: &HotelService,
    date: NaiveDate,
    existing: &[ServiceBooking],
) -> Result<Vec<SlotView>, ScheduleError> {
    if !service.offers(Weekday::of(date)) {
        return Ok(Vec::new());
    }
    let schedule = Schedule::of(service)?;

    Ok(schedule
        .sessions()
        .map(|(start, end)| {
            let time = start.to_string();
            let taken: i32 = existing
                .iter()
                .filter(|b| {
                    b.booking_date == date && b.booking_time == time && b.status.holds_capacity()
                })
                .map(|b| b.participants)
                .sum();
            let spots_left = (service.max_capacity - taken).max(0);
            SlotView {
                time,
                end_time: end.to_string(),
                available: spots_left > 0,
                spots_left,
                slot_id: None,
            }
        })
        .collect())
}

/// Derive the listing from persisted slot rows, in the given order.
pub fn slot_views(slots: &[TimeSlot]) -> Vec<SlotView> {
    slots
        .iter()
        .map(|slot| {
            let spots_left = slot.available().max(0);
            SlotView {
                time: slot.start_time.clone(),
                end_time: slot.end_time.clone(),
                available: slot.is_available && spots_left > 0,
                spots_left,
                slot_id: Some(slot.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::test_support::{booking_at, monday, slot, spa};
    use resort_entity::booking::BookingStatus;

    #[test]
    fn test_listing_counts_bookings_per_time() {
        let service = spa("09:00", "12:00", 60, 60);
        let existing = vec![
            booking_at(&service, "09:00", 10, BookingStatus::Confirmed),
            booking_at(&service, "10:00", 4, BookingStatus::Pending),
            booking_at(&service, "10:00", 5, BookingStatus::Cancelled),
        ];
        let views = generate_time_slots(&service, monday(), &existing).unwrap();

        assert_eq!(views.len(), 3);
        assert_eq!((views[0].available, views[0].spots_left), (false, 0));
        assert_eq!((views[1].available, views[1].spots_left), (true, 6));
        assert_eq!((views[2].available, views[2].spots_left), (true, 10));
        assert_eq!(views[2].end_time, "12:00");
    }

    #[test]
    fn test_listing_empty_on_unoffered_day() {
        let service = spa("09:00", "12:00", 60, 60);
        let sunday = monday().pred_opt().unwrap();
        assert!(generate_time_slots(&service, sunday, &[]).unwrap().is_empty());
    }

    #[test]
    fn test_listing_clamps_overbooked_time() {
        let service = spa("09:00", "10:00", 60, 60);
        let existing = vec![booking_at(&service, "09:00", 12, BookingStatus::Confirmed)];
        let views = generate_time_slots(&service, monday(), &existing).unwrap();
        assert_eq!(views[0].spots_left, 0);
        assert!(!views[0].available);
    }

    #[test]
    fn test_slot_views_respect_closed_and_negative() {
        let service = spa("09:00", "12:00", 60, 60);
        let open = slot(&service, "09:00", 10, 3);
        let mut closed = slot(&service, "10:00", 10, 0);
        closed.is_available = false;
        let cut = slot(&service, "11:00", 2, 5);

        let views = slot_views(&[open.clone(), closed, cut]);
        assert_eq!(views[0].spots_left, 7);
        assert_eq!(views[0].slot_id, Some(open.id));
        assert!(!views[1].available);
        assert_eq!(views[1].spots_left, 10);
        assert_eq!((views[2].available, views[2].spots_left), (false, 0));
    }
}
