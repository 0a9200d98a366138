//! Occupancy rollups over persisted slots.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use resort_entity::slot::{SlotStatus, TimeSlot};

/// Aggregate counts over a set of slots.
///
/// `available` is signed: a slot whose capacity was cut below its bookings
/// contributes a negative amount and is counted in `overbooked_slots`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OccupancySummary {
    pub total_slots: u32,
    pub empty_slots: u32,
    pub partial_slots: u32,
    pub full_slots: u32,
    /// Slots closed by an operator, whatever their occupancy.
    pub closed_slots: u32,
    pub overbooked_slots: u32,
    pub total_capacity: i64,
    pub total_booked: i64,
    pub total_available: i64,
    /// `total_booked / total_capacity`, zero when there is no capacity.
    pub occupancy_rate: f64,
}

impl OccupancySummary {
    /// Summarize `slots`.
    pub fn of<'a>(slots: impl IntoIterator<Item = &'a TimeSlot>) -> Self {
        let mut summary = Self::default();
        for slot in slots {
            summary.total_slots += 1;
            match slot.status() {
                SlotStatus::Empty => summary.empty_slots += 1,
                SlotStatus::Partial => summary.partial_slots += 1,
                SlotStatus::Full => summary.full_slots += 1,
            }
            if !slot.is_available {
                summary.closed_slots += 1;
            }
            if slot.available() < 0 {
                summary.overbooked_slots += 1;
            }
            summary.total_capacity += i64::from(slot.capacity);
            summary.total_booked += i64::from(slot.booked);
            summary.total_available += i64::from(slot.available());
        }
        if summary.total_capacity > 0 {
            summary.occupancy_rate = summary.total_booked as f64 / summary.total_capacity as f64;
        }
        summary
    }
}

/// Occupancy of one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyOccupancy {
    /// The date.
    pub date: NaiveDate,
    /// Rollup of that date's slots.
    #[serde(flatten)]
    pub summary: OccupancySummary,
}

/// Per-date rollups, ascending by date. Dates without slots are omitted.
pub fn daily_occupancy(slots: &[TimeSlot]) -> Vec<DailyOccupancy> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&TimeSlot>> = BTreeMap::new();
    for slot in slots {
        by_date.entry(slot.date).or_default().push(slot);
    }
    by_date
        .into_iter()
        .map(|(date, day)| DailyOccupancy {
            date,
            summary: OccupancySummary::of(day),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::test_support::{monday, slot, spa};

    #[test]
    fn test_summary_counts_states() {
        let service = spa("09:00", "13:00", 60, 60);
        let mut closed = slot(&service, "12:00", 10, 0);
        closed.is_available = false;
        let slots = vec![
            slot(&service, "09:00", 10, 0),
            slot(&service, "10:00", 10, 4),
            slot(&service, "11:00", 10, 10),
            closed,
        ];

        let s = OccupancySummary::of(&slots);
        assert_eq!(s.total_slots, 4);
        assert_eq!((s.empty_slots, s.partial_slots, s.full_slots), (2, 1, 1));
        assert_eq!(s.closed_slots, 1);
        assert_eq!(s.total_capacity, 40);
        assert_eq!(s.total_booked, 14);
        assert_eq!(s.total_available, 26);
        assert_eq!(s.overbooked_slots, 0);
        assert!((s.occupancy_rate - 0.35).abs() < 1e-9);
    }

    #[test]
    fn test_negative_available_is_surfaced() {
        let service = spa("09:00", "13:00", 60, 60);
        let slots = vec![slot(&service, "09:00", 3, 5), slot(&service, "10:00", 10, 2)];
        let s = OccupancySummary::of(&slots);
        assert_eq!(s.total_available, 6);
        assert_eq!(s.overbooked_slots, 1);
        assert_eq!(s.full_slots, 1);
    }

    #[test]
    fn test_empty_set_has_zero_rate() {
        let s = OccupancySummary::of(std::iter::empty());
        assert_eq!(s, OccupancySummary::default());
    }

    #[test]
    fn test_daily_groups_ascending() {
        let service = spa("09:00", "13:00", 60, 60);
        let mut later = slot(&service, "09:00", 10, 10);
        later.date = monday().succ_opt().unwrap();
        let slots = vec![later, slot(&service, "09:00", 10, 5), slot(&service, "10:00", 10, 0)];

        let days = daily_occupancy(&slots);
        assert_eq!(days.len(), 2);
        assert_eq!(days[0].date, monday());
        assert_eq!(days[0].summary.total_slots, 2);
        assert_eq!(days[1].summary.full_slots, 1);
    }
}
