//! The availability engine.
//!
//! Pure functions over service configuration, slots and bookings: schedule
//! expansion, admission checks, listings, pricing and occupancy rollups.
//! Nothing here touches storage or the clock; callers pass "now" in as
//! hotel-local wall-clock time.

pub mod admission;
pub mod listing;
pub mod pricing;
pub mod rollup;
pub mod schedule;

pub use admission::{Admission, Rejection, check_availability, check_slot_admission};
pub use listing::{SlotView, generate_time_slots, slot_views};
pub use pricing::{calculate_service_price, format_duration};
pub use rollup::{DailyOccupancy, OccupancySummary, daily_occupancy};
pub use schedule::{ClockTime, Schedule, ScheduleError, expand_schedule};
