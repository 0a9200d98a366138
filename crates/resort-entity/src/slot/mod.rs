//! Materialized time slot entities.

pub mod model;
pub mod status;

pub use model::{NewTimeSlot, TimeSlot};
pub use status::SlotStatus;
