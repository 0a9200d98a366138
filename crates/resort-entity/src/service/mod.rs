//! Bookable hotel service entities.

pub mod kind;
pub mod model;
pub mod weekday;

pub use kind::{ServiceCategory, ServiceType};
pub use model::{HotelService, ServiceDraft};
pub use weekday::Weekday;
