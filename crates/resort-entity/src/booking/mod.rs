//! Service booking entities and the booking state machine.

pub mod model;
pub mod status;

pub use model::{NewBooking, ServiceBooking};
pub use status::{BookingStatus, PaymentStatus};
