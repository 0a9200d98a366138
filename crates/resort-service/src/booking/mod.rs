//! Service bookings.

pub mod service;


pub use service::{AvailabilityQuote, BookingOutcome, BookingRequest, BookingService};
