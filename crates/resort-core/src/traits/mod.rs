//! Core traits defined in `resort-core` and implemented by other crates.

pub mod clock;

pub use clock::{Clock, FixedClock, SystemClock};
