//! Time slot management.

pub mod service;

pub use service::{GenerationReport, OccupancyReport, SlotService};
