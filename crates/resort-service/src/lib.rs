//! # resort-service
//!
//! The availability engine and the services that orchestrate it. The
//! engine (`availability`) is pure; the services load state through a
//! [`resort_database::BookingStore`], call the engine, and commit.
//!
//! Services follow constructor injection: the store and the clock are
//! provided at construction time via `Arc` references.

pub mod availability;
pub mod booking;
pub mod catalog;
pub mod context;
pub mod slot;

pub use booking::{AvailabilityQuote, BookingOutcome, BookingRequest, BookingService};
pub use catalog::CatalogService;
pub use context::{CallerRole, RequestContext};
pub use slot::{GenerationReport, OccupancyReport, SlotService};
