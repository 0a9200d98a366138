//! Hotel service catalog.

pub mod service;

pub use service::{CatalogService, validate_draft};
