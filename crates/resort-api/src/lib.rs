//! # resort-api
//!
//! HTTP API layer for the resort booking platform built on Axum.
//!
//! Provides the guest and operator REST endpoints, middleware (CORS,
//! request logging, timeouts), extractors, DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, build_state, open_store, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
