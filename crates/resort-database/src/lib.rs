//! # resort-database
//!
//! PostgreSQL connection management, repositories, and the [`BookingStore`]
//! data-access trait consumed by the booking services. An in-memory
//! implementation backs single-node demos and tests.

pub mod connection;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{
    BookingCommit, BookingStore, CapacityGuard, CommitOutcome, MemoryBookingStore,
    PgBookingStore, SlotUpdate,
};
