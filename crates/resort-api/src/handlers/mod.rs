//! Route handlers organized by domain.

pub mod admin;
pub mod bookings;
pub mod health;
pub mod services;
