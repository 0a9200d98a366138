//! # resort-entity
//!
//! Domain entity models for the resort booking platform. Every struct in
//! this crate represents a database table row or a domain value object.
//! Row types additionally derive `sqlx::FromRow`.

pub mod booking;
pub mod reservation;
pub mod service;
pub mod slot;

pub use booking::{BookingStatus, NewBooking, PaymentStatus, ServiceBooking};
pub use reservation::{ReservationStatus, RoomReservation};
pub use service::{HotelService, ServiceCategory, ServiceDraft, ServiceType, Weekday};
pub use slot::{NewTimeSlot, SlotStatus, TimeSlot};
