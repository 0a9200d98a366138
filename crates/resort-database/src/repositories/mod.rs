//! PostgreSQL repositories, one per table.

pub mod booking;
pub mod reservation;
pub mod service;
pub mod slot;

pub use booking::BookingRepository;
pub use reservation::ReservationRepository;
pub use service::ServiceRepository;
pub use slot::TimeSlotRepository;
