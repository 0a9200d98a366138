//! Room reservation entities (owned by the room-booking side, read here).

pub mod model;

pub use model::{ReservationStatus, RoomReservation};
