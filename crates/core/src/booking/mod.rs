//! Booking store port
//!
//! The durable reservation collection is infrastructure; core only sees the
//! [`ports::ReservationStore`] trait.

pub mod ports;

pub use ports::ReservationStore;
