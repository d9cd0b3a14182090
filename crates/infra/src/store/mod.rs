//! Durable reservation storage
//!
//! File-backed implementation of the `ReservationStore` port.

mod file_store;

pub use file_store::FileReservationStore;
