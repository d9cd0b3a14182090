//! # Slotbook Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - The file-backed reservation store (durable JSON list)
//! - Configuration loading from environment variables and files
//!
//! ## Architecture
//! - Implements traits defined in `slotbook-core`
//! - Depends on `slotbook-domain` and `slotbook-core`
//! - Contains all "impure" code (filesystem I/O)

pub mod config;
pub mod store;

// Re-export commonly used items
pub use store::FileReservationStore;
