//! Error types used throughout the application
//!
//! Recoverable booking outcomes (a rejected candidate, a cancel against an
//! unknown id) are ordinary values, not errors; see
//! [`crate::types::CreateOutcome`]. The variants here are the hard failures.

use thiserror::Error;

/// Main error type for Slotbook
#[derive(Error, Debug)]
pub enum SlotbookError {
    /// The store could not durably persist a mutation. The triggering
    /// `create`/`remove` did not take effect.
    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Outbound delivery through the chat transport failed.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Slotbook operations
pub type Result<T> = std::result::Result<T, SlotbookError>;
