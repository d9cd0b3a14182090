//! # Slotbook Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - The scheduling engine (working hours + interval overlap rules)
//! - Port/adapter interfaces (traits) for the store and the chat transport
//! - The per-requester conversation state machine
//! - The notification dispatcher
//!
//! ## Architecture Principles
//! - Only depends on `slotbook-domain`
//! - No file, network, or chat-platform code
//! - All external dependencies via traits
//! - Pure, testable business logic

pub mod booking;
pub mod conversation;
pub mod notify;
pub mod scheduling;
pub mod transport;

// Re-export specific items to avoid ambiguity
pub use booking::ports::ReservationStore;
pub use conversation::events::InboundEvent;
pub use conversation::session::{Session, SessionStep};
pub use conversation::ConversationService;
pub use notify::NotificationDispatcher;
pub use transport::{ActionButton, ActionKeyboard, ChatTransport, MessageRef};
