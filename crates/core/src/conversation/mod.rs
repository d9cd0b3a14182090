//! Conversation state machine
//!
//! One finite-state session per requester identity, driven one inbound
//! event at a time, collecting the fields needed to build a reservation.

pub mod events;
mod machine;
pub mod session;

pub use machine::ConversationService;
