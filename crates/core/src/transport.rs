//! Chat transport port
//!
//! The messaging platform (delivering text/button messages to a channel and
//! receiving replies or action taps) is an external collaborator. Core only
//! sees this trait plus the small value types it exchanges.

use async_trait::async_trait;
use slotbook_domain::{ChannelId, Result};

/// A selectable button attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    /// Text shown on the button.
    pub label: String,
    /// Opaque payload delivered back in the selection event.
    pub payload: String,
}

impl ActionButton {
    /// Convenience constructor.
    pub fn new(label: impl Into<String>, payload: impl Into<String>) -> Self {
        Self { label: label.into(), payload: payload.into() }
    }
}

/// Buttons laid out in rows, attached to a single message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionKeyboard {
    /// Button rows, rendered top to bottom.
    pub rows: Vec<Vec<ActionButton>>,
}

/// Reference to a previously sent message, usable as an edit target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    /// Channel the message lives in.
    pub channel: ChannelId,
    /// Platform-assigned message identifier.
    pub message_id: String,
}

/// Outbound side of the abstract bidirectional message channel.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a text message, optionally with an attached action keyboard.
    ///
    /// # Errors
    /// Returns `SlotbookError::Transport` if delivery fails.
    async fn send_message(
        &self,
        to: &ChannelId,
        text: &str,
        actions: Option<ActionKeyboard>,
    ) -> Result<()>;

    /// Replace the text of a previously sent message.
    ///
    /// # Errors
    /// Returns `SlotbookError::Transport` if the edit fails.
    async fn edit_message(&self, origin: &MessageRef, new_text: &str) -> Result<()>;

    /// Acknowledge a selection event, optionally with a short notice shown
    /// to the actor who triggered it.
    ///
    /// # Errors
    /// Returns `SlotbookError::Transport` if the acknowledgement fails.
    async fn acknowledge(&self, event_id: &str, text: Option<&str>) -> Result<()>;
}
