//! Inbound transport events
//!
//! The shapes the messaging collaborator delivers to the state machine.

use slotbook_domain::ChannelId;

use crate::transport::MessageRef;

/// One inbound event from the abstract message channel.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// The explicit "begin" trigger; (re)creates a fresh session.
    Begin {
        /// Requester identity.
        identity: ChannelId,
    },
    /// Free-text reply from a requester.
    Text {
        /// Requester identity.
        identity: ChannelId,
        /// Raw message text.
        text: String,
    },
    /// A button tap, carrying a payload whose prefix distinguishes a date
    /// selection from a cancel action.
    Selection {
        /// Identity of the actor who tapped.
        identity: ChannelId,
        /// Platform event id, used for acknowledgement.
        event_id: String,
        /// The message the tapped button was attached to.
        origin: MessageRef,
        /// Opaque payload of the tapped button.
        payload: String,
    },
}
