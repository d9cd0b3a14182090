//! Notification dispatcher
//!
//! Fans out confirmation/alert/cancellation messages to the requester and
//! the fixed operator channel. Cancellation notices are addressed from the
//! removed reservation's stored requester identity, never from a live
//! session - the session is long gone by the time an operator cancels.

use std::sync::Arc;

use slotbook_domain::constants::{CANCEL_PAYLOAD_PREFIX, DISPLAY_DATE_FORMAT};
use slotbook_domain::{ChannelId, Reservation, Result};
use tracing::{debug, info};

use crate::booking::ports::ReservationStore;
use crate::transport::{ActionButton, ActionKeyboard, ChatTransport, MessageRef};

/// Dispatches operator alerts and cancellation notifications.
pub struct NotificationDispatcher {
    store: Arc<dyn ReservationStore>,
    transport: Arc<dyn ChatTransport>,
    operator_channel: ChannelId,
}

impl NotificationDispatcher {
    /// Create a dispatcher bound to the fixed operator channel.
    pub fn new(
        store: Arc<dyn ReservationStore>,
        transport: Arc<dyn ChatTransport>,
        operator_channel: ChannelId,
    ) -> Self {
        Self { store, transport, operator_channel }
    }

    /// Alert the operator channel about a new reservation, with an attached
    /// cancel action bound to the reservation id.
    ///
    /// # Errors
    /// Returns `SlotbookError::Transport` if the alert cannot be delivered.
    pub async fn reservation_created(&self, reservation: &Reservation) -> Result<()> {
        let keyboard = ActionKeyboard {
            rows: vec![vec![ActionButton::new(
                "❌ Cancel",
                format!("{CANCEL_PAYLOAD_PREFIX}{}", reservation.id),
            )]],
        };
        self.transport
            .send_message(&self.operator_channel, &operator_alert_text(reservation), Some(keyboard))
            .await
    }

    /// Handle a cancel action for a reservation id.
    ///
    /// A stale id (already cancelled) is acknowledged to the actor and goes
    /// no further. A live one is removed, the operator message annotated,
    /// the tap acknowledged, and the original requester notified.
    ///
    /// # Errors
    /// Returns an error when the store cannot persist the removal or a
    /// notification cannot be delivered.
    pub async fn handle_cancel(
        &self,
        event_id: &str,
        origin: &MessageRef,
        reservation_id: &str,
    ) -> Result<()> {
        let Some(reservation) = self.store.remove(reservation_id).await? else {
            debug!(reservation_id, "cancel action for unknown or already cancelled reservation");
            return self
                .transport
                .acknowledge(event_id, Some("Reservation not found or already cancelled."))
                .await;
        };

        info!(id = %reservation.id, date = %reservation.date, "reservation cancelled");

        let annotated = format!("{}\n\n❌ Cancelled.", operator_alert_text(&reservation));
        self.transport.edit_message(origin, &annotated).await?;
        self.transport.acknowledge(event_id, Some("Reservation cancelled.")).await?;
        self.transport
            .send_message(&reservation.requester, &cancellation_notice(&reservation), None)
            .await
    }
}

fn operator_alert_text(reservation: &Reservation) -> String {
    format!(
        "📢 New reservation:\n\nName: {}\nPhone: {}\nDate: {}\nTime: {} - {}\nID: {}",
        reservation.name,
        reservation.contact,
        reservation.date.format(DISPLAY_DATE_FORMAT),
        reservation.start,
        reservation.end,
        reservation.id,
    )
}

fn cancellation_notice(reservation: &Reservation) -> String {
    format!(
        "Your reservation for {} at {} - {} has been cancelled.",
        reservation.date.format(DISPLAY_DATE_FORMAT),
        reservation.start,
        reservation.end,
    )
}
