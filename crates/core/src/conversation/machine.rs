//! The per-requester conversation state machine
//!
//! Drives `AwaitingName -> AwaitingDate -> AwaitingTime -> AwaitingPhone`
//! one inbound event at a time, invokes the booking store once all fields
//! are collected, and hands successful reservations to the notification
//! dispatcher.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use slotbook_domain::constants::{
    CANCEL_PAYLOAD_PREFIX, COMMAND_PREFIX, DATE_PAYLOAD_PREFIX, DATE_PICKER_ROW_WIDTH,
    DISPLAY_DATE_FORMAT,
};
use slotbook_domain::{
    ChannelId, CreateOutcome, Reservation, ReservationCandidate, Result, TimeOfDay, WorkingHours,
};
use tokio::sync::RwLock;
use tracing::{debug, error, info, warn};

use crate::booking::ports::ReservationStore;
use crate::conversation::events::InboundEvent;
use crate::conversation::session::{Session, SessionStep};
use crate::notify::NotificationDispatcher;
use crate::scheduling;
use crate::transport::{ActionButton, ActionKeyboard, ChatTransport, MessageRef};

lazy_static! {
    /// Strict time-range input pattern: `HH:MM - HH:MM`, spaces optional.
    static ref TIME_RANGE_RE: Regex =
        Regex::new(r"^(\d{2}:\d{2})\s*-\s*(\d{2}:\d{2})$").expect("time range pattern compiles");
}

const MSG_ASK_NAME: &str = "Hello! Please enter your name:";
const MSG_ASK_PHONE: &str = "Please enter your phone number:";
const MSG_BAD_TIME_FORMAT: &str = "❌ Invalid format. Example: 10:00 - 12:00";
const MSG_TIME_UNAVAILABLE: &str =
    "❌ That time is taken or not valid. Please enter another time.";
const MSG_SAVE_FAILED: &str =
    "⚠️ Your reservation could not be saved. Please send your phone number again to retry.";

/// Conversation state machine service.
///
/// Owns the session table: one session per requester identity, mutated one
/// event at a time per identity; distinct identities progress independently.
pub struct ConversationService {
    store: Arc<dyn ReservationStore>,
    transport: Arc<dyn ChatTransport>,
    dispatcher: Arc<NotificationDispatcher>,
    sessions: RwLock<HashMap<ChannelId, Session>>,
    hours: WorkingHours,
    date_window_days: u32,
}

impl ConversationService {
    /// Create a new conversation service.
    pub fn new(
        store: Arc<dyn ReservationStore>,
        transport: Arc<dyn ChatTransport>,
        dispatcher: Arc<NotificationDispatcher>,
        hours: WorkingHours,
        date_window_days: u32,
    ) -> Self {
        Self {
            store,
            transport,
            dispatcher,
            sessions: RwLock::new(HashMap::new()),
            hours,
            date_window_days,
        }
    }

    /// Feed one inbound transport event through the state machine.
    ///
    /// Events from identities without an active session, control commands,
    /// and unrecognized payloads are ignored without a reply.
    ///
    /// # Errors
    /// Returns an error when the store cannot persist a mutation or the
    /// transport cannot deliver a reply. Session invariants hold either way.
    pub async fn handle_event(&self, event: InboundEvent) -> Result<()> {
        match event {
            InboundEvent::Begin { identity } => self.begin(identity).await,
            InboundEvent::Text { identity, text } => self.handle_text(identity, text).await,
            InboundEvent::Selection { identity, event_id, origin, payload } => {
                self.handle_selection(identity, &event_id, &origin, &payload).await
            }
        }
    }

    /// Snapshot of the live session for an identity, if any. Mainly useful
    /// for observability and tests.
    pub async fn active_session(&self, identity: &ChannelId) -> Option<Session> {
        self.sessions.read().await.get(identity).cloned()
    }

    /// (Re)create a fresh session, unconditionally discarding any prior
    /// in-flight one for this identity.
    async fn begin(&self, identity: ChannelId) -> Result<()> {
        let previous = self.sessions.write().await.insert(identity.clone(), Session::new());
        if previous.is_some() {
            debug!(identity = %identity, "discarded in-flight session on begin");
        }
        info!(identity = %identity, "session started");
        self.transport.send_message(&identity, MSG_ASK_NAME, None).await
    }

    async fn handle_text(&self, identity: ChannelId, text: String) -> Result<()> {
        if text.starts_with(COMMAND_PREFIX) {
            debug!(identity = %identity, "control command ignored by state machine");
            return Ok(());
        }

        let step = self.sessions.read().await.get(&identity).map(|s| s.step);
        let Some(step) = step else {
            debug!(identity = %identity, "text from identity without a session ignored");
            return Ok(());
        };

        match step {
            SessionStep::AwaitingName => self.collect_name(identity, text).await,
            // A picker tap is expected here; free text gets no reply.
            SessionStep::AwaitingDate => Ok(()),
            SessionStep::AwaitingTime => self.collect_time(identity, &text).await,
            SessionStep::AwaitingPhone => self.collect_contact(identity, text).await,
        }
    }

    async fn collect_name(&self, identity: ChannelId, name: String) -> Result<()> {
        {
            let mut sessions = self.sessions.write().await;
            let Some(session) = sessions.get_mut(&identity) else { return Ok(()) };
            session.name = Some(name.clone());
            session.step = SessionStep::AwaitingDate;
        }

        let picker = date_picker(Local::now().date_naive(), self.date_window_days);
        let greeting =
            format!("Welcome, {name}!\n\nPlease choose the day you would like to book:");
        self.transport.send_message(&identity, &greeting, Some(picker)).await
    }

    async fn collect_time(&self, identity: ChannelId, text: &str) -> Result<()> {
        let Some((start, end)) = parse_time_range(text) else {
            return self.transport.send_message(&identity, MSG_BAD_TIME_FORMAT, None).await;
        };

        let date = self.sessions.read().await.get(&identity).and_then(|s| s.date);
        let Some(date) = date else {
            warn!(identity = %identity, "time received without a selected date, resetting session");
            self.sessions.write().await.remove(&identity);
            return Ok(());
        };

        // Advisory pre-check so the requester learns about a clash before
        // being asked for a phone number. The atomic check inside the
        // store's `create` remains authoritative.
        let existing: Vec<(TimeOfDay, TimeOfDay)> =
            self.store.list_by_date(date).await?.iter().map(|r| (r.start, r.end)).collect();
        if !scheduling::is_available(&self.hours, &existing, start, end) {
            return self.transport.send_message(&identity, MSG_TIME_UNAVAILABLE, None).await;
        }

        {
            let mut sessions = self.sessions.write().await;
            if let Some(session) = sessions.get_mut(&identity) {
                session.start = Some(start);
                session.end = Some(end);
                session.step = SessionStep::AwaitingPhone;
            }
        }
        self.transport.send_message(&identity, MSG_ASK_PHONE, None).await
    }

    async fn collect_contact(&self, identity: ChannelId, contact: String) -> Result<()> {
        let candidate = {
            let sessions = self.sessions.read().await;
            match sessions.get(&identity) {
                None => return Ok(()),
                Some(session) => match (&session.name, session.date, session.start, session.end) {
                    (Some(name), Some(date), Some(start), Some(end)) => {
                        Some(ReservationCandidate {
                            name: name.clone(),
                            contact,
                            date,
                            start,
                            end,
                            requester: identity.clone(),
                        })
                    }
                    _ => None,
                },
            }
        };
        let Some(candidate) = candidate else {
            warn!(identity = %identity, "incomplete session at contact step, resetting");
            self.sessions.write().await.remove(&identity);
            return Ok(());
        };

        match self.store.create(candidate).await {
            Ok(CreateOutcome::Created(reservation)) => {
                self.sessions.write().await.remove(&identity);
                info!(
                    id = %reservation.id,
                    date = %reservation.date,
                    "reservation created, session completed"
                );
                self.transport
                    .send_message(&identity, &confirmation_text(&reservation), None)
                    .await?;
                self.dispatcher.reservation_created(&reservation).await
            }
            Ok(CreateOutcome::Rejected(reason)) => {
                // Lost the race since the pre-check; step back for a new
                // time range instead of dropping the session.
                {
                    let mut sessions = self.sessions.write().await;
                    if let Some(session) = sessions.get_mut(&identity) {
                        session.start = None;
                        session.end = None;
                        session.step = SessionStep::AwaitingTime;
                    }
                }
                let text = format!(
                    "❌ That time slot is no longer free ({reason}). \
                     Please enter another time range (for example: 10:00 - 12:00)"
                );
                self.transport.send_message(&identity, &text, None).await
            }
            Err(e) => {
                error!(identity = %identity, error = %e, "reservation write did not take effect");
                if let Err(send_err) =
                    self.transport.send_message(&identity, MSG_SAVE_FAILED, None).await
                {
                    warn!(error = %send_err, "could not notify requester about failed save");
                }
                Err(e)
            }
        }
    }

    async fn handle_selection(
        &self,
        identity: ChannelId,
        event_id: &str,
        origin: &MessageRef,
        payload: &str,
    ) -> Result<()> {
        if let Some(raw_date) = payload.strip_prefix(DATE_PAYLOAD_PREFIX) {
            self.select_date(identity, event_id, raw_date).await
        } else if let Some(reservation_id) = payload.strip_prefix(CANCEL_PAYLOAD_PREFIX) {
            self.dispatcher.handle_cancel(event_id, origin, reservation_id).await
        } else {
            debug!(payload, "unrecognized selection payload ignored");
            Ok(())
        }
    }

    async fn select_date(&self, identity: ChannelId, event_id: &str, raw: &str) -> Result<()> {
        let Ok(date) = NaiveDate::parse_from_str(raw, DISPLAY_DATE_FORMAT) else {
            debug!(identity = %identity, raw, "malformed date payload ignored");
            return Ok(());
        };

        {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&identity) {
                Some(session) if session.step == SessionStep::AwaitingDate => {
                    session.date = Some(date);
                    session.step = SessionStep::AwaitingTime;
                }
                _ => {
                    debug!(identity = %identity, "date tap without a session awaiting one ignored");
                    return Ok(());
                }
            }
        }

        let booked = self.store.list_by_date(date).await?;
        let text = format!(
            "You picked: {}\n\n{}\nPlease enter a time range (for example: 10:00 - 12:00)",
            date.format("%-d %B"),
            busy_times_text(&booked),
        );
        self.transport.send_message(&identity, &text, None).await?;
        self.transport.acknowledge(event_id, None).await
    }
}

/// Keyboard with one button per selectable day, labeled with the
/// day-of-month, laid out in rows of [`DATE_PICKER_ROW_WIDTH`].
fn date_picker(today: NaiveDate, days: u32) -> ActionKeyboard {
    let mut rows = Vec::new();
    let mut row = Vec::new();
    for offset in 0..days {
        let date = today + Duration::days(i64::from(offset));
        row.push(ActionButton::new(
            date.format("%d").to_string(),
            format!("{DATE_PAYLOAD_PREFIX}{}", date.format(DISPLAY_DATE_FORMAT)),
        ));
        if row.len() == DATE_PICKER_ROW_WIDTH {
            rows.push(std::mem::take(&mut row));
        }
    }
    if !row.is_empty() {
        rows.push(row);
    }
    ActionKeyboard { rows }
}

fn parse_time_range(text: &str) -> Option<(TimeOfDay, TimeOfDay)> {
    let captures = TIME_RANGE_RE.captures(text)?;
    let start = captures.get(1)?.as_str().parse().ok()?;
    let end = captures.get(2)?.as_str().parse().ok()?;
    Some((start, end))
}

fn busy_times_text(booked: &[Reservation]) -> String {
    if booked.is_empty() {
        return "Booked times:\nnone yet.\n".to_string();
    }
    let mut out = String::from("Booked times:\n");
    for reservation in booked {
        out.push_str(&format!("- {} - {}\n", reservation.start, reservation.end));
    }
    out
}

fn confirmation_text(reservation: &Reservation) -> String {
    format!(
        "✅ Booked!\n🗓 Date: {}\n⏰ Time: {} - {}",
        reservation.date.format(DISPLAY_DATE_FORMAT),
        reservation.start,
        reservation.end,
    )
}
