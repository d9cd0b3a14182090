//! Shared test doubles for conversation and dispatcher tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_core::scheduling;
use slotbook_core::transport::{ActionKeyboard, ChatTransport, MessageRef};
use slotbook_core::ReservationStore;
use slotbook_domain::{
    ChannelId, CreateOutcome, Reservation, ReservationCandidate, Result, SlotbookError,
    WorkingHours,
};

/// One message captured by [`RecordingTransport`].
#[derive(Debug, Clone)]
pub struct SentMessage {
    pub to: ChannelId,
    pub text: String,
    pub actions: Option<ActionKeyboard>,
}

/// Transport double that records everything it is asked to deliver.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<SentMessage>>,
    pub edits: Mutex<Vec<(MessageRef, String)>>,
    pub acks: Mutex<Vec<(String, Option<String>)>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent_to(&self, channel: &ChannelId) -> Vec<SentMessage> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| &m.to == channel)
            .cloned()
            .collect()
    }

    pub fn last_text_to(&self, channel: &ChannelId) -> Option<String> {
        self.sent_to(channel).last().map(|m| m.text.clone())
    }

    pub fn total_sent(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatTransport for RecordingTransport {
    async fn send_message(
        &self,
        to: &ChannelId,
        text: &str,
        actions: Option<ActionKeyboard>,
    ) -> Result<()> {
        self.sent.lock().unwrap().push(SentMessage {
            to: to.clone(),
            text: text.to_string(),
            actions,
        });
        Ok(())
    }

    async fn edit_message(&self, origin: &MessageRef, new_text: &str) -> Result<()> {
        self.edits.lock().unwrap().push((origin.clone(), new_text.to_string()));
        Ok(())
    }

    async fn acknowledge(&self, event_id: &str, text: Option<&str>) -> Result<()> {
        self.acks
            .lock()
            .unwrap()
            .push((event_id.to_string(), text.map(str::to_string)));
        Ok(())
    }
}

/// In-memory store double with the same admission rules as the real one,
/// sequential ids, and a toggle to simulate persistence write failures.
pub struct InMemoryStore {
    hours: WorkingHours,
    reservations: Mutex<Vec<Reservation>>,
    next_id: AtomicUsize,
    pub fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new(hours: WorkingHours) -> Self {
        Self {
            hours,
            reservations: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(1),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Insert a reservation directly, bypassing the availability check.
    pub fn seed(&self, reservation: Reservation) {
        self.reservations.lock().unwrap().push(reservation);
    }

    pub fn len(&self) -> usize {
        self.reservations.lock().unwrap().len()
    }

    pub fn all(&self) -> Vec<Reservation> {
        self.reservations.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReservationStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Reservation>> {
        Ok(self.all())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>> {
        Ok(self.all().into_iter().filter(|r| r.date == date).collect())
    }

    async fn create(&self, candidate: ReservationCandidate) -> Result<CreateOutcome> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SlotbookError::Persistence("simulated write failure".to_string()));
        }
        let mut reservations = self.reservations.lock().unwrap();
        let existing: Vec<_> = reservations
            .iter()
            .filter(|r| r.date == candidate.date)
            .map(|r| (r.start, r.end))
            .collect();
        if let Some(reason) =
            scheduling::reject_reason(&self.hours, &existing, candidate.start, candidate.end)
        {
            return Ok(CreateOutcome::Rejected(reason));
        }
        let id = format!("r{}", self.next_id.fetch_add(1, Ordering::SeqCst));
        let reservation = candidate.into_reservation(id);
        reservations.push(reservation.clone());
        Ok(CreateOutcome::Created(reservation))
    }

    async fn remove(&self, id: &str) -> Result<Option<Reservation>> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(SlotbookError::Persistence("simulated write failure".to_string()));
        }
        let mut reservations = self.reservations.lock().unwrap();
        let index = reservations.iter().position(|r| r.id == id);
        Ok(index.map(|i| reservations.remove(i)))
    }
}
