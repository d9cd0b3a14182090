//! File-backed implementation of the ReservationStore port.
//!
//! The persisted representation is a JSON array of reservation records.
//! This store is its sole writer. All mutations run inside one async
//! critical section, so the availability check and the append inside
//! `create` are indivisible, and every mutation is durably renamed into
//! place before the call returns.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_core::booking::ports::ReservationStore;
use slotbook_core::scheduling;
use slotbook_domain::{
    CreateOutcome, Reservation, ReservationCandidate, Result, SlotbookError, WorkingHours,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

struct StoreInner {
    reservations: Vec<Reservation>,
    /// Every id this store instance has ever handed out (plus those loaded
    /// from disk); `generate_id` re-rolls until it misses this set.
    issued_ids: HashSet<String>,
}

/// JSON-file reservation store.
///
/// A single `tokio::sync::Mutex` serializes every `create`/`remove` against
/// each other and guards reads from torn state. The file is rewritten as a
/// whole to a temp path and renamed over the store path, so a crash right
/// after a successful call never loses or duplicates the change.
pub struct FileReservationStore {
    path: PathBuf,
    hours: WorkingHours,
    inner: Mutex<StoreInner>,
}

impl FileReservationStore {
    /// Open the store at `path`, validating candidates against `hours`.
    ///
    /// A missing file starts the store empty; an unreadable or corrupt file
    /// is recovered as empty with a warning, never a failure.
    pub fn new(path: impl Into<PathBuf>, hours: WorkingHours) -> Self {
        let path = path.into();
        let reservations = load(&path);
        let issued_ids = reservations.iter().map(|r| r.id.clone()).collect();
        info!(path = %path.display(), count = reservations.len(), "reservation store opened");
        Self { path, hours, inner: Mutex::new(StoreInner { reservations, issued_ids }) }
    }

    fn generate_id(issued_ids: &mut HashSet<String>) -> String {
        loop {
            let id = Uuid::new_v4().simple().to_string();
            if issued_ids.insert(id.clone()) {
                return id;
            }
            // Vanishingly unlikely; re-roll rather than ever overwrite.
            warn!("id collision, re-rolling");
        }
    }
}

#[async_trait]
impl ReservationStore for FileReservationStore {
    async fn list(&self) -> Result<Vec<Reservation>> {
        Ok(self.inner.lock().await.reservations.clone())
    }

    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>> {
        let inner = self.inner.lock().await;
        Ok(inner.reservations.iter().filter(|r| r.date == date).cloned().collect())
    }

    #[instrument(skip(self, candidate), fields(date = %candidate.date))]
    async fn create(&self, candidate: ReservationCandidate) -> Result<CreateOutcome> {
        let mut inner = self.inner.lock().await;
        let StoreInner { reservations, issued_ids } = &mut *inner;

        let existing: Vec<_> = reservations
            .iter()
            .filter(|r| r.date == candidate.date)
            .map(|r| (r.start, r.end))
            .collect();
        if let Some(reason) =
            scheduling::reject_reason(&self.hours, &existing, candidate.start, candidate.end)
        {
            debug!(%reason, "candidate rejected");
            return Ok(CreateOutcome::Rejected(reason));
        }

        let id = Self::generate_id(issued_ids);
        let reservation = candidate.into_reservation(id);
        reservations.push(reservation.clone());
        if let Err(e) = persist(&self.path, reservations) {
            // Leave the in-memory state matching the file on disk
            reservations.pop();
            return Err(e);
        }

        info!(id = %reservation.id, "reservation persisted");
        Ok(CreateOutcome::Created(reservation))
    }

    #[instrument(skip(self))]
    async fn remove(&self, id: &str) -> Result<Option<Reservation>> {
        let mut inner = self.inner.lock().await;
        let Some(index) = inner.reservations.iter().position(|r| r.id == id) else {
            debug!("remove for unknown id");
            return Ok(None);
        };

        let removed = inner.reservations.remove(index);
        if let Err(e) = persist(&self.path, &inner.reservations) {
            inner.reservations.insert(index, removed);
            return Err(e);
        }

        info!(id = %removed.id, "reservation removed");
        Ok(Some(removed))
    }
}

/// Read the persisted list. Missing file means empty; anything unreadable
/// or undecodable is recovered as empty with a warning.
fn load(path: &Path) -> Vec<Reservation> {
    match fs::read(path) {
        Ok(bytes) => {
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Vec::new();
            }
            match serde_json::from_slice(&bytes) {
                Ok(reservations) => reservations,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "corrupt reservations file, starting empty");
                    Vec::new()
                }
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "unreadable reservations file, starting empty");
            Vec::new()
        }
    }
}

/// Rewrite the whole list durably: temp file in the same directory, flushed
/// to disk, then renamed over the store path.
fn persist(path: &Path, reservations: &[Reservation]) -> Result<()> {
    let json = serde_json::to_vec_pretty(reservations)
        .map_err(|e| SlotbookError::Persistence(format!("encode reservations: {e}")))?;

    let tmp = path.with_extension("tmp");
    let write_result = (|| -> std::io::Result<()> {
        let mut file = File::create(&tmp)?;
        file.write_all(&json)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();

    write_result.map_err(|e| {
        let _ = fs::remove_file(&tmp);
        SlotbookError::Persistence(format!("write {}: {e}", path.display()))
    })
}
