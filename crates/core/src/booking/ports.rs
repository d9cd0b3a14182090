//! Port interface for the durable reservation collection
//!
//! This trait defines the boundary between the conversation/notification
//! logic and the storage implementation.

use async_trait::async_trait;
use chrono::NaiveDate;
use slotbook_domain::{CreateOutcome, Reservation, ReservationCandidate, Result};

/// Durable, concurrency-safe collection of reservations.
///
/// Implementations own the atomicity guarantee: the availability check and
/// the append inside [`create`](Self::create) must form one indivisible
/// critical section, serialized against every other `create`/`remove` on the
/// same store. Two concurrent `create` calls for overlapping intervals on
/// the same date must never both succeed.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    /// Snapshot of the full current set, reflecting every write committed
    /// strictly before the call.
    async fn list(&self) -> Result<Vec<Reservation>>;

    /// Snapshot filtered to one calendar date.
    async fn list_by_date(&self, date: NaiveDate) -> Result<Vec<Reservation>>;

    /// Atomically check availability against current state and, if the
    /// candidate is admissible, assign a fresh unique id and persist it.
    ///
    /// Rejection is reported as a value; `Err` means the write did not take
    /// effect (persistence failure) and the store is unchanged.
    ///
    /// # Errors
    /// Returns `SlotbookError::Persistence` if the durable write fails.
    async fn create(&self, candidate: ReservationCandidate) -> Result<CreateOutcome>;

    /// Atomically delete the reservation with the given id.
    ///
    /// Returns the removed value so callers can notify the requester, or
    /// `None` if no such reservation exists (already cancelled or a stale
    /// id) - an informational signal, not an error.
    ///
    /// # Errors
    /// Returns `SlotbookError::Persistence` if the durable write fails.
    async fn remove(&self, id: &str) -> Result<Option<Reservation>>;
}
