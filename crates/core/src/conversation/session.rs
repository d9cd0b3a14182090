//! Per-requester session state

use chrono::NaiveDate;
use slotbook_domain::TimeOfDay;

/// Which answer the session is waiting for next.
///
/// Completion has no stored state: the session is destroyed the moment the
/// reservation is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStep {
    /// Waiting for the requester's display name.
    AwaitingName,
    /// Waiting for a date-picker selection.
    AwaitingDate,
    /// Waiting for a `HH:MM - HH:MM` time range.
    AwaitingTime,
    /// Waiting for a contact string.
    AwaitingPhone,
}

/// In-progress collection of answers en route to becoming a reservation.
///
/// The fields present are exactly those of the steps already passed.
#[derive(Debug, Clone)]
pub struct Session {
    /// Current step.
    pub step: SessionStep,
    /// Collected at `AwaitingName`.
    pub name: Option<String>,
    /// Collected at `AwaitingDate`.
    pub date: Option<NaiveDate>,
    /// Collected at `AwaitingTime`.
    pub start: Option<TimeOfDay>,
    /// Collected at `AwaitingTime`.
    pub end: Option<TimeOfDay>,
}

impl Session {
    /// A fresh session at the first step.
    pub const fn new() -> Self {
        Self { step: SessionStep::AwaitingName, name: None, date: None, start: None, end: None }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
