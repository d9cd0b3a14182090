//! Common data types used throughout the application

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::SlotbookError;

/// Opaque identity of a chat channel (a requester or the operator).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChannelId(String);

impl ChannelId {
    /// Wrap a raw channel identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identity string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChannelId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ChannelId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A time of day as minutes since midnight.
///
/// Ordered, cheap to compare, and serialized as zero-padded `HH:MM` to match
/// the persisted reservation layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Build from raw minutes since midnight. Callers are expected to stay
    /// below 24:00; parsing enforces this for external input.
    pub const fn from_minutes(minutes: u16) -> Self {
        Self(minutes)
    }

    /// Build from an hour/minute pair, rejecting out-of-range components.
    pub fn from_hm(hour: u16, minute: u16) -> Option<Self> {
        if hour > 23 || minute > 59 {
            return None;
        }
        Some(Self(hour * 60 + minute))
    }

    /// Minutes since midnight.
    pub const fn minutes(self) -> u16 {
        self.0
    }

    /// Hour component (0-23).
    pub const fn hour(self) -> u16 {
        self.0 / 60
    }

    /// Minute component (0-59).
    pub const fn minute(self) -> u16 {
        self.0 % 60
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = SlotbookError;

    /// Parse strict `HH:MM` (both components zero-padded to two digits).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || SlotbookError::InvalidInput(format!("invalid time of day: {s:?}"));
        let (hh, mm) = s.split_once(':').ok_or_else(invalid)?;
        if hh.len() != 2 || mm.len() != 2 {
            return Err(invalid());
        }
        let hour: u16 = hh.parse().map_err(|_| invalid())?;
        let minute: u16 = mm.parse().map_err(|_| invalid())?;
        Self::from_hm(hour, minute).ok_or_else(invalid)
    }
}

impl Serialize for TimeOfDay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TimeOfDay {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(|e| D::Error::custom(format!("{e}")))
    }
}

/// A persisted, immutable-once-created booking of a time interval.
///
/// Invariants (enforced by the store, never by construction alone):
/// - `start < end`, both inside the configured working hours
/// - for a fixed `date`, no two live reservations' `[start, end)` overlap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    /// Opaque unique identifier, assigned by the store at creation.
    pub id: String,
    /// Requester display name.
    pub name: String,
    /// Requester contact string (free-form, typically a phone number).
    pub contact: String,
    /// Calendar date, serialized `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Interval start, serialized `HH:MM`.
    pub start: TimeOfDay,
    /// Interval end (exclusive), serialized `HH:MM`.
    pub end: TimeOfDay,
    /// Channel identity of the requester, kept for later notification.
    pub requester: ChannelId,
}

/// A fully collected reservation request, not yet admitted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationCandidate {
    /// Requester display name.
    pub name: String,
    /// Requester contact string.
    pub contact: String,
    /// Calendar date.
    pub date: NaiveDate,
    /// Interval start.
    pub start: TimeOfDay,
    /// Interval end (exclusive).
    pub end: TimeOfDay,
    /// Channel identity of the requester.
    pub requester: ChannelId,
}

impl ReservationCandidate {
    /// Promote the candidate to a reservation under a store-assigned id.
    pub fn into_reservation(self, id: String) -> Reservation {
        Reservation {
            id,
            name: self.name,
            contact: self.contact,
            date: self.date,
            start: self.start,
            end: self.end,
            requester: self.requester,
        }
    }
}

/// Why the store turned a candidate away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The interval falls outside the working-hours window, or start >= end.
    OutsideWorkingHours,
    /// The interval overlaps a live reservation on the same date.
    Overlap,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutsideWorkingHours => f.write_str("outside working hours"),
            Self::Overlap => f.write_str("overlaps an existing reservation"),
        }
    }
}

/// Result of an admission attempt. Rejection is an expected outcome of the
/// availability check, not an error; hard failures surface as
/// [`crate::errors::SlotbookError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// The candidate was admitted and durably persisted.
    Created(Reservation),
    /// The candidate failed the availability check; nothing was written.
    Rejected(RejectReason),
}
