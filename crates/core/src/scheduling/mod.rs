//! Scheduling engine - working hours and interval overlap rules
//!
//! Pure functions of their inputs; no side effects and no failure modes
//! beyond boolean results. The store calls these inside its critical
//! section, the conversation state machine for its advisory pre-check.

use slotbook_domain::{RejectReason, TimeOfDay, WorkingHours};

/// True iff `[start, end)` is a well-formed interval inside working hours.
pub fn validate_window(hours: &WorkingHours, start: TimeOfDay, end: TimeOfDay) -> bool {
    start >= hours.start && end <= hours.end && start < end
}

/// Half-open interval overlap test. Touching endpoints do not overlap.
pub fn overlaps(
    a_start: TimeOfDay,
    a_end: TimeOfDay,
    b_start: TimeOfDay,
    b_end: TimeOfDay,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// True iff the candidate interval is well-formed, inside working hours, and
/// overlaps none of the intervals already booked on the date.
pub fn is_available(
    hours: &WorkingHours,
    existing_on_date: &[(TimeOfDay, TimeOfDay)],
    start: TimeOfDay,
    end: TimeOfDay,
) -> bool {
    reject_reason(hours, existing_on_date, start, end).is_none()
}

/// Availability check that reports why a candidate fails, or `None` when it
/// is admissible. The working-hours check runs first, so a malformed or
/// out-of-hours interval is never reported as an overlap.
pub fn reject_reason(
    hours: &WorkingHours,
    existing_on_date: &[(TimeOfDay, TimeOfDay)],
    start: TimeOfDay,
    end: TimeOfDay,
) -> Option<RejectReason> {
    if !validate_window(hours, start, end) {
        return Some(RejectReason::OutsideWorkingHours);
    }
    let collision = existing_on_date
        .iter()
        .any(|&(b_start, b_end)| overlaps(start, end, b_start, b_end));
    collision.then_some(RejectReason::Overlap)
}
