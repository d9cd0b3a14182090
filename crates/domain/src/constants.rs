//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

use crate::types::TimeOfDay;

// Working hours defaults (09:00 - 21:00)
pub const DEFAULT_WORK_START: TimeOfDay = TimeOfDay::from_minutes(9 * 60);
pub const DEFAULT_WORK_END: TimeOfDay = TimeOfDay::from_minutes(21 * 60);

// Date picker configuration
pub const DEFAULT_DATE_WINDOW_DAYS: u32 = 15;
pub const DATE_PICKER_ROW_WIDTH: usize = 3;

// Selection payload prefixes (distinguish date taps from cancel actions)
pub const DATE_PAYLOAD_PREFIX: &str = "date_";
pub const CANCEL_PAYLOAD_PREFIX: &str = "cancel_";

// Inbound text starting with this is a control command and is ignored by
// the state machine
pub const COMMAND_PREFIX: &str = "/";

// Date formats: storage keeps ISO, user-facing text uses dots
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%Y.%m.%d";

// Persistence defaults
pub const DEFAULT_STORE_PATH: &str = "reservations.json";
