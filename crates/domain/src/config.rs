//! Configuration structures
//!
//! Plain data; loading from environment variables or files lives in the
//! infra crate.

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_DATE_WINDOW_DAYS, DEFAULT_STORE_PATH, DEFAULT_WORK_END, DEFAULT_WORK_START,
};
use crate::types::{ChannelId, TimeOfDay};

/// The fixed daily window during which reservations may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    /// Earliest admissible interval start.
    pub start: TimeOfDay,
    /// Latest admissible interval end.
    pub end: TimeOfDay,
}

impl Default for WorkingHours {
    fn default() -> Self {
        Self { start: DEFAULT_WORK_START, end: DEFAULT_WORK_END }
    }
}

/// Reservation store settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path of the persisted reservation list.
    pub path: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self { path: DEFAULT_STORE_PATH.to_string() }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Working-hours window applied to every reservation.
    #[serde(default)]
    pub working_hours: WorkingHours,
    /// Channel that receives every new reservation and can cancel.
    pub operator_channel: ChannelId,
    /// How many near-term days the date picker offers.
    #[serde(default = "default_date_window_days")]
    pub date_window_days: u32,
    /// Store settings.
    #[serde(default)]
    pub store: StoreConfig,
}

const fn default_date_window_days() -> u32 {
    DEFAULT_DATE_WINDOW_DAYS
}

impl Config {
    /// Configuration with all defaults and the given operator channel.
    pub fn with_operator(operator_channel: ChannelId) -> Self {
        Self {
            working_hours: WorkingHours::default(),
            operator_channel,
            date_window_days: DEFAULT_DATE_WINDOW_DAYS,
            store: StoreConfig::default(),
        }
    }
}
