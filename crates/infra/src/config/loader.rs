//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If incomplete, falls back to loading from file
//! 3. Probes a small set of paths for config files
//! 4. Supports JSON and TOML formats (detected by file extension)
//!
//! ## Environment Variables
//! - `SLOTBOOK_OPERATOR_CHANNEL`: Operator channel identity (required)
//! - `SLOTBOOK_WORK_START`: Working-hours start, `HH:MM` (default 09:00)
//! - `SLOTBOOK_WORK_END`: Working-hours end, `HH:MM` (default 21:00)
//! - `SLOTBOOK_DATE_WINDOW_DAYS`: Selectable-date-window length (default 15)
//! - `SLOTBOOK_STORE_PATH`: Reservation store file path
//!
//! ## File Locations
//! The loader probes, in order: `./config.toml`, `./config.json`,
//! `./slotbook.toml`, `./slotbook.json`, then the same names in the parent
//! directory.

use std::path::PathBuf;

use slotbook_domain::constants::{DEFAULT_DATE_WINDOW_DAYS, DEFAULT_STORE_PATH};
use slotbook_domain::{
    ChannelId, Config, Result, SlotbookError, StoreConfig, TimeOfDay, WorkingHours,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variables are missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `SlotbookError::Config` if configuration cannot be loaded from
/// either source, or the loaded values are invalid.
pub fn load() -> Result<Config> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// `SLOTBOOK_OPERATOR_CHANNEL` is required; every other variable falls back
/// to its documented default.
///
/// # Errors
/// Returns `SlotbookError::Config` if the operator channel is missing or
/// any present variable has an invalid value.
pub fn load_from_env() -> Result<Config> {
    let operator_channel = env_var("SLOTBOOK_OPERATOR_CHANNEL")?;

    let defaults = WorkingHours::default();
    let working_hours = WorkingHours {
        start: env_time("SLOTBOOK_WORK_START", defaults.start)?,
        end: env_time("SLOTBOOK_WORK_END", defaults.end)?,
    };
    if working_hours.start >= working_hours.end {
        return Err(SlotbookError::Config(format!(
            "Working hours start {} must precede end {}",
            working_hours.start, working_hours.end
        )));
    }

    let date_window_days = env_u32("SLOTBOOK_DATE_WINDOW_DAYS", DEFAULT_DATE_WINDOW_DAYS)?;
    let store_path =
        std::env::var("SLOTBOOK_STORE_PATH").unwrap_or_else(|_| DEFAULT_STORE_PATH.to_string());

    Ok(Config {
        working_hours,
        operator_channel: ChannelId::new(operator_channel),
        date_window_days,
        store: StoreConfig { path: store_path },
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the locations listed in
/// [`probe_config_paths`]. The format is detected by file extension.
///
/// # Errors
/// Returns `SlotbookError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - The extension is unsupported or the content does not parse
pub fn load_from_file(path: Option<PathBuf>) -> Result<Config> {
    let path = match path {
        Some(path) => {
            if !path.exists() {
                return Err(SlotbookError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            path
        }
        None => probe_config_paths()
            .into_iter()
            .find(|p| p.exists())
            .ok_or_else(|| SlotbookError::Config("No config file found".to_string()))?,
    };

    let content = std::fs::read_to_string(&path).map_err(|e| {
        SlotbookError::Config(format!("Failed to read {}: {e}", path.display()))
    })?;

    let config: Config = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| {
            SlotbookError::Config(format!("Invalid JSON in {}: {e}", path.display()))
        })?,
        Some("toml") => toml::from_str(&content).map_err(|e| {
            SlotbookError::Config(format!("Invalid TOML in {}: {e}", path.display()))
        })?,
        _ => {
            return Err(SlotbookError::Config(format!(
                "Unsupported config format: {}",
                path.display()
            )))
        }
    };

    if config.working_hours.start >= config.working_hours.end {
        return Err(SlotbookError::Config(format!(
            "Working hours start {} must precede end {}",
            config.working_hours.start, config.working_hours.end
        )));
    }

    tracing::info!(path = %path.display(), "Configuration loaded from file");
    Ok(config)
}

/// The paths probed when no explicit config file is given.
pub fn probe_config_paths() -> Vec<PathBuf> {
    let names = ["config.toml", "config.json", "slotbook.toml", "slotbook.json"];
    let mut paths: Vec<PathBuf> = names.into_iter().map(PathBuf::from).collect();
    for name in names {
        paths.push(PathBuf::from("..").join(name));
    }
    paths
}

fn env_var(name: &str) -> Result<String> {
    std::env::var(name)
        .map_err(|_| SlotbookError::Config(format!("Missing environment variable: {name}")))
}

fn env_time(name: &str, default: TimeOfDay) -> Result<TimeOfDay> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| SlotbookError::Config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32> {
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| SlotbookError::Config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
