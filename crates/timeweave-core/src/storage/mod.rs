mod config;
pub mod event_store;
pub mod persist;

pub use config::Config;
pub use event_store::{EventStore, JsonEventStore, MemoryEventStore};
pub use persist::{
    accept_suggestion, clear_suggestions, persist_suggestions, reject_suggestion, Conflict,
    PersistReport,
};

use std::path::PathBuf;

use crate::error::ConfigError;

/// Returns the TimeWeave data directory, creating it if needed.
///
/// `TIMEWEAVE_DATA_DIR` overrides the location entirely. Otherwise it is
/// `~/.config/timeweave[-dev]/`, with TIMEWEAVE_ENV=dev selecting the
/// development directory.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    let dir = match std::env::var_os("TIMEWEAVE_DATA_DIR") {
        Some(custom) if !custom.is_empty() => PathBuf::from(custom),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env =
                std::env::var("TIMEWEAVE_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("timeweave-dev")
            } else {
                base_dir.join("timeweave")
            }
        }
    };

    std::fs::create_dir_all(&dir).map_err(|e| ConfigError::LoadFailed {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(dir)
}
