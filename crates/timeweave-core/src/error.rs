//! Core error types for timeweave-core.
//!
//! The planner itself never fails: incomplete profiles and full weeks both
//! yield an empty suggestion list. These errors cover the edges around it:
//! strict profile validation, event construction, the event store and the
//! on-disk configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for timeweave-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Profile errors (strict validation only)
    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    /// Event store errors
    #[error("Event store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Invalid time range
    #[error("Invalid time range: end_time ({end}) must be greater than start_time ({start})")]
    InvalidTimeRange {
        start: chrono::DateTime<chrono::Utc>,
        end: chrono::DateTime<chrono::Utc>,
    },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Errors raised by [`crate::Profile::validate`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProfileError {
    /// A required field is absent or empty
    #[error("Profile is incomplete: missing '{0}'")]
    Missing(&'static str),

    /// Wake-up time is not "HH:MM"
    #[error("Malformed time '{0}': expected HH:MM")]
    MalformedTime(String),

    /// Sleep duration is not a positive, finite number of hours
    #[error("Invalid sleep duration: {0}")]
    InvalidSleepDuration(f64),

    /// Chronotype tag outside lion/bear/wolf/dolphin
    #[error("Unknown chronotype '{0}'")]
    UnknownChronotype(String),
}

/// Event store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// No event with the given identifier
    #[error("Event not found: {0}")]
    NotFound(String),

    /// Operation refused for this event
    #[error("Event {id} cannot be changed: {reason}")]
    Refused { id: String, reason: String },

    /// Backing file could not be read or written
    #[error("Event store I/O failed at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Backing file holds something other than an event list
    #[error("Event store at {path} is corrupt: {message}")]
    Corrupt { path: PathBuf, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
