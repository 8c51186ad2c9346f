//! Error types for yearturn-core.
//!
//! Only playback can fail at runtime, and those failures are swallowed by the
//! playback controller. Everything else here is a load-time configuration
//! concern.

use std::path::PathBuf;
use thiserror::Error;

use crate::playback::TrackId;

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

    /// Dotted key does not name a configuration field
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// The deadline names a local time that does not exist (DST gap)
    #[error("Deadline {naive} does not exist in the local time zone")]
    NonexistentDeadline { naive: chrono::NaiveDateTime },

    /// No usable configuration directory
    #[error("Could not determine a configuration directory")]
    NoConfigDir,
}

/// Failure to start a track. Never surfaced past the playback controller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// Autoplay refused by environment policy (no prior user interaction)
    #[error("{track} playback blocked until the user interacts")]
    Blocked { track: TrackId },

    /// Asset file could not be found
    #[error("{track} asset not found at {path}")]
    AssetMissing { track: TrackId, path: PathBuf },

    /// Output device failure
    #[error("{track} output failed: {message}")]
    Device { track: TrackId, message: String },
}

impl PlaybackError {
    pub fn track(&self) -> TrackId {
        match self {
            PlaybackError::Blocked { track }
            | PlaybackError::AssetMissing { track, .. }
            | PlaybackError::Device { track, .. } => *track,
        }
    }
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<ValidationError> for ConfigError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::EmptyCollection(key) => ConfigError::InvalidValue {
                key,
                message: "must not be empty".into(),
            },
            ValidationError::InvalidValue { field, message } => {
                ConfigError::InvalidValue { key: field, message }
            }
        }
    }
}
