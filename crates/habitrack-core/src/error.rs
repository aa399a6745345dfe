//! Core error types for habitrack-core.
//!
//! Persistence failures are the only runtime errors the engine propagates;
//! filtering and statistics are pure and simply pass them through.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

use crate::tracker::TrackerId;

/// Core error type for habitrack-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage read/write failures
    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Rejected user input
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Completion marks are only allowed up to the current date
    #[error("Cannot mark {day}: it is after today ({today})")]
    FutureDate { day: NaiveDate, today: NaiveDate },

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised by a tracker repository or record store.
#[derive(Error, Debug)]
pub enum PersistenceError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// No tracker with this id
    #[error("Tracker not found: {0}")]
    TrackerNotFound(TrackerId),

    /// A tracker with this id already exists
    #[error("Tracker already exists: {0}")]
    DuplicateTracker(TrackerId),

    /// A stored row could not be decoded
    #[error("Corrupt row: {0}")]
    CorruptRow(String),
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

    /// Key does not name a configuration value
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Tracker name must not be empty")]
    EmptyName,

    #[error("Category name must not be empty")]
    EmptyCategory,

    #[error("A habit must be scheduled on at least one weekday")]
    EmptySchedule,

    /// Palette index out of bounds
    #[error("Index {index} out of bounds for {field} (max: {max})")]
    IndexOutOfRange {
        field: &'static str,
        index: u8,
        max: u8,
    },

    #[error("Invalid schedule code: {0:?}")]
    InvalidScheduleCode(String),

    #[error("Invalid value for '{field}': {value:?}")]
    InvalidValue { field: &'static str, value: String },

    #[error("Unknown weekday: {0:?}")]
    UnknownWeekday(String),

    #[error("Unknown filter mode: {0:?}")]
    UnknownFilterMode(String),
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) => {
                if e.code == rusqlite::ErrorCode::DatabaseLocked
                    || e.code == rusqlite::ErrorCode::DatabaseBusy
                {
                    PersistenceError::Locked
                } else {
                    PersistenceError::QueryFailed(err.to_string())
                }
            }
            _ => PersistenceError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
