//! Error types for trailtriage.
//!
//! Every fallible operation in the crate returns [`Result`]. Most tracking
//! failures are absorbed (logged and dropped) by the tracker itself, so these
//! errors surface mainly from storage setup, configuration, and input parsing.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for trailtriage operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// Failed to bring the database schema up to date.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === Tracking Errors ===
    /// A reminder interval outside the supported set.
    #[error("unsupported vitals interval '{value}' (expected 5, 10, 15, 30 or 60 minutes)")]
    InvalidInterval {
        /// The rejected input.
        value: String,
    },

    /// A vitals value that could not be parsed.
    #[error("invalid vital sign '{field}': {message}")]
    InvalidVital {
        /// Which measurement was rejected.
        field: &'static str,
        /// Why it was rejected.
        message: String,
    },

    /// The notification service rejected a request.
    #[error("notification error: {0}")]
    Notification(String),

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for trailtriage operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new notification error.
    #[must_use]
    pub fn notification(message: impl Into<String>) -> Self {
        Self::Notification(message.into())
    }

    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create an invalid vital sign error.
    #[must_use]
    pub fn invalid_vital(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidVital {
            field,
            message: message.into(),
        }
    }

    /// Check if this error came from the persistence layer.
    #[must_use]
    pub fn is_storage_error(&self) -> bool {
        matches!(
            self,
            Self::DatabaseOpen { .. } | Self::DatabaseQuery(_) | Self::DatabaseMigration { .. }
        )
    }

    /// Check if this error is a rejected user input.
    #[must_use]
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::InvalidInterval { .. } | Self::InvalidVital { .. })
    }
}
