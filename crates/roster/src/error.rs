//! Error types for roster.
//!
//! This module defines the error type shared by the record store, the storage
//! backends, configuration loading and the command interface. Field-level
//! validation failures are not errors; see [`crate::validation::ValidationErrors`].

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for roster operations.
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

    /// Failed to run database migrations.
    #[error("database migration failed: {message}")]
    DatabaseMigration {
        /// Description of what went wrong.
        message: String,
    },

    /// A stored value could not be trusted.
    #[error("stored value under '{key}' is corrupt: {reason}")]
    StorageCorruption {
        /// The storage key that was read.
        key: String,
        /// What was wrong with the value.
        reason: String,
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

    // === Record Errors ===
    /// A positional index did not address a record.
    #[error("record index {index} is out of range (collection has {len} records)")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Length of the collection at the time of the call.
        len: usize,
    },

    /// Another record already uses this student ID.
    #[error("student ID '{id}' already exists")]
    DuplicateId {
        /// The conflicting ID.
        id: String,
    },

    /// No record carries this student ID.
    #[error("no record with student ID '{id}'")]
    RecordNotFound {
        /// The missing ID.
        id: String,
    },

    /// A delete was confirmed without being requested first.
    #[error("no delete is pending confirmation")]
    NoPendingDelete,

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

    // === Generic Errors ===
    /// An internal error occurred (bug).
    #[error("internal error: {0}")]
    Internal(String),
}

/// A specialized Result type for roster operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a new internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Create a storage corruption error.
    #[must_use]
    pub fn corruption(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::StorageCorruption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a duplicate ID error.
    #[must_use]
    pub fn duplicate_id(id: impl Into<String>) -> Self {
        Self::DuplicateId { id: id.into() }
    }

    /// Create a record-not-found error.
    #[must_use]
    pub fn record_not_found(id: impl Into<String>) -> Self {
        Self::RecordNotFound { id: id.into() }
    }

    /// Check if this error came from a stale or invalid index.
    #[must_use]
    pub fn is_out_of_range(&self) -> bool {
        matches!(self, Self::IndexOutOfRange { .. })
    }

    /// Check if this error is a storage corruption.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::StorageCorruption { .. })
    }
}
