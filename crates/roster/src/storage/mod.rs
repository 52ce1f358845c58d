//! Key-value persistence for roster.
//!
//! The record store persists its whole collection as one string under one
//! key. This module defines that seam as the [`Backend`] trait and provides
//! two implementations:
//!
//! - [`SqliteBackend`]: durable storage in a single `SQLite` file. Every value
//!   is stored with a BLAKE3 checksum, so a value that was altered outside
//!   roster is reported as corrupt instead of being trusted.
//! - [`MemoryBackend`]: an in-process map, for tests and headless embedding.

mod memory;
pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};

pub use memory::MemoryBackend;

/// A synchronous key-value store holding whole serialized values.
///
/// `write` replaces the value under a key in one step; once it returns `Ok`,
/// a subsequent `read` (in this or a later session) returns the new value.
pub trait Backend {
    /// Read the value stored under `key`, or `None` if the key is absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read or the stored value
    /// fails its integrity check.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be written.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// When the value under `key` was last written, if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>>;

    /// Human-readable location of this backend (for status output).
    fn location(&self) -> String;
}

/// `SQLite`-backed key-value storage.
#[derive(Debug)]
pub struct SqliteBackend {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl SqliteBackend {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// and initializes the schema if this is a new database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // Every write must be on disk before the call returns.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory database, for tests.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the database file in bytes (0 for in-memory databases).
    #[must_use]
    pub fn size_bytes(&self) -> u64 {
        if self.path.to_string_lossy() == ":memory:" {
            0
        } else {
            std::fs::metadata(&self.path).map(|m| m.len()).unwrap_or(0)
        }
    }
}

/// Hex-encoded BLAKE3 checksum of a stored value.
#[must_use]
pub fn checksum(value: &str) -> String {
    blake3::hash(value.as_bytes()).to_hex().to_string()
}

impl Backend for SqliteBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let row: Option<(String, String)> = self
            .conn
            .query_row(
                "SELECT value, checksum FROM entries WHERE key = ?1",
                [key],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((value, stored_checksum)) = row else {
            return Ok(None);
        };

        if checksum(&value) != stored_checksum {
            return Err(Error::corruption(key, "checksum mismatch"));
        }
        Ok(Some(value))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        let updated_at = Utc::now().to_rfc3339();
        self.conn.execute(
            r"
            INSERT OR REPLACE INTO entries (key, value, checksum, updated_at)
            VALUES (?1, ?2, ?3, ?4)
            ",
            params![key, value, checksum(value), updated_at],
        )?;
        debug!(key = %key, bytes = value.len(), "Wrote entry");
        Ok(())
    }

    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let updated_at: Option<String> = self
            .conn
            .query_row(
                "SELECT updated_at FROM entries WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(updated_at
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|dt| dt.with_timezone(&Utc)))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
