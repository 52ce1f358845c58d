//! In-process key-value backend.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::Backend;
use crate::error::Result;

/// A [`Backend`] that keeps values in a map for the life of the process.
///
/// Cloning a `MemoryBackend` copies its contents, which lets tests simulate a
/// fresh session reading what an earlier one wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    entries: HashMap<String, (String, DateTime<Utc>)>,
}

impl MemoryBackend {
    /// Create an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend holding `value` under `key`.
    #[must_use]
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut backend = Self::new();
        backend
            .entries
            .insert(key.into(), (value.into(), Utc::now()));
        backend
    }

    /// Number of keys stored.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if nothing has been stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Backend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|(value, _)| value.clone()))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries
            .insert(key.to_string(), (value.to_string(), Utc::now()));
        Ok(())
    }

    fn last_written(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        Ok(self.entries.get(key).map(|(_, at)| *at))
    }

    fn location(&self) -> String {
        "memory".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_empty() {
        let backend = MemoryBackend::new();
        assert!(backend.is_empty());
        assert!(backend.read("students").unwrap().is_none());
        assert_eq!(backend.location(), "memory");
    }

    #[test]
    fn test_with_entry() {
        let backend = MemoryBackend::with_entry("students", "[]");
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.read("students").unwrap().as_deref(), Some("[]"));
        assert!(backend.last_written("students").unwrap().is_some());
    }

    #[test]
    fn test_write_replaces() {
        let mut backend = MemoryBackend::new();
        backend.write("k", "one").unwrap();
        backend.write("k", "two").unwrap();
        assert_eq!(backend.len(), 1);
        assert_eq!(backend.read("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn test_clone_copies_contents() {
        let mut backend = MemoryBackend::new();
        backend.write("k", "v").unwrap();

        let copy = backend.clone();
        backend.write("k", "changed").unwrap();

        assert_eq!(copy.read("k").unwrap().as_deref(), Some("v"));
    }
}
