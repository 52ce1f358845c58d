//! The in-memory record collection and its persistence.
//!
//! [`RecordStore`] owns the ordered collection of student records. It is
//! loaded once from a [`Backend`] and writes the whole collection back after
//! every mutation, before the mutating call returns. If that write fails the
//! mutation is undone, so memory never holds changes that storage does not.
//!
//! Loading never fails: a missing, unreadable or malformed stored value is
//! logged and replaced by an empty collection.

use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::record::StudentRecord;
use crate::storage::Backend;

/// Key the collection is stored under by default.
pub const DEFAULT_KEY: &str = "students";

/// Ordered collection of student records mirrored to a backend.
#[derive(Debug)]
pub struct RecordStore<B> {
    backend: B,
    key: String,
    records: Vec<StudentRecord>,
}

impl<B: Backend> RecordStore<B> {
    /// Open a store over `backend` using the default key.
    #[must_use]
    pub fn open(backend: B) -> Self {
        Self::open_with_key(backend, DEFAULT_KEY)
    }

    /// Open a store over `backend`, reading and writing under `key`.
    #[must_use]
    pub fn open_with_key(backend: B, key: impl Into<String>) -> Self {
        let mut store = Self {
            backend,
            key: key.into(),
            records: Vec::new(),
        };
        store.load();
        store
    }

    /// Replace the in-memory collection with what the backend holds.
    ///
    /// Falls back to an empty collection if the stored value is absent,
    /// unreadable or malformed. Records repeating an earlier student ID are
    /// dropped.
    pub fn load(&mut self) -> &[StudentRecord] {
        self.records = match self.backend.read(&self.key) {
            Ok(Some(raw)) => match decode(&raw) {
                Ok(records) => dedupe(records),
                Err(e) => {
                    warn!(key = %self.key, error = %e, "Stored records are unparsable, starting empty");
                    Vec::new()
                }
            },
            Ok(None) => {
                debug!(key = %self.key, "No stored records");
                Vec::new()
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "Could not read stored records, starting empty");
                Vec::new()
            }
        };
        info!(count = self.records.len(), "Loaded student records");
        &self.records
    }

    /// The current collection, in insertion order.
    #[must_use]
    pub fn all(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the collection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Get the record at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StudentRecord> {
        self.records.get(index)
    }

    /// Position of the record with student ID `id`.
    #[must_use]
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    /// The storage key this store uses.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The underlying backend.
    #[must_use]
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Append a record and persist. Returns its position.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateId`] if another record has the same ID, or a
    /// storage error if persisting fails (the collection is left unchanged).
    pub fn insert(&mut self, record: StudentRecord) -> Result<usize> {
        if self.position_of(&record.id).is_some() {
            return Err(Error::duplicate_id(record.id));
        }

        self.records.push(record);
        let index = self.records.len() - 1;
        if let Err(e) = self.persist() {
            self.records.pop();
            return Err(e);
        }

        debug!(index, "Inserted record");
        Ok(index)
    }

    /// Replace the record at `index` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` does not address a
    /// record, [`Error::DuplicateId`] if the new ID belongs to a different
    /// record, or a storage error if persisting fails (the collection is left
    /// unchanged).
    pub fn update(&mut self, index: usize, record: StudentRecord) -> Result<()> {
        self.check_index(index)?;
        if self
            .position_of(&record.id)
            .is_some_and(|other| other != index)
        {
            return Err(Error::duplicate_id(record.id));
        }

        let previous = std::mem::replace(&mut self.records[index], record);
        if let Err(e) = self.persist() {
            self.records[index] = previous;
            return Err(e);
        }

        debug!(index, "Updated record");
        Ok(())
    }

    /// Remove the record at `index`, shifting later records down, and persist.
    /// Returns the removed record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` does not address a
    /// record, or a storage error if persisting fails (the collection is left
    /// unchanged).
    pub fn delete(&mut self, index: usize) -> Result<StudentRecord> {
        self.check_index(index)?;

        let removed = self.records.remove(index);
        if let Err(e) = self.persist() {
            self.records.insert(index, removed);
            return Err(e);
        }

        debug!(index, "Deleted record");
        Ok(removed)
    }

    /// Replace the record with student ID `id` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has that ID, otherwise
    /// as [`RecordStore::update`].
    pub fn update_by_id(&mut self, id: &str, record: StudentRecord) -> Result<usize> {
        let index = self
            .position_of(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        self.update(index, record)?;
        Ok(index)
    }

    /// Remove the record with student ID `id` and persist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RecordNotFound`] if no record has that ID, otherwise
    /// as [`RecordStore::delete`].
    pub fn delete_by_id(&mut self, id: &str) -> Result<StudentRecord> {
        let index = self
            .position_of(id)
            .ok_or_else(|| Error::record_not_found(id))?;
        self.delete(index)
    }

    /// All records matching `predicate`, in collection order.
    pub fn find<P>(&self, mut predicate: P) -> Vec<StudentRecord>
    where
        P: FnMut(&StudentRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|r| predicate(r))
            .cloned()
            .collect()
    }

    /// Records with any field containing `query`, ignoring case.
    ///
    /// Each hit is paired with its position in the full collection. A blank
    /// query matches every record.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<(usize, StudentRecord)> {
        let needle = query.trim().to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| needle.is_empty() || r.matches_lowercase(&needle))
            .map(|(index, r)| (index, r.clone()))
            .collect()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.records.len() {
            Ok(())
        } else {
            Err(Error::IndexOutOfRange {
                index,
                len: self.records.len(),
            })
        }
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.backend.write(&self.key, &json)
    }
}

/// Parse a stored collection. JSON `null` is treated as empty.
fn decode(raw: &str) -> Result<Vec<StudentRecord>> {
    let records: Option<Vec<StudentRecord>> = serde_json::from_str(raw)?;
    Ok(records.unwrap_or_default())
}

/// Drop records whose ID already appeared earlier in the sequence.
fn dedupe(records: Vec<StudentRecord>) -> Vec<StudentRecord> {
    let mut seen = std::collections::HashSet::new();
    records
        .into_iter()
        .filter(|r| {
            let fresh = seen.insert(r.id.clone());
            if !fresh {
                warn!(id = %r.id, "Dropping stored record with duplicate student ID");
            }
            fresh
        })
        .collect()
}
