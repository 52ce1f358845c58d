//! Command interface over the record store.
//!
//! [`Registry`] is what a front end drives: it pairs a [`RecordStore`] with a
//! [`Validator`] and tracks the two pieces of interaction state a form-based
//! UI needs, the record being edited and the record awaiting delete
//! confirmation. Both are tracked by student ID rather than by position, and
//! translated to a position only when the store is called, so an intervening
//! insert or delete cannot redirect them to the wrong record.

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::record::StudentRecord;
use crate::storage::Backend;
use crate::store::RecordStore;
use crate::validation::{ValidationErrors, ValidationResult, Validator};

/// What happened to a submitted candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new record was appended at `index`.
    Registered {
        /// Position of the new record.
        index: usize,
    },

    /// The record being edited was replaced at `index`.
    Updated {
        /// Position of the updated record.
        index: usize,
    },

    /// The candidate failed validation; nothing was stored.
    Rejected(ValidationErrors),
}

impl SubmitOutcome {
    /// Check if the candidate was stored.
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Student record registry: store, validator and edit/delete state.
#[derive(Debug)]
pub struct Registry<B> {
    store: RecordStore<B>,
    validator: Validator,
    editing: Option<String>,
    pending_delete: Option<String>,
}

impl<B: Backend> Registry<B> {
    /// Create a registry over an opened store.
    #[must_use]
    pub fn new(store: RecordStore<B>, validator: Validator) -> Self {
        Self {
            store,
            validator,
            editing: None,
            pending_delete: None,
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<B> {
        &self.store
    }

    /// The validator in use.
    #[must_use]
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// All records, in order.
    #[must_use]
    pub fn records(&self) -> &[StudentRecord] {
        self.store.all()
    }

    /// Validate and store a candidate.
    ///
    /// Fields are trimmed first. While editing, the candidate replaces the
    /// record being edited and edit mode ends; otherwise it is appended.
    /// Validation failures are returned as [`SubmitOutcome::Rejected`].
    ///
    /// # Errors
    ///
    /// Returns an error if the record being edited no longer exists or the
    /// store fails to persist.
    pub fn submit(&mut self, candidate: &StudentRecord) -> Result<SubmitOutcome> {
        let candidate = candidate.trimmed();
        let editing_index = self.editing_position()?;

        if let ValidationResult::Invalid(errors) =
            self.validator
                .validate(&candidate, self.store.all(), editing_index)
        {
            return Ok(SubmitOutcome::Rejected(errors));
        }

        match editing_index {
            Some(index) => {
                self.store.update(index, candidate)?;
                self.editing = None;
                info!(index, "Student record updated");
                Ok(SubmitOutcome::Updated { index })
            }
            None => {
                let index = self.store.insert(candidate)?;
                info!(index, "Student registered");
                Ok(SubmitOutcome::Registered { index })
            }
        }
    }

    /// Enter edit mode for the record at `index` and return it for prefill.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` does not address a record.
    pub fn begin_edit(&mut self, index: usize) -> Result<&StudentRecord> {
        let id = self.record_at(index)?.id.clone();
        debug!(index, id = %id, "Editing record");
        self.editing = Some(id);
        self.record_at(index)
    }

    /// Leave edit mode without changing anything.
    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Position of the record being edited, if in edit mode.
    #[must_use]
    pub fn editing(&self) -> Option<usize> {
        self.editing
            .as_deref()
            .and_then(|id| self.store.position_of(id))
    }

    /// Stage the record at `index` for deletion and return it for the
    /// confirmation prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index` does not address a record.
    pub fn request_delete(&mut self, index: usize) -> Result<&StudentRecord> {
        let id = self.record_at(index)?.id.clone();
        debug!(index, id = %id, "Delete requested");
        self.pending_delete = Some(id);
        self.record_at(index)
    }

    /// Delete the staged record.
    ///
    /// Ends edit mode if the deleted record was being edited.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoPendingDelete`] if nothing was staged,
    /// [`Error::RecordNotFound`] if the staged record is gone, or a storage
    /// error if persisting fails.
    pub fn confirm_delete(&mut self) -> Result<StudentRecord> {
        let id = self.pending_delete.take().ok_or(Error::NoPendingDelete)?;
        let removed = self.store.delete_by_id(&id)?;
        if self.editing.as_deref() == Some(id.as_str()) {
            self.editing = None;
        }
        info!(id = %id, "Student record deleted");
        Ok(removed)
    }

    /// Drop the staged delete.
    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Position of the record staged for deletion, if any.
    #[must_use]
    pub fn pending_delete(&self) -> Option<usize> {
        self.pending_delete
            .as_deref()
            .and_then(|id| self.store.position_of(id))
    }

    /// Case-insensitive substring search over every field.
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<(usize, StudentRecord)> {
        self.store.search(query)
    }

    fn record_at(&self, index: usize) -> Result<&StudentRecord> {
        self.store.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.store.len(),
        })
    }

    fn editing_position(&self) -> Result<Option<usize>> {
        match self.editing.as_deref() {
            None => Ok(None),
            Some(id) => self
                .store
                .position_of(id)
                .map(Some)
                .ok_or_else(|| Error::record_not_found(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;
    use crate::record::Field;
    use crate::storage::MemoryBackend;
    use crate::validation::{IdPolicy, DUPLICATE_ID_MESSAGE};

    fn registry() -> Registry<MemoryBackend> {
        Registry::new(
            RecordStore::open(MemoryBackend::new()),
            Validator::new(IdPolicy::default()).unwrap(),
        )
    }

    fn student(name: &str, id: &str) -> StudentRecord {
        StudentRecord::new(name, id, "student@school.edu", "9876543210")
    }

    fn seeded() -> Registry<MemoryBackend> {
        let mut registry = registry();
        for (name, id) in [("Ann Lee", "1"), ("Bob Kim", "2"), ("Cara Diaz", "3")] {
            registry.submit(&student(name, id)).unwrap();
        }
        registry
    }

    #[test]
    fn test_submit_registers_valid_candidate() {
        init_test_logging();
        let mut registry = registry();
        let candidate = StudentRecord::new("Ann Lee", "12345", "a@b.com", "1234567890");

        let outcome = registry.submit(&candidate).unwrap();

        assert_eq!(outcome, SubmitOutcome::Registered { index: 0 });
        assert!(outcome.is_accepted());
        assert_eq!(registry.records().last(), Some(&candidate));
    }

    #[test]
    fn test_submit_stores_trimmed_values() {
        let mut registry = registry();
        let candidate = StudentRecord::new(" Ann Lee ", " 12345", "a@b.com ", "1234567890");
        registry.submit(&candidate).unwrap();
        assert_eq!(registry.records()[0], candidate.trimmed());
    }

    #[test]
    fn test_submit_rejects_invalid_candidate() {
        let mut registry = registry();
        let outcome = registry
            .submit(&StudentRecord::new("A1", "abc", "bad", "123"))
            .unwrap();

        let SubmitOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.len(), 4);
        assert!(registry.records().is_empty());
    }

    #[test]
    fn test_submit_rejects_duplicate_id() {
        let mut registry = seeded();
        let outcome = registry.submit(&student("Dup Licate", "2")).unwrap();

        let SubmitOutcome::Rejected(errors) = outcome else {
            panic!("expected rejection");
        };
        assert_eq!(errors.get(Field::Id), Some(DUPLICATE_ID_MESSAGE));
        assert_eq!(registry.records().len(), 3);
    }

    #[test]
    fn test_edit_resubmit_same_id_is_not_a_conflict() {
        let mut registry = seeded();
        let mut prefill = registry.begin_edit(2).unwrap().clone();
        assert_eq!(registry.editing(), Some(2));

        prefill.email = "cara@diaz.net".to_string();
        let outcome = registry.submit(&prefill).unwrap();

        assert_eq!(outcome, SubmitOutcome::Updated { index: 2 });
        assert_eq!(registry.records()[2].email, "cara@diaz.net");
        assert_eq!(registry.editing(), None);
        assert_eq!(registry.records().len(), 3);
    }

    #[test]
    fn test_rejected_edit_stays_in_edit_mode() {
        let mut registry = seeded();
        let mut prefill = registry.begin_edit(0).unwrap().clone();
        prefill.contact = "12".to_string();

        let outcome = registry.submit(&prefill).unwrap();
        assert!(!outcome.is_accepted());
        assert_eq!(registry.editing(), Some(0));
    }

    #[test]
    fn test_cancel_edit_returns_to_registration() {
        let mut registry = seeded();
        registry.begin_edit(1).unwrap();
        registry.cancel_edit();

        let outcome = registry.submit(&student("Dan Moe", "4")).unwrap();
        assert_eq!(outcome, SubmitOutcome::Registered { index: 3 });
    }

    #[test]
    fn test_edit_target_follows_record_after_delete() {
        let mut registry = seeded();
        let mut prefill = registry.begin_edit(2).unwrap().clone();

        registry.request_delete(0).unwrap();
        registry.confirm_delete().unwrap();
        assert_eq!(registry.editing(), Some(1));

        prefill.name = "Cara Maria Diaz".to_string();
        let outcome = registry.submit(&prefill).unwrap();
        assert_eq!(outcome, SubmitOutcome::Updated { index: 1 });
        assert_eq!(registry.records()[1].name, "Cara Maria Diaz");
    }

    #[test]
    fn test_begin_edit_out_of_range() {
        let mut registry = seeded();
        assert!(registry.begin_edit(3).unwrap_err().is_out_of_range());
        assert_eq!(registry.editing(), None);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut registry = seeded();
        let shown = registry.request_delete(1).unwrap().clone();
        assert_eq!(shown.name, "Bob Kim");
        assert_eq!(registry.records().len(), 3);
        assert_eq!(registry.pending_delete(), Some(1));

        let removed = registry.confirm_delete().unwrap();
        assert_eq!(removed, shown);
        assert_eq!(registry.records().len(), 2);
        assert_eq!(registry.records()[1].name, "Cara Diaz");
        assert_eq!(registry.pending_delete(), None);
    }

    #[test]
    fn test_cancel_delete() {
        let mut registry = seeded();
        registry.request_delete(0).unwrap();
        registry.cancel_delete();

        assert!(matches!(
            registry.confirm_delete().unwrap_err(),
            Error::NoPendingDelete
        ));
        assert_eq!(registry.records().len(), 3);
    }

    #[test]
    fn test_deleting_edited_record_ends_edit_mode() {
        let mut registry = seeded();
        registry.begin_edit(1).unwrap();
        registry.request_delete(1).unwrap();
        registry.confirm_delete().unwrap();

        assert_eq!(registry.editing(), None);
        let outcome = registry.submit(&student("Eve Ray", "5")).unwrap();
        assert_eq!(outcome, SubmitOutcome::Registered { index: 2 });
    }

    #[test]
    fn test_search_returns_collection_positions() {
        let mut registry = registry();
        registry.submit(&student("Ann Lee", "1")).unwrap();
        registry.submit(&student("Bob Kim", "2")).unwrap();

        let hits = registry.search("LEE");
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].0, 0);
        assert_eq!(hits[0].1.name, "Ann Lee");

        let hits = registry.search("kim");
        assert_eq!(hits[0].0, 1);
    }

    #[test]
    fn test_state_survives_a_fresh_session() {
        let mut registry = seeded();
        registry.request_delete(0).unwrap();
        registry.confirm_delete().unwrap();
        let expected = registry.records().to_vec();

        let backend = registry.store().backend().clone();
        let fresh = Registry::new(
            RecordStore::open(backend),
            Validator::new(IdPolicy::default()).unwrap(),
        );
        assert_eq!(fresh.records(), expected.as_slice());
    }
}
