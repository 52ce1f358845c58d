//! Candidate record validation.
//!
//! Validation never fails with an [`Error`](crate::Error): it returns a
//! [`ValidationResult`] whose error side maps each failing field to the message
//! a UI should show next to that input.
//!
//! Rules run in this order:
//!
//! 1. **Presence**: every field must be non-empty after trimming. If any is
//!    missing, only the missing fields are reported.
//! 2. **Format**: name, student ID (per the configured [`IdPolicy`]), email and
//!    contact are each checked against their rule.
//! 3. **Uniqueness**: a well-formed ID must not belong to another record. The
//!    record being edited is excluded.
//!
//! All format and uniqueness failures are reported together.
//!
//! # Example
//!
//! ```
//! use roster::record::{Field, StudentRecord};
//! use roster::validation::{IdPolicy, Validator};
//!
//! let validator = Validator::new(IdPolicy::default()).unwrap();
//! let candidate = StudentRecord::new("A1", "abc", "bad", "123");
//!
//! let result = validator.validate(&candidate, &[], None);
//! let errors = result.errors().unwrap();
//! assert_eq!(errors.len(), 4);
//! assert!(errors.get(Field::Id).is_some());
//! ```

mod rules;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::Result;
use crate::record::{Field, StudentRecord};

pub use rules::{
    format_rules, required_message, FieldRule, IdCharset, IdPolicy, DUPLICATE_ID_MESSAGE,
};

/// Field-keyed validation messages. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    /// Get the message for a field, if it failed.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    /// Check whether a field failed.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    /// Number of failing fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate failing fields and messages in form order.
    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    /// The failing fields, in form order.
    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }
}

impl std::fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (field, msg) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {msg}")?;
            first = false;
        }
        Ok(())
    }
}

/// Outcome of validating a candidate record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    /// The candidate may be stored.
    Valid,

    /// One or more fields failed.
    Invalid(ValidationErrors),
}

impl ValidationResult {
    /// Check if the candidate passed.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    /// Get the errors, if any.
    #[must_use]
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Valid => None,
            Self::Invalid(errors) => Some(errors),
        }
    }

    fn from_map(map: BTreeMap<Field, String>) -> Self {
        if map.is_empty() {
            Self::Valid
        } else {
            Self::Invalid(ValidationErrors(map))
        }
    }
}

/// Compiled validator for candidate records.
#[derive(Debug)]
pub struct Validator {
    id_policy: IdPolicy,
    rules: Vec<FieldRule>,
}

impl Validator {
    /// Compile a validator with the given student ID policy.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule fails to compile.
    pub fn new(id_policy: IdPolicy) -> Result<Self> {
        Ok(Self {
            id_policy,
            rules: format_rules(&id_policy)?,
        })
    }

    /// The student ID policy in effect.
    #[must_use]
    pub fn id_policy(&self) -> IdPolicy {
        self.id_policy
    }

    /// Validate `candidate` against the format rules and against `collection`.
    ///
    /// `editing` is the position of the record being replaced, if any; that
    /// record is ignored by the uniqueness check.
    #[must_use]
    pub fn validate(
        &self,
        candidate: &StudentRecord,
        collection: &[StudentRecord],
        editing: Option<usize>,
    ) -> ValidationResult {
        let candidate = candidate.trimmed();

        let missing: BTreeMap<Field, String> = candidate
            .fields()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| (field, required_message(field).to_string()))
            .collect();
        if !missing.is_empty() {
            debug!(missing = missing.len(), "Candidate has empty fields");
            return ValidationResult::from_map(missing);
        }

        let mut errors = BTreeMap::new();
        for rule in &self.rules {
            if !rule.matches(candidate.get(rule.field)) {
                trace!(field = %rule.field, "Format rule failed");
                errors.insert(rule.field, rule.message.clone());
            }
        }

        if !errors.contains_key(&Field::Id) && is_taken(&candidate.id, collection, editing) {
            trace!(id = %candidate.id, "Student ID already in use");
            errors.insert(Field::Id, DUPLICATE_ID_MESSAGE.to_string());
        }

        if !errors.is_empty() {
            debug!(failed = errors.len(), "Candidate rejected");
        }
        ValidationResult::from_map(errors)
    }
}

/// Check whether `id` is used by any record other than the one at `editing`.
fn is_taken(id: &str, collection: &[StudentRecord], editing: Option<usize>) -> bool {
    collection
        .iter()
        .enumerate()
        .any(|(index, record)| record.id == id && Some(index) != editing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::init_test_logging;

    fn validator() -> Validator {
        Validator::new(IdPolicy::default()).unwrap()
    }

    fn ann() -> StudentRecord {
        StudentRecord::new("Ann Lee", "12345", "a@b.com", "1234567890")
    }

    fn collection() -> Vec<StudentRecord> {
        vec![
            StudentRecord::new("Bob Kim", "100", "bob@kim.org", "1111111111"),
            StudentRecord::new("Cara Diaz", "200", "cara@diaz.net", "2222222222"),
            StudentRecord::new("Dan Moe", "300", "dan@moe.io", "3333333333"),
        ]
    }

    #[test]
    fn test_valid_candidate() {
        init_test_logging();
        let result = validator().validate(&ann(), &collection(), None);
        assert!(result.is_valid());
        assert!(result.errors().is_none());
    }

    #[test]
    fn test_all_four_fields_invalid() {
        let candidate = StudentRecord::new("A1", "abc", "bad", "123");
        let result = validator().validate(&candidate, &[], None);

        let errors = result.errors().expect("expected errors");
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(Field::Name),
            Some("Please enter a valid name (letters and spaces only)")
        );
        assert_eq!(errors.get(Field::Id), Some("Field must contain only numbers"));
        assert_eq!(
            errors.get(Field::Email),
            Some("Please enter a valid email address")
        );
        assert_eq!(
            errors.get(Field::Contact),
            Some("Field must contain only 10 digit numbers")
        );
    }

    #[test]
    fn test_missing_fields_short_circuit_format_rules() {
        let candidate = StudentRecord::new("   ", "abc", "", "123");
        let result = validator().validate(&candidate, &[], None);

        let errors = result.errors().unwrap();
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec![Field::Name, Field::Email]);
        assert_eq!(errors.get(Field::Name), Some("Student name is required"));
        assert_eq!(errors.get(Field::Email), Some("Email is required"));
        assert!(!errors.contains(Field::Id));
        assert!(!errors.contains(Field::Contact));
    }

    #[test]
    fn test_all_missing() {
        let result = validator().validate(&StudentRecord::default(), &[], None);
        let errors = result.errors().unwrap();
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get(Field::Id), Some("Student ID is required"));
        assert_eq!(errors.get(Field::Contact), Some("Contact number is required"));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let candidate = StudentRecord::new(" Ann Lee ", " 12345 ", " a@b.com ", " 1234567890 ");
        assert!(validator().validate(&candidate, &[], None).is_valid());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let mut candidate = ann();
        candidate.id = "200".to_string();

        let result = validator().validate(&candidate, &collection(), None);
        let errors = result.errors().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(Field::Id), Some(DUPLICATE_ID_MESSAGE));
    }

    #[test]
    fn test_editing_same_record_does_not_self_conflict() {
        let records = collection();
        let mut candidate = records[2].clone();
        candidate.email = "dan.moe@school.edu".to_string();

        assert!(validator().validate(&candidate, &records, Some(2)).is_valid());
    }

    #[test]
    fn test_editing_into_another_records_id_conflicts() {
        let records = collection();
        let mut candidate = records[2].clone();
        candidate.id = "100".to_string();

        let result = validator().validate(&candidate, &records, Some(2));
        assert_eq!(result.errors().unwrap().get(Field::Id), Some(DUPLICATE_ID_MESSAGE));
    }

    #[test]
    fn test_format_error_takes_precedence_over_duplicate() {
        let records = vec![StudentRecord::new("Odd One", "x1", "o@o.com", "1234567890")];
        let mut candidate = ann();
        candidate.id = "x1".to_string();

        let result = validator().validate(&candidate, &records, None);
        assert_eq!(
            result.errors().unwrap().get(Field::Id),
            Some("Field must contain only numbers")
        );
    }

    #[test]
    fn test_configured_id_policy() {
        let validator = Validator::new(IdPolicy::alphanumeric(8)).unwrap();
        assert_eq!(validator.id_policy(), IdPolicy::alphanumeric(8));

        let mut candidate = ann();
        candidate.id = "AB12cd34".to_string();
        assert!(validator.validate(&candidate, &[], None).is_valid());

        candidate.id = "12345".to_string();
        let result = validator.validate(&candidate, &[], None);
        assert!(result.errors().unwrap().contains(Field::Id));
    }

    #[test]
    fn test_errors_display_in_form_order() {
        let candidate = StudentRecord::new("Ann Lee", "abc", "a@b.com", "123");
        let result = validator().validate(&candidate, &[], None);
        let text = result.errors().unwrap().to_string();
        assert!(text.starts_with("id: "));
        assert!(text.contains("; contact: "));
    }

    #[test]
    fn test_errors_serialize_keyed_by_field() {
        let candidate = StudentRecord::new("Ann Lee", "12345", "bad", "1234567890");
        let result = validator().validate(&candidate, &[], None);
        let json = serde_json::to_value(result.errors().unwrap()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"email": "Please enter a valid email address"})
        );
    }
}
