//! Student record types.
//!
//! A [`StudentRecord`] is four plain strings. Its serialized form is the
//! persisted format: a JSON object with the keys `name`, `id`, `email` and
//! `contact`.

use serde::{Deserialize, Serialize};

/// One field of a student record, in form order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// The student's full name.
    Name,
    /// The student ID, unique across the collection.
    Id,
    /// Email address.
    Email,
    /// Contact phone number.
    Contact,
}

impl Field {
    /// All fields, in form order.
    pub const ALL: [Field; 4] = [Self::Name, Self::Id, Self::Email, Self::Contact];

    /// The stable key used in error maps and JSON output.
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Id => "id",
            Self::Email => "email",
            Self::Contact => "contact",
        }
    }

    /// Human-readable label for table headers and messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Student Name",
            Self::Id => "Student ID",
            Self::Email => "Email",
            Self::Contact => "Contact",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A single student's stored data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Full name.
    pub name: String,
    /// Student ID.
    pub id: String,
    /// Email address.
    pub email: String,
    /// Contact number.
    pub contact: String,
}

impl StudentRecord {
    /// Create a record from its four fields.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        id: impl Into<String>,
        email: impl Into<String>,
        contact: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            id: id.into(),
            email: email.into(),
            contact: contact.into(),
        }
    }

    /// Get the value of a field.
    #[must_use]
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Id => &self.id,
            Field::Email => &self.email,
            Field::Contact => &self.contact,
        }
    }

    /// Get a mutable reference to a field.
    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Id => &mut self.id,
            Field::Email => &mut self.email,
            Field::Contact => &mut self.contact,
        }
    }

    /// Iterate over `(field, value)` pairs in form order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL.into_iter().map(move |field| (field, self.get(field)))
    }

    /// Return a copy with surrounding whitespace removed from every field.
    #[must_use]
    pub fn trimmed(&self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            id: self.id.trim().to_string(),
            email: self.email.trim().to_string(),
            contact: self.contact.trim().to_string(),
        }
    }

    /// Case-insensitive substring match against any field.
    ///
    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.fields()
            .any(|(_, value)| value.to_lowercase().contains(needle))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ann() -> StudentRecord {
        StudentRecord::new("Ann Lee", "12345", "a@b.com", "1234567890")
    }

    #[test]
    fn test_field_keys() {
        assert_eq!(Field::Name.key(), "name");
        assert_eq!(Field::Id.key(), "id");
        assert_eq!(Field::Email.key(), "email");
        assert_eq!(Field::Contact.key(), "contact");
        assert_eq!(Field::Contact.to_string(), "contact");
    }

    #[test]
    fn test_field_order_follows_form() {
        let mut fields = vec![Field::Contact, Field::Name, Field::Email, Field::Id];
        fields.sort();
        assert_eq!(fields, Field::ALL.to_vec());
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut record = ann();
        assert_eq!(record.get(Field::Email), "a@b.com");

        *record.get_mut(Field::Email) = "ann@school.edu".to_string();
        assert_eq!(record.email, "ann@school.edu");
    }

    #[test]
    fn test_trimmed() {
        let record = StudentRecord::new("  Ann Lee ", "\t12345", "a@b.com\n", " 1234567890 ");
        assert_eq!(record.trimmed(), ann());
    }

    #[test]
    fn test_matches_lowercase_any_field() {
        let record = ann();
        assert!(record.matches_lowercase("lee"));
        assert!(record.matches_lowercase("234"));
        assert!(record.matches_lowercase("b.com"));
        assert!(!record.matches_lowercase("kim"));
    }

    #[test]
    fn test_serialized_keys_match_storage_format() {
        let json = serde_json::to_value(ann()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "name": "Ann Lee",
                "id": "12345",
                "email": "a@b.com",
                "contact": "1234567890"
            })
        );
    }

    #[test]
    fn test_field_serializes_as_key() {
        assert_eq!(serde_json::to_string(&Field::Contact).unwrap(), "\"contact\"");
    }
}
