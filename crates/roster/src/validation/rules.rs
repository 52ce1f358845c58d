//! Field format rules.
//!
//! Each rule is a compiled, anchored regex plus the message shown next to the
//! field when a value does not match. The student ID rule is generated from an
//! [`IdPolicy`], so deployments that use a different ID scheme change one
//! configuration value instead of the code.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::Field;

/// Letters and whitespace only.
const NAME_PATTERN: &str = r"^[a-zA-Z\s]+$";

/// `local-part@domain.tld`, with a top-level segment of two or more letters.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$";

/// Exactly ten ASCII digits.
const CONTACT_PATTERN: &str = r"^[0-9]{10}$";

/// A compiled format rule for one field.
#[derive(Debug)]
pub struct FieldRule {
    /// The field this rule checks.
    pub field: Field,

    /// Message reported when a value fails the rule.
    pub message: String,

    regex: Regex,
}

impl FieldRule {
    /// Compile a new rule.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern is not a valid regex.
    pub fn new(field: Field, message: impl Into<String>, pattern: &str) -> Result<Self> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::internal(format!("invalid {field} pattern {pattern}: {e}")))?;
        Ok(Self {
            field,
            message: message.into(),
            regex,
        })
    }

    /// Check whether a value satisfies this rule.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }

    /// The regex source this rule was compiled from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

/// Characters permitted in a student ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdCharset {
    /// ASCII digits only.
    #[default]
    Digits,
    /// ASCII letters and digits.
    Alphanumeric,
}

impl std::fmt::Display for IdCharset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Digits => write!(f, "digits"),
            Self::Alphanumeric => write!(f, "alphanumeric"),
        }
    }
}

/// Format policy for student IDs.
///
/// The default accepts any non-empty run of digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdPolicy {
    /// Permitted characters.
    pub charset: IdCharset,
    /// Required length, or `None` for any length.
    pub length: Option<usize>,
}

impl IdPolicy {
    /// Digits of any length.
    #[must_use]
    pub fn digits() -> Self {
        Self::default()
    }

    /// Letters and digits of exactly `length` characters.
    #[must_use]
    pub fn alphanumeric(length: usize) -> Self {
        Self {
            charset: IdCharset::Alphanumeric,
            length: Some(length),
        }
    }

    /// Digits of exactly `length` characters.
    #[must_use]
    pub fn fixed_digits(length: usize) -> Self {
        Self {
            charset: IdCharset::Digits,
            length: Some(length),
        }
    }

    /// Anchored regex for this policy.
    #[must_use]
    pub fn pattern(&self) -> String {
        let class = match self.charset {
            IdCharset::Digits => "[0-9]",
            IdCharset::Alphanumeric => "[a-zA-Z0-9]",
        };
        match self.length {
            Some(n) => format!("^{class}{{{n}}}$"),
            None => format!("^{class}+$"),
        }
    }

    /// Message reported when an ID does not satisfy this policy.
    #[must_use]
    pub fn message(&self) -> String {
        let base = match self.charset {
            IdCharset::Digits => "Field must contain only numbers",
            IdCharset::Alphanumeric => "Field must contain only letters and numbers",
        };
        match self.length {
            Some(n) => format!("{base} (exactly {n} characters)"),
            None => base.to_string(),
        }
    }

    /// Short description for status output.
    #[must_use]
    pub fn describe(&self) -> String {
        match self.length {
            Some(n) => format!("{}, exactly {n} characters", self.charset),
            None => format!("{}, any length", self.charset),
        }
    }

    /// Build the ID format rule for this policy.
    ///
    /// # Errors
    ///
    /// Returns an error if the policy cannot be compiled.
    pub fn rule(&self) -> Result<FieldRule> {
        FieldRule::new(Field::Id, self.message(), &self.pattern())
    }
}

/// Build the format rules for every field, in form order.
///
/// # Errors
///
/// Returns an error if any rule fails to compile.
pub fn format_rules(id_policy: &IdPolicy) -> Result<Vec<FieldRule>> {
    Ok(vec![
        FieldRule::new(
            Field::Name,
            "Please enter a valid name (letters and spaces only)",
            NAME_PATTERN,
        )?,
        id_policy.rule()?,
        FieldRule::new(
            Field::Email,
            "Please enter a valid email address",
            EMAIL_PATTERN,
        )?,
        FieldRule::new(
            Field::Contact,
            "Field must contain only 10 digit numbers",
            CONTACT_PATTERN,
        )?,
    ])
}

/// Message reported when a required field is empty.
#[must_use]
pub fn required_message(field: Field) -> &'static str {
    match field {
        Field::Name => "Student name is required",
        Field::Id => "Student ID is required",
        Field::Email => "Email is required",
        Field::Contact => "Contact number is required",
    }
}

/// Message reported when an ID collides with another record.
pub const DUPLICATE_ID_MESSAGE: &str = "Student ID already exists";
