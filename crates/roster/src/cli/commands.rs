//! CLI command definitions.
//!
//! Record positions on the command line are 1-based, matching the "No."
//! column printed by `list` and `search`.

use std::path::PathBuf;

use clap::builder::RangedU64ValueParser;
use clap::{Args, Subcommand, ValueEnum};

use crate::record::StudentRecord;

/// Add command arguments.
///
/// Omitted fields are submitted empty and reported as missing.
#[derive(Debug, Args)]
pub struct AddCommand {
    /// Student name (letters and spaces)
    #[arg(short, long, default_value = "")]
    pub name: String,

    /// Student ID
    #[arg(short, long, default_value = "")]
    pub id: String,

    /// Email address
    #[arg(short, long, default_value = "")]
    pub email: String,

    /// Contact number (10 digits)
    #[arg(short = 'p', long, default_value = "")]
    pub contact: String,
}

impl AddCommand {
    /// The candidate record described by these arguments.
    #[must_use]
    pub fn candidate(&self) -> StudentRecord {
        StudentRecord::new(&self.name, &self.id, &self.email, &self.contact)
    }
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Search command arguments.
#[derive(Debug, Args)]
pub struct SearchCommand {
    /// Text to look for in any field (case-insensitive)
    pub query: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Edit command arguments.
#[derive(Debug, Args)]
pub struct EditCommand {
    /// Position of the record to edit (as shown by `list`)
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub position: usize,

    /// New student name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New student ID
    #[arg(short, long)]
    pub id: Option<String>,

    /// New email address
    #[arg(short, long)]
    pub email: Option<String>,

    /// New contact number
    #[arg(short = 'p', long)]
    pub contact: Option<String>,
}

impl EditCommand {
    /// Apply the provided overrides to a prefilled record.
    #[must_use]
    pub fn apply(&self, prefill: &StudentRecord) -> StudentRecord {
        let mut record = prefill.clone();
        if let Some(name) = &self.name {
            record.name.clone_from(name);
        }
        if let Some(id) = &self.id {
            record.id.clone_from(id);
        }
        if let Some(email) = &self.email {
            record.email.clone_from(email);
        }
        if let Some(contact) = &self.contact {
            record.contact.clone_from(contact);
        }
        record
    }

    /// Check if any field override was given.
    #[must_use]
    pub fn has_changes(&self) -> bool {
        self.name.is_some() || self.id.is_some() || self.email.is_some() || self.contact.is_some()
    }
}

/// Delete command arguments.
#[derive(Debug, Args)]
pub struct DeleteCommand {
    /// Position of the record to delete (as shown by `list`)
    #[arg(value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
    pub position: usize,

    /// Confirm the deletion
    #[arg(short, long)]
    pub yes: bool,
}

/// Status command arguments.
#[derive(Debug, Args)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for record listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// One line per record
    Plain,
    /// Aligned table
    #[default]
    Table,
    /// JSON array
    Json,
}
