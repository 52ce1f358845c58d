//! `roster` - A student record manager
//!
//! This library keeps an ordered collection of student records, validates
//! candidates before they are accepted, and mirrors the collection to a
//! key-value backend after every change.
//!
//! # Example
//!
//! ```
//! use roster::storage::MemoryBackend;
//! use roster::validation::{IdPolicy, Validator};
//! use roster::{Registry, RecordStore, StudentRecord, SubmitOutcome};
//!
//! let store = RecordStore::open(MemoryBackend::new());
//! let mut registry = Registry::new(store, Validator::new(IdPolicy::default()).unwrap());
//!
//! let candidate = StudentRecord::new("Ann Lee", "12345", "a@b.com", "1234567890");
//! let outcome = registry.submit(&candidate).unwrap();
//! assert_eq!(outcome, SubmitOutcome::Registered { index: 0 });
//! assert_eq!(registry.search("lee").len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod record;
pub mod registry;
pub mod storage;
pub mod store;
pub mod validation;

pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use record::{Field, StudentRecord};
pub use registry::{Registry, SubmitOutcome};
pub use storage::{Backend, MemoryBackend, SqliteBackend};
pub use store::RecordStore;
pub use validation::{ValidationErrors, ValidationResult, Validator};
