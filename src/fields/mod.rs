//! Bound output fields
//!
//! The picker reads and writes its selection through a small set of
//! text-valued slots addressed by caller-supplied identifiers (form inputs
//! in a browser, a JSON file for the CLI, plain memory for tests and the
//! HTTP front end).

pub mod file;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Read/write access to bound text fields
pub trait FieldStore: Send + Sync {
    /// Current text of a field, or None if the field has never been written
    fn read(&self, id: &str) -> Option<String>;

    /// Replace the text of a field
    fn write(&self, id: &str, value: &str);
}

/// In-memory field store
#[derive(Debug, Default)]
pub struct MemoryFields {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-filled with field values
    pub fn with_values<I, K, V>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            values: Mutex::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Copy of all field values
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl FieldStore for MemoryFields {
    fn read(&self, id: &str) -> Option<String> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    fn write(&self, id: &str, value: &str) {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.to_string(), value.to_string());
    }
}
