//! File-backed field store
//!
//! Keeps the bound fields in a JSON object so the CLI can pick up the
//! selection left behind by a previous run. Stored in the XDG data
//! directory (~/.local/share/loc-picker/fields.json).

use crate::config::defaults::APP_DIR_NAME;
use crate::error::{Error, Result};
use crate::fields::{FieldStore, MemoryFields};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

const FIELDS_FILE_NAME: &str = "fields.json";

/// Field store persisted as JSON
///
/// Writes go to memory; call `save` to flush them to disk.
#[derive(Debug)]
pub struct FileFields {
    fields: MemoryFields,
    path: PathBuf,
}

impl FileFields {
    /// Get the data directory path
    pub fn data_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|p| p.join(APP_DIR_NAME))
            .ok_or_else(|| Error::Config("Could not determine data directory".to_string()))
    }

    /// Get the fields file path
    pub fn fields_path() -> Result<PathBuf> {
        Ok(Self::data_dir()?.join(FIELDS_FILE_NAME))
    }

    /// Load fields from the default path
    pub fn load() -> Result<Self> {
        Self::load_from(Self::fields_path()?)
    }

    /// Load fields from a specific path
    ///
    /// A missing file yields an empty store.
    pub fn load_from(path: PathBuf) -> Result<Self> {
        let values: BTreeMap<String, String> = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| Error::Config(format!("Failed to read fields file: {}", e)))?;

            serde_json::from_str(&content)
                .map_err(|e| Error::Config(format!("Failed to parse fields file: {}", e)))?
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            fields: MemoryFields::with_values(values),
            path,
        })
    }

    /// Save fields to disk
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                Error::Config(format!("Failed to create data directory: {}", e))
            })?;
        }

        let values: BTreeMap<String, String> = self.fields.snapshot().into_iter().collect();
        let content = serde_json::to_string_pretty(&values)?;
        fs::write(&self.path, content)?;

        Ok(())
    }

    /// Path this store saves to
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl FieldStore for FileFields {
    fn read(&self, id: &str) -> Option<String> {
        self.fields.read(id)
    }

    fn write(&self, id: &str, value: &str) {
        self.fields.write(id, value)
    }
}
