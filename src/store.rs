// src/store.rs

use std::fs;
use std::path::{Path, PathBuf};

use log::debug;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

pub const USERS: &str = "users";
pub const TEAMS: &str = "teams";
pub const BOARDS: &str = "boards";
pub const TASKS: &str = "tasks";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("collection {0} has not been created yet")]
    Missing(String),
    #[error("{0}")]
    Io(String),
    #[error("{0}")]
    Parse(String),
}

/// JSON-file persistence: one document per collection under the data
/// directory, each holding the full array of records for that entity type.
///
/// Single-writer assumption: concurrent external writers are unsupported.
#[derive(Clone)]
pub struct FileStore {
    data_dir: PathBuf,
}

impl FileStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)
            .map_err(|e| StoreError::Io(format!("Failed to create data directory: {}", e)))?;
        Ok(Self { data_dir })
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", collection))
    }

    /// Load every record of a collection. A missing file is reported as
    /// `StoreError::Missing` so callers can decide to treat it as empty;
    /// a corrupt file is a hard `Parse` failure, never swallowed.
    pub fn load<T: DeserializeOwned>(&self, collection: &str) -> Result<Vec<T>, StoreError> {
        let path = self.collection_path(collection);
        if !path.exists() {
            return Err(StoreError::Missing(collection.to_string()));
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| StoreError::Io(format!("Failed to read {}: {}", path.display(), e)))?;

        serde_json::from_str(&content)
            .map_err(|e| StoreError::Parse(format!("Invalid JSON in {}: {}", path.display(), e)))
    }

    /// Like `load`, but an absent collection file is an empty collection.
    pub fn load_or_default<T: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<T>, StoreError> {
        match self.load(collection) {
            Err(StoreError::Missing(_)) => Ok(Vec::new()),
            other => other,
        }
    }

    /// Persist the full record set for a collection.
    ///
    /// Serializes to a temp file in the same directory, copies the current
    /// file to a `.bak` backup, then atomically renames the temp over the
    /// target. An interrupted save leaves either the original or the temp
    /// on disk, never neither.
    pub fn save<T: Serialize>(&self, collection: &str, records: &[T]) -> Result<(), StoreError> {
        let path = self.collection_path(collection);
        let tmp_path = path.with_extension("json.tmp");

        let content = serde_json::to_string_pretty(records).map_err(|e| {
            StoreError::Parse(format!("Failed to serialize {}: {}", collection, e))
        })?;

        fs::write(&tmp_path, content).map_err(|e| {
            StoreError::Io(format!("Failed to write {}: {}", tmp_path.display(), e))
        })?;

        if path.exists() {
            let backup_path = path.with_extension("json.bak");
            fs::copy(&path, &backup_path).map_err(|e| {
                StoreError::Io(format!("Failed to back up {}: {}", path.display(), e))
            })?;
        }

        fs::rename(&tmp_path, &path).map_err(|e| {
            StoreError::Io(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        debug!("Saved {} records to {}", records.len(), path.display());
        Ok(())
    }

    #[cfg(test)]
    pub fn path_for(&self, collection: &str) -> PathBuf {
        self.collection_path(collection)
    }
}

/// Plain (non-collection) text output, used by the board export.
pub fn write_text_file(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StoreError::Io(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }
    fs::write(path, content)
        .map_err(|e| StoreError::Io(format!("Failed to write {}: {}", path.display(), e)))
}
