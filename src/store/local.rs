//! Durable key-value store backed by JSON files
//!
//! Provides a `LocalStore` that keeps one serializable value per key on
//! disk. Writes go to a temporary file that is renamed over the target, so a
//! failed write never corrupts what was stored before.

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when reading or writing persisted data
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem access failed
    #[error("Storage I/O failed: {0}")]
    Io(#[from] io::Error),

    /// The stored value could not be encoded or decoded
    #[error("Stored data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Reads and writes JSON values under a data directory
///
/// Each key maps to `<dir>/<key>.json`. The default location is the
/// XDG-compliant data directory (`~/.local/share/storecat/` on Linux).
#[derive(Debug, Clone)]
pub struct LocalStore {
    /// Directory where value files are stored
    data_dir: PathBuf,
}

impl LocalStore {
    /// Creates a LocalStore using the XDG-compliant data directory
    ///
    /// Returns `None` if the directory cannot be determined (e.g., no home directory).
    pub fn new() -> Option<Self> {
        let project_dirs = ProjectDirs::from("", "", "storecat")?;
        let data_dir = project_dirs.data_dir().to_path_buf();
        Some(Self { data_dir })
    }

    /// Creates a LocalStore with a custom directory
    ///
    /// Useful for testing or when a specific location is needed.
    pub fn with_dir(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Returns the path to the file for the given key
    fn path(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{}.json", key))
    }

    /// Writes `value` under `key`, replacing any previous value atomically
    ///
    /// # Errors
    /// Returns `StorageError` if the directory cannot be created or the file
    /// cannot be written or renamed into place.
    pub fn write<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)?;

        let json = serde_json::to_string_pretty(value)?;
        let target = self.path(key);
        let staging = self.data_dir.join(format!("{}.json.tmp", key));

        fs::write(&staging, json)?;
        if let Err(e) = fs::rename(&staging, &target) {
            let _ = fs::remove_file(&staging);
            return Err(e.into());
        }
        Ok(())
    }

    /// Reads the value stored under `key`
    ///
    /// # Returns
    /// * `Ok(Some(value))` if the key exists and parses
    /// * `Ok(None)` if nothing is stored under the key
    /// * `Err` if the file is unreadable or does not parse
    pub fn read<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        let content = match fs::read_to_string(self.path(key)) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    /// Removes the value stored under `key`; absent keys are not an error
    pub fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}
