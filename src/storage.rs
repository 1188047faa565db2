//! Durable key-value storage.
//!
//! The storefront keeps carts and session state in a string-keyed store,
//! the client-side analog of a browser's local storage. Everything above
//! this module goes through [`KeyValueStore`] so tests can swap in an
//! in-memory store.

use std::{
    fs, io,
    path::PathBuf,
    sync::{Mutex, PoisonError},
};

use mockall::automock;
use rustc_hash::FxHashMap;
use thiserror::Error;
use tracing::warn;

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage io error")]
    Io(#[from] io::Error),

    #[error("storage encoding error")]
    Encode(#[from] serde_json::Error),
}

/// String-keyed durable storage.
#[automock]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value stored under `key`. Deleting an absent key is not
    /// an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Volatile in-memory store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cells: Mutex<FxHashMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(cells.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.insert(key.to_string(), value.to_string());

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.remove(key);

        Ok(())
    }
}

/// Store backed by a single JSON file holding the whole key space.
///
/// Writes replace the file with the full current map, mirroring how a
/// browser flushes local storage.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cells: Mutex<FxHashMap<String, String>>,
}

impl JsonFileStore {
    /// Open the store at `path`, starting empty when the file does not
    /// exist yet. A file that no longer parses is discarded rather than
    /// surfaced; its replacement is written on the next mutation.
    ///
    /// # Errors
    ///
    /// Returns an error when the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let path = path.into();

        let cells = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                warn!(path = %path.display(), "discarding unreadable storage file: {error}");
                FxHashMap::default()
            }),
            Err(error) if error.kind() == io::ErrorKind::NotFound => FxHashMap::default(),
            Err(error) => return Err(error.into()),
        };

        Ok(Self {
            path,
            cells: Mutex::new(cells),
        })
    }

    fn flush(&self, cells: &FxHashMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string(cells)?;
        fs::write(&self.path, raw)?;

        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);

        Ok(cells.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.insert(key.to_string(), value.to_string());

        self.flush(&cells)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut cells = self.cells.lock().unwrap_or_else(PoisonError::into_inner);
        cells.remove(key);

        self.flush(&cells)
    }
}
