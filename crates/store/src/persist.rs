//! Durable key-value storage backends for the state engine.
//!
//! A backend stores one serialized document per namespaced key. The engine
//! writes the persisted projection through [`StorageBackend::save`] after
//! every commit and reads it back once at startup via [`load_projection`].
//!
//! Durability is best-effort: a failed write is logged by the caller and the
//! in-memory session continues unaffected. A malformed stored document is
//! discarded in favor of seed defaults, never propagated as a startup error.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::warn;

/// Errors raised by storage backends.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying I/O failed (disk full, permissions, quota).
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization of the projection failed.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The backend was configured to fail (test-only mode).
    #[error("storage backend unavailable")]
    Unavailable,
}

/// A durable key-value store holding one document per key.
pub trait StorageBackend: Send + Sync {
    /// Read the document stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read at all; a missing key
    /// is `Ok(None)`.
    fn load(&self, key: &str) -> Result<Option<String>, PersistError>;

    /// Write `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails. Callers treat this as
    /// best-effort and must not roll back in-memory state.
    fn save(&self, key: &str, value: &str) -> Result<(), PersistError>;
}

/// File-backed storage: one JSON document per key under a data directory.
#[derive(Debug)]
pub struct JsonFileBackend {
    dir: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend rooted at `dir`. The directory is created on the
    /// first write, not here.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StorageBackend for JsonFileBackend {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(std::fs::read_to_string(path)?))
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(key);
        write_atomic(&path, value)
    }
}

/// Write via a temp file + rename so readers never observe a half-written
/// document.
fn write_atomic(path: &Path, value: &str) -> Result<(), PersistError> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, value)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

/// In-memory storage for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: Mutex<HashMap<String, String>>,
    fail_writes: bool,
}

impl MemoryBackend {
    /// Create an empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend whose writes always fail, for exercising the
    /// best-effort persistence path.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            fail_writes: true,
        }
    }

    /// Create a backend pre-populated with a single document.
    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(key.to_string(), value.to_string());
        Self {
            entries: Mutex::new(entries),
            fail_writes: false,
        }
    }

    /// Snapshot of the raw document stored under `key`, if any.
    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        lock_entries(&self.entries).get(key).cloned()
    }
}

fn lock_entries(
    entries: &Mutex<HashMap<String, String>>,
) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
    entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(lock_entries(&self.entries).get(key).cloned())
    }

    fn save(&self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.fail_writes {
            return Err(PersistError::Unavailable);
        }
        lock_entries(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Load and deserialize the projection stored under `key`.
///
/// Fail-safe: a missing key yields `None`; a malformed document is logged
/// and discarded so the caller falls back to seed defaults.
pub fn load_projection<P: DeserializeOwned>(backend: &dyn StorageBackend, key: &str) -> Option<P> {
    let raw = match backend.load(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Failed to read persisted state, using defaults");
            return None;
        }
    };
    match serde_json::from_str(&raw) {
        Ok(projection) => Some(projection),
        Err(e) => {
            warn!(key, error = %e, "Discarding malformed persisted state");
            None
        }
    }
}

/// Serialize `projection` and write it under `key`.
///
/// # Errors
///
/// Returns an error when serialization or the backend write fails.
pub fn save_projection<P: Serialize>(
    backend: &dyn StorageBackend,
    key: &str,
    projection: &P,
) -> Result<(), PersistError> {
    let raw = serde_json::to_string(projection)?;
    backend.save(key, &raw)
}
