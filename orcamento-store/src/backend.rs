//! Key-value storage backends.
//!
//! Stores persist JSON blobs under fixed string keys. The medium is an
//! injected [`KeyValueBackend`], so tests run against [`MemoryBackend`] and
//! the CLI runs against [`FileBackend`].

use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::persistence::{ensure_dir, save_text};

/// A blob store addressed by string keys.
pub trait KeyValueBackend: Send + Sync {
    /// Returns the value under `key`, or `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Returns true if a value was removed.
    fn remove(&self, key: &str) -> Result<bool, StoreError>;
}

// ============================================================================
// Typed Helpers
// ============================================================================

/// Reads and parses the JSON value under `key`.
///
/// A value that does not parse is reported as [`StoreError::CorruptRecord`].
pub fn read_json<T: DeserializeOwned>(
    backend: &dyn KeyValueBackend,
    key: &str,
) -> Result<Option<T>, StoreError> {
    let Some(raw) = backend.get(key)? else {
        return Ok(None);
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| {
            warn!(key = %key, error = %source, "Stored value does not parse");
            StoreError::CorruptRecord {
                key: key.to_string(),
                source,
            }
        })
}

/// Serializes `value` and stores it under `key`.
pub fn write_json<T: Serialize>(
    backend: &dyn KeyValueBackend,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    backend.set(key, &raw)
}

// ============================================================================
// Memory Backend
// ============================================================================

/// In-process backend.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-seeded with one raw value.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let backend = Self::new();
        backend.entries.write().insert(key.into(), value.into());
        backend
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl KeyValueBackend for MemoryBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.entries.write().remove(key).is_some())
    }
}

// ============================================================================
// File Backend
// ============================================================================

/// One `<key>.json` file per key under a directory.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Opens (and creates if needed) the backend directory.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        debug!(dir = %dir.display(), "Opened file backend");
        Ok(Self { dir })
    }

    /// The backing directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the file path for `key`.
    ///
    /// Keys are restricted to `[A-Za-z0-9_-]` so they cannot escape `dir`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

impl KeyValueBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        save_text(&path, value)
    }

    fn remove(&self, key: &str) -> Result<bool, StoreError> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_roundtrip() {
        let backend = MemoryBackend::new();
        assert!(backend.get("k").unwrap().is_none());

        backend.set("k", "v1").unwrap();
        backend.set("k", "v2").unwrap();
        assert_eq!(backend.get("k").unwrap().as_deref(), Some("v2"));
        assert_eq!(backend.len(), 1);

        assert!(backend.remove("k").unwrap());
        assert!(!backend.remove("k").unwrap());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_read_json_reports_corruption() {
        let backend = MemoryBackend::with_entry("k", "{not json");
        let err = read_json::<serde_json::Value>(&backend, "k").unwrap_err();
        assert!(matches!(err, StoreError::CorruptRecord { ref key, .. } if key == "k"));
    }

    #[test]
    fn test_file_backend_rejects_path_keys() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        for key in ["", "../escape", "a/b", "dot.ted"] {
            assert!(matches!(
                backend.get(key),
                Err(StoreError::InvalidKey(_))
            ));
        }
    }

    #[test]
    fn test_file_backend_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();
        assert!(backend.get("orcamento_quota").unwrap().is_none());
        assert!(!backend.remove("orcamento_quota").unwrap());
    }
}
