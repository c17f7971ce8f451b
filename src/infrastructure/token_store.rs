//! Durable key-value storage for the bearer credential.
//!
//! The login flow writes the token under [`TOKEN_KEY`]; the gateway reads it back
//! through [`AuthContext`](super::AuthContext) on every request. The store is a
//! plain string key-value map with get/set/remove, so a browser-style local
//! storage, a file, or an in-memory map can all stand behind it.

use crate::domain::error::{Result, TrackerError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

/// Key under which the bearer token is stored.
pub const TOKEN_KEY: &str = "token";

/// Abstraction over durable string key-value stores.
///
/// Implementations must be safe to share between the login flow and the
/// gateway. Reads must observe the latest successful write so that login and
/// logout take effect on the next request.
pub trait TokenStore: Send + Sync {
    /// Returns the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn remove(&self, key: &str) -> Result<()>;
}

/// In-memory token store, for tests and short-lived sessions.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `token` under [`TOKEN_KEY`].
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(TOKEN_KEY.to_string(), token.into());
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|_| TrackerError::Storage("token store lock poisoned".to_string()))
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}

/// JSON file token store.
///
/// Stores all keys in one small JSON object. Every read goes to disk so that a
/// token written by another process (or another handle) is picked up on the
/// next request. Writes use write-to-temp + rename so the file is never left
/// half-written.
///
/// # File Format
///
/// ```json
/// {
///   "token": "eyJhbGciOi..."
/// }
/// ```
#[derive(Debug)]
pub struct FileTokenStore {
    /// Path to the JSON file on disk.
    file_path: PathBuf,

    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    /// Opens a file-backed store, creating parent directories as needed.
    ///
    /// The file itself is created lazily on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if parent directory creation fails.
    pub fn new(file_path: PathBuf) -> Result<Self> {
        tracing::debug!(path = ?file_path, "initializing file token store");

        if let Some(parent) = file_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            file_path,
            write_lock: Mutex::new(()),
        })
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.file_path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .map_err(|e| TrackerError::Storage(format!("failed to parse token file: {e}")))
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)
            .map_err(|e| TrackerError::Storage(format!("failed to serialize token file: {e}")))?;

        let tmp_path = self.file_path.with_extension("tmp");
        std::fs::write(&tmp_path, json)?;
        std::fs::rename(&tmp_path, &self.file_path)?;

        tracing::trace!(path = ?self.file_path, keys = entries.len(), "token file saved");
        Ok(())
    }

    fn modify(&self, apply: impl FnOnce(&mut BTreeMap<String, String>)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| TrackerError::Storage("token store lock poisoned".to_string()))?;
        let mut entries = self.load()?;
        apply(&mut entries);
        self.save(&entries)
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.modify(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.modify(|entries| {
            entries.remove(key);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        store.remove(TOKEN_KEY).unwrap();
        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
    }

    #[test]
    fn file_store_is_visible_to_a_second_handle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("credentials.json");

        let writer = FileTokenStore::new(path.clone()).unwrap();
        let reader = FileTokenStore::new(path.clone()).unwrap();
        assert_eq!(reader.get(TOKEN_KEY).unwrap(), None);

        writer.set(TOKEN_KEY, "first").unwrap();
        writer.set("other", "kept").unwrap();
        assert_eq!(reader.get(TOKEN_KEY).unwrap().as_deref(), Some("first"));

        writer.remove(TOKEN_KEY).unwrap();
        assert_eq!(reader.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(reader.get("other").unwrap().as_deref(), Some("kept"));
        assert!(!path.with_extension("tmp").exists());
    }

    #[test]
    fn corrupt_file_is_a_storage_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        std::fs::write(&path, "not json").unwrap();

        let store = FileTokenStore::new(path).unwrap();
        assert!(matches!(store.get(TOKEN_KEY), Err(TrackerError::Storage(_))));
    }
}
