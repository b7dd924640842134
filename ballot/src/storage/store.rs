//! Key-value stores backing sessions, the archive and the configuration
//!
//! Values are JSON strings. The engines only ever talk to the
//! [`KeyValueStore`] trait, so tests can hand them a [`MemoryStore`] while the
//! console uses a [`FileStore`] rooted in its data directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Lock poisoned")]
    LockPoisoned,

    #[cfg(feature = "rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Shared reference to a store
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Minimal key-value interface the engines depend on
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`
    fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> StoreResult<()>;

    /// List every key starting with `prefix`, sorted ascending
    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>>;
}

// =========================================================================
// JSON helpers
// =========================================================================

/// Serialize `value` as JSON and store it under `key`
pub fn put_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> StoreResult<()> {
    let json = serde_json::to_string(value).map_err(|e| StoreError::Serialization(e.to_string()))?;
    store.set(key, &json)
}

/// Load and parse the JSON value under `key`.
///
/// A value that does not parse is treated as absent: the caller gets `None`
/// and a warning is logged. Only storage failures are returned as errors.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> StoreResult<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            warn!(key, error = %e, "Ignoring malformed record");
            Ok(None)
        }
    }
}

// =========================================================================
// In-memory store
// =========================================================================

/// In-process store, used as the test double and for throwaway elections
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a shared reference to this store
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// Whether the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries
            .range(prefix.to_string()..)
            .map(|(k, _)| k)
            .take_while(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

// =========================================================================
// File-backed store
// =========================================================================

/// Directory-backed store: one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

/// File extension used for every stored value
const FILE_EXTENSION: &str = "json";

impl FileStore {
    /// Open (creating if needed) a store rooted at `root`
    pub fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        debug!(path = %root.display(), "Opened file store");
        Ok(Self { root })
    }

    /// Create a shared reference to this store
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    /// Get the store's root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> StoreResult<PathBuf> {
        if !is_file_safe_key(key) {
            return Err(StoreError::InvalidKey(key.to_string()));
        }
        // ':' is not portable in file names
        let file_name = format!("{}.{}", key.replace(':', "@"), FILE_EXTENSION);
        Ok(self.root.join(file_name))
    }
}

/// Keys may only use ASCII alphanumerics, '_', '-' and ':'
fn is_file_safe_key(key: &str) -> bool {
    !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'))
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        std::fs::write(path, value)?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        let path = self.path_for(key)?;
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in std::fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some(FILE_EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let key = stem.replace('@', ":");
            if key.starts_with(prefix) {
                keys.push(key);
            }
        }
        keys.sort();
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::tempdir;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Record {
        n: u32,
    }

    fn exercise(store: &dyn KeyValueStore) {
        store.set("archive:00000002", "b").unwrap();
        store.set("archive:00000001", "a").unwrap();
        store.set("voting_session", "s").unwrap();

        assert_eq!(store.get("voting_session").unwrap().as_deref(), Some("s"));
        assert_eq!(store.get("missing").unwrap(), None);
        assert_eq!(
            store.list_keys("archive:").unwrap(),
            vec!["archive:00000001", "archive:00000002"]
        );

        store.delete("archive:00000001").unwrap();
        store.delete("archive:00000001").unwrap();
        assert_eq!(store.list_keys("archive:").unwrap(), vec!["archive:00000002"]);
    }

    #[test]
    fn test_memory_store_crud() {
        exercise(&MemoryStore::new());
    }

    #[test]
    fn test_file_store_crud() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path().join("data")).unwrap();
        exercise(&store);
    }

    #[test]
    fn test_file_store_rejects_unsafe_keys() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.set("../escape", "x"),
            Err(StoreError::InvalidKey(_))
        ));
    }

    #[test]
    fn test_json_helpers_treat_garbage_as_absent() {
        let store = MemoryStore::new();
        put_json(&store, "rec", &Record { n: 7 }).unwrap();
        assert_eq!(get_json::<Record>(&store, "rec").unwrap(), Some(Record { n: 7 }));

        store.set("rec", "{not json").unwrap();
        assert_eq!(get_json::<Record>(&store, "rec").unwrap(), None);
    }
}
