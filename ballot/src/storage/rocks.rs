//! RocksDB-backed store
//!
//! Single default column family; values are the same JSON strings the other
//! stores hold, so a data set can move between backends unchanged.

use std::path::PathBuf;
use std::sync::Arc;

use rocksdb::{Options, DB};

use super::store::{KeyValueStore, SharedStore, StoreError, StoreResult};

/// RocksDB-backed persistent store
pub struct RocksStore {
    db: DB,
    path: PathBuf,
}

impl RocksStore {
    /// Open or create a store at the given path
    pub fn open(path: impl Into<PathBuf>) -> StoreResult<Self> {
        let path = path.into();

        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = DB::open(&opts, &path)?;
        Ok(Self { db, path })
    }

    /// Create a shared reference to this store
    pub fn shared(self) -> SharedStore {
        Arc::new(self)
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => String::from_utf8(bytes)
                .map(Some)
                .map_err(|e| StoreError::Serialization(e.to_string())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        self.db.put(key.as_bytes(), value.as_bytes())?;
        Ok(())
    }

    fn delete(&self, key: &str) -> StoreResult<()> {
        self.db.delete(key.as_bytes())?;
        Ok(())
    }

    fn list_keys(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let mut keys = Vec::new();

        for result in self.db.prefix_iterator(prefix.as_bytes()) {
            let (key, _) = result?;
            if let Ok(key_str) = String::from_utf8(key.to_vec()) {
                if key_str.starts_with(prefix) {
                    keys.push(key_str);
                } else {
                    break; // Prefix no longer matches
                }
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rocks_prefix_listing() {
        let dir = tempdir().unwrap();
        let store = RocksStore::open(dir.path().join("ballot.db")).unwrap();

        store.set("archive:00000001", "{}").unwrap();
        store.set("archive:00000002", "{}").unwrap();
        store.set("election_config", "{}").unwrap();

        assert_eq!(
            store.list_keys("archive:").unwrap(),
            vec!["archive:00000001", "archive:00000002"]
        );

        store.delete("archive:00000001").unwrap();
        assert_eq!(store.get("archive:00000001").unwrap(), None);
    }
}
