//! Storage abstraction for ballot state
//!
//! The session engine, tabulation engine and configuration loader all read
//! and write through an injected [`KeyValueStore`]:
//!
//! - `voting_session`: the in-progress voter's session
//! - `archive:{voter_number}`: one completed session per voter
//! - `election_config`: the election configuration
//!
//! # Usage
//!
//! ```
//! use ballot::storage::{KeyValueStore, MemoryStore};
//!
//! let store = MemoryStore::new();
//! store.set("election_config", "{}").unwrap();
//! assert_eq!(store.list_keys("election").unwrap(), vec!["election_config"]);
//! ```

#[cfg(feature = "rocksdb")]
pub mod rocks;
pub mod schema;
pub mod store;

#[cfg(feature = "rocksdb")]
pub use rocks::RocksStore;
pub use store::{
    get_json, put_json, FileStore, KeyValueStore, MemoryStore, SharedStore, StoreError,
    StoreResult,
};
