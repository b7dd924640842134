//! Ballot engine for a simulated electronic voting machine
//!
//! This library provides:
//! - Election configuration: wards, ward label, party slate and derived candidates
//! - A session engine enforcing one vote per ward per voter on a single device
//! - An archive of completed ballots and a tabulation engine over it
//! - An event bus for front ends that react to session and tally changes
//!
//! # Modules
//!
//! ## Session flow
//! - [`session::SessionEngine::get_or_create_session`]: active session for the current voter
//! - [`session::SessionEngine::record_vote`]: one vote in one ward, archives on completion
//! - [`session::SessionEngine::clear_active_session`]: hand the device to the next voter
//! - [`session::SessionEngine::clear_all_votes`]: reset the election
//!
//! ## Tabulation
//! - [`tally::TabulationEngine::results`]: ranked per-ward tallies with winners
//! - [`tally::party_totals`]: votes per party across all wards
//!
//! ## Supporting
//! - [`storage`]: injected key-value store (memory, file, optional RocksDB)
//! - [`simulate`]: random complete ballots for test elections
//! - [`remote`]: client for a backend that keeps votes server-side
//!
//! # Usage
//!
//! ```
//! use ballot::election::default_config;
//! use ballot::session::SessionEngine;
//! use ballot::storage::MemoryStore;
//! use ballot::tally::TabulationEngine;
//!
//! let store = MemoryStore::new().shared();
//! let config = default_config().unwrap();
//! let engine = SessionEngine::new(store.clone());
//!
//! let mut session = engine.get_or_create_session().unwrap();
//! for ward in 1..=config.wards {
//!     let candidate = format!("W{ward}_PA").parse().unwrap();
//!     session = engine.record_vote(&session, ward, candidate, config.wards).unwrap();
//! }
//! assert!(session.has_voted);
//!
//! let results = TabulationEngine::new(store).results(&config).unwrap();
//! assert_eq!(results.ballots_counted, 1);
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod election;
pub mod events;
pub mod remote;
pub mod session;
pub mod simulate;
pub mod storage;
pub mod tally;

// Re-export key types
pub use election::{
    CandidateId, ConfigError, ConfigResult, ElectionConfig, ElectionPreset, PartyCode, WardNumber,
};
pub use events::{BallotEvent, EventBus, SharedEventBus};
pub use remote::{RemoteBallotClient, RemoteError, RemoteResult};
pub use session::{SessionEngine, SessionError, SessionId, SessionResult, VotingSession};
pub use simulate::simulate_voters;
pub use storage::{FileStore, KeyValueStore, MemoryStore, SharedStore, StoreError, StoreResult};
pub use tally::{ElectionResults, TabulationEngine, WardTally};
