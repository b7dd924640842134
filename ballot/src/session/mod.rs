//! Voting session engine
//!
//! One active session per device. The engine enforces one vote per ward,
//! refuses votes once a ballot is complete, and archives completed ballots
//! for tabulation:
//!
//! ```text
//! get_or_create ──► current_ward = 1
//!      │
//!      ▼
//! record_vote(ward) ──► current_ward = ward + 1 (unchanged on the last ward)
//!      │
//!      └─ all wards voted ──► has_voted, completed_at, archive:{voter_number}
//! ```

pub mod archive;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod types;

pub use archive::scan_archive;
pub use engine::SessionEngine;
pub use error::{SessionError, SessionResult};
pub use fingerprint::DeviceProfile;
pub use types::{ArchiveScan, SessionId, SessionProgress, VotingSession};
