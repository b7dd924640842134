//! Voting session record
//!
//! One voter's ballot: which ward they are on, which candidate they chose in
//! each ward so far, and whether the ballot is complete.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::election::{CandidateId, WardNumber};

/// Opaque session identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Generate a fresh identifier: `session_{unix_millis}_{9 hex chars}`
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let random = uuid::Uuid::new_v4().simple().to_string();
        Self(format!("session_{}_{}", millis, &random[..9]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First 8 characters after the `session_` prefix, for log lines
    pub fn short(&self) -> &str {
        let id = self.0.strip_prefix("session_").unwrap_or(&self.0);
        match id.char_indices().nth(8) {
            Some((end, _)) => &id[..end],
            None => id,
        }
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single voter's ballot session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VotingSession {
    pub session_id: SessionId,

    /// Position of this voter in the archive, 1-based
    pub voter_number: u64,

    /// Ward the voter is expected to vote in next, 1-based
    pub current_ward: WardNumber,

    /// Ward number to chosen candidate
    pub votes: BTreeMap<WardNumber, CandidateId>,

    /// True once every ward has a vote
    pub has_voted: bool,

    pub device_fingerprint: String,

    pub created_at: DateTime<Utc>,

    /// Set exactly when `has_voted` becomes true
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl VotingSession {
    /// Start a fresh ballot at ward 1
    pub fn new(voter_number: u64, device_fingerprint: impl Into<String>) -> Self {
        Self {
            session_id: SessionId::generate(),
            voter_number,
            current_ward: 1,
            votes: BTreeMap::new(),
            has_voted: false,
            device_fingerprint: device_fingerprint.into(),
            created_at: Utc::now(),
            completed_at: None,
        }
    }

    /// Whether the ballot is complete and must not accept more votes
    pub fn has_already_voted(&self) -> bool {
        self.has_voted
    }

    /// Number of wards voted so far
    pub fn votes_cast(&self) -> usize {
        self.votes.len()
    }

    /// Candidate chosen in `ward`, if any
    pub fn vote_for(&self, ward: WardNumber) -> Option<&CandidateId> {
        self.votes.get(&ward)
    }

    /// Progress through a ballot of `total_wards`
    pub fn progress(&self, total_wards: WardNumber) -> SessionProgress {
        let cast = self.votes.len();
        SessionProgress {
            cast,
            remaining: (total_wards as usize).saturating_sub(cast),
            total: total_wards as usize,
        }
    }
}

/// Votes cast versus wards remaining
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionProgress {
    pub cast: usize,
    pub remaining: usize,
    pub total: usize,
}

impl SessionProgress {
    /// Completion as a percentage, 0.0 when there are no wards
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.cast as f64 / self.total as f64 * 100.0
        }
    }
}

/// Archived sessions plus the number of archive entries that were unusable
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchiveScan {
    /// Completed sessions, ascending by voter number
    pub sessions: Vec<VotingSession>,
    /// Entries that failed to parse or were not complete
    pub skipped: usize,
}
