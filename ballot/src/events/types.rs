//! Event types published by the ballot engines
//!
//! These are the signals a front end listens for: a session is ready to
//! render, a vote was recorded, a completed session was archived, results
//! were computed, or the election was reset.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::election::{CandidateId, WardNumber};
use crate::session::SessionId;

/// Events emitted by the session and tabulation engines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BallotEvent {
    /// A session was loaded or created and is ready for the ballot screen
    SessionReady {
        session_id: SessionId,
        voter_number: u64,
        current_ward: WardNumber,
        votes_cast: usize,
        created: bool,
        timestamp: DateTime<Utc>,
    },

    /// A vote was written to the active session
    VoteRecorded {
        session_id: SessionId,
        ward_number: WardNumber,
        candidate_id: CandidateId,
        /// True when this vote completed the ballot
        completed: bool,
        timestamp: DateTime<Utc>,
    },

    /// A completed session was copied into the archive
    SessionArchived {
        session_id: SessionId,
        voter_number: u64,
        timestamp: DateTime<Utc>,
    },

    /// Per-ward results were computed from the archive
    ResultsComputed {
        wards: usize,
        ballots_counted: usize,
        skipped_entries: usize,
        timestamp: DateTime<Utc>,
    },

    /// Every session, active and archived, was removed
    VotesCleared {
        archived_removed: usize,
        timestamp: DateTime<Utc>,
    },
}

impl BallotEvent {
    /// Short machine-readable name for the event
    pub fn event_type(&self) -> &'static str {
        match self {
            BallotEvent::SessionReady { .. } => "session_ready",
            BallotEvent::VoteRecorded { .. } => "vote_recorded",
            BallotEvent::SessionArchived { .. } => "session_archived",
            BallotEvent::ResultsComputed { .. } => "results_computed",
            BallotEvent::VotesCleared { .. } => "votes_cleared",
        }
    }

    /// When the event happened
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            BallotEvent::SessionReady { timestamp, .. }
            | BallotEvent::VoteRecorded { timestamp, .. }
            | BallotEvent::SessionArchived { timestamp, .. }
            | BallotEvent::ResultsComputed { timestamp, .. }
            | BallotEvent::VotesCleared { timestamp, .. } => *timestamp,
        }
    }

    /// Session the event concerns, if any
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            BallotEvent::SessionReady { session_id, .. }
            | BallotEvent::VoteRecorded { session_id, .. }
            | BallotEvent::SessionArchived { session_id, .. } => Some(session_id),
            _ => None,
        }
    }
}
