//! Session engine error types

use thiserror::Error;

use crate::election::{CandidateId, WardNumber};
use crate::session::SessionId;
use crate::storage::StoreError;

/// Result type alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

/// Errors that can occur while recording or managing sessions
#[derive(Error, Debug)]
pub enum SessionError {
    /// The session has already voted in every ward
    #[error("Session {session_id} has already voted")]
    AlreadyVoted { session_id: SessionId },

    /// Ward number outside 1..=total_wards
    #[error("Ward {ward} is outside 1..={total_wards}")]
    WardOutOfRange {
        ward: WardNumber,
        total_wards: WardNumber,
    },

    /// A vote already exists for this ward
    #[error("Ward {ward} already has a vote in this session")]
    WardAlreadyVoted { ward: WardNumber },

    /// The candidate stands in a different ward
    #[error("Candidate {candidate} does not stand in ward {ward}")]
    CandidateWardMismatch {
        candidate: CandidateId,
        ward: WardNumber,
    },

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl SessionError {
    /// Whether the error is a rejected ballot action rather than a storage fault
    pub fn is_rejection(&self) -> bool {
        !matches!(self, SessionError::Store(_))
    }
}
