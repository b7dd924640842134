//! Tally result types

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::election::{CandidateId, PartyCode, WardNumber};

/// Votes received by one candidate in one ward
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateTally {
    pub candidate_id: CandidateId,
    pub candidate_name: String,
    pub party_code: PartyCode,
    pub votes: u64,
}

/// Ranked results for one ward
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WardTally {
    pub ward_number: WardNumber,
    /// Descending by votes; ties keep party-list order
    pub candidates: Vec<CandidateTally>,
    pub total_votes: u64,
    /// Top candidate, only when it received at least one vote
    pub winner: Option<CandidateTally>,
}

impl WardTally {
    /// Share of the ward's votes, 0.0 when the ward has no votes
    pub fn percentage(&self, candidate: &CandidateTally) -> f64 {
        percentage(candidate.votes, self.total_votes)
    }

    /// Whether `candidate` is this ward's winner
    pub fn is_winner(&self, candidate: &CandidateTally) -> bool {
        self.winner
            .as_ref()
            .is_some_and(|w| w.candidate_id == candidate.candidate_id)
    }
}

/// Aggregate votes for a party across every ward
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PartyTotal {
    pub party_code: PartyCode,
    pub votes: u64,
    /// Wards where this party's candidate won
    pub wards_won: usize,
}

/// Results for the whole election
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionResults {
    /// One entry per ward, ascending by ward number
    pub wards: Vec<WardTally>,
    /// Completed ballots that contributed votes
    pub ballots_counted: usize,
    /// Archive entries that could not be used
    pub skipped_entries: usize,
    pub computed_at: DateTime<Utc>,
}

impl ElectionResults {
    /// Tally for `ward`, if it exists
    pub fn ward(&self, ward: WardNumber) -> Option<&WardTally> {
        self.wards.iter().find(|w| w.ward_number == ward)
    }

    /// Total votes across every ward
    pub fn total_votes(&self) -> u64 {
        self.wards.iter().map(|w| w.total_votes).sum()
    }
}

/// `part / total * 100`, defined as 0.0 when `total` is zero
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}
