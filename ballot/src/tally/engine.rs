//! Tabulation engine
//!
//! Counts every archived ballot into per-ward, per-candidate totals, ranks
//! each ward and picks a winner. Only completed sessions in the archive are
//! counted; the in-progress active session never is.

use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info};

use crate::election::{candidate_name, CandidateId, ElectionConfig};
use crate::events::{BallotEvent, SharedEventBus};
use crate::session::{scan_archive, VotingSession};
use crate::storage::{SharedStore, StoreResult};

use super::types::{CandidateTally, ElectionResults, PartyTotal, WardTally};

/// Count archived ballots into ranked per-ward results.
///
/// A ward with no votes still lists every candidate (all at zero) but has no
/// winner. Ties keep the order of the configuration's party list.
pub fn compute_results(sessions: &[VotingSession], config: &ElectionConfig) -> ElectionResults {
    let mut counts: HashMap<&CandidateId, u64> = HashMap::new();
    for session in sessions {
        for candidate in session.votes.values() {
            *counts.entry(candidate).or_insert(0) += 1;
        }
    }

    let wards = (1..=config.wards)
        .map(|ward| {
            let mut candidates: Vec<CandidateTally> = config
                .party_codes
                .iter()
                .enumerate()
                .map(|(index, party)| {
                    let candidate_id = CandidateId::new(ward, party.clone());
                    CandidateTally {
                        votes: counts.get(&candidate_id).copied().unwrap_or(0),
                        candidate_name: candidate_name(index, ward),
                        party_code: party.clone(),
                        candidate_id,
                    }
                })
                .collect();

            // Stable: equal counts keep party-list order
            candidates.sort_by(|a, b| b.votes.cmp(&a.votes));

            let total_votes = candidates.iter().map(|c| c.votes).sum();
            let winner = candidates.first().filter(|c| c.votes > 0).cloned();

            WardTally {
                ward_number: ward,
                candidates,
                total_votes,
                winner,
            }
        })
        .collect();

    ElectionResults {
        wards,
        ballots_counted: sessions.len(),
        skipped_entries: 0,
        computed_at: Utc::now(),
    }
}

/// Votes per party summed over all wards, descending; ties keep party-list
/// order.
pub fn party_totals(results: &ElectionResults, config: &ElectionConfig) -> Vec<PartyTotal> {
    let mut totals: Vec<PartyTotal> = config
        .party_codes
        .iter()
        .map(|party| {
            let mut total = PartyTotal {
                party_code: party.clone(),
                votes: 0,
                wards_won: 0,
            };
            for ward in &results.wards {
                total.votes += ward
                    .candidates
                    .iter()
                    .filter(|c| &c.party_code == party)
                    .map(|c| c.votes)
                    .sum::<u64>();
                if ward.winner.as_ref().is_some_and(|w| &w.party_code == party) {
                    total.wards_won += 1;
                }
            }
            total
        })
        .collect();

    totals.sort_by(|a, b| b.votes.cmp(&a.votes));
    totals
}

/// Reads the archive and produces election results
pub struct TabulationEngine {
    store: SharedStore,
    event_bus: Option<SharedEventBus>,
}

impl TabulationEngine {
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            event_bus: None,
        }
    }

    /// Publish `ResultsComputed` on `bus`
    pub fn with_event_bus(mut self, bus: SharedEventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Tabulate every completed ballot in the archive against `config`
    pub fn results(&self, config: &ElectionConfig) -> StoreResult<ElectionResults> {
        let scan = scan_archive(self.store.as_ref())?;
        debug!(
            sessions = scan.sessions.len(),
            skipped = scan.skipped,
            "Archive scanned for tabulation"
        );

        let mut results = compute_results(&scan.sessions, config);
        results.skipped_entries = scan.skipped;

        info!(
            wards = results.wards.len(),
            ballots = results.ballots_counted,
            skipped = results.skipped_entries,
            total_votes = results.total_votes(),
            "Results computed"
        );

        if let Some(bus) = &self.event_bus {
            bus.publish(BallotEvent::ResultsComputed {
                wards: results.wards.len(),
                ballots_counted: results.ballots_counted,
                skipped_entries: results.skipped_entries,
                timestamp: results.computed_at,
            });
        }

        Ok(results)
    }
}
