//! Ballot simulation
//!
//! Drives the session engine exactly the way a sequence of real voters
//! would, picking a uniformly random candidate in every ward. Used to fill an
//! election with test data before looking at results.

use rand::Rng;
use tracing::info;

use crate::election::{CandidateId, ElectionConfig};
use crate::session::{SessionEngine, SessionResult, VotingSession};

/// Cast `count` complete random ballots through `engine`.
///
/// Any in-progress active session is discarded first; each simulated voter
/// then gets a fresh session that is completed and archived, so the archive
/// grows by exactly `count` entries. Returns the completed sessions.
pub fn simulate_voters<R: Rng>(
    engine: &SessionEngine,
    config: &ElectionConfig,
    count: usize,
    rng: &mut R,
) -> SessionResult<Vec<VotingSession>> {
    let mut completed = Vec::with_capacity(count);

    for _ in 0..count {
        let mut session = engine.reset_for_next_voter()?;
        for ward in 1..=config.wards {
            let party = &config.party_codes[rng.gen_range(0..config.party_codes.len())];
            session = engine.record_vote(
                &session,
                ward,
                CandidateId::new(ward, party.clone()),
                config.wards,
            )?;
        }
        completed.push(session);
    }

    // Leave the device ready for a real voter
    engine.clear_active_session()?;

    info!(
        voters = count,
        wards = config.wards,
        "Simulated ballots cast"
    );
    Ok(completed)
}
