//! Session engine
//!
//! Owns the lifecycle of the active voter's ballot: creation, per-ward vote
//! recording, completion detection and archiving. The active session lives
//! in a single slot that the front end reads and writes on every step;
//! completed sessions are copied into voter-numbered archive slots, which
//! are the only input to tabulation.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::election::{CandidateId, WardNumber};
use crate::events::{BallotEvent, SharedEventBus};
use crate::session::archive;
use crate::session::error::{SessionError, SessionResult};
use crate::session::fingerprint::DeviceProfile;
use crate::session::types::{ArchiveScan, VotingSession};
use crate::storage::{get_json, put_json, schema, SharedStore};

/// Manages the active session and the archive of completed sessions
pub struct SessionEngine {
    store: SharedStore,
    event_bus: Option<SharedEventBus>,
    device_fingerprint: String,
}

impl SessionEngine {
    /// Create an engine over `store`, fingerprinting the current host
    pub fn new(store: SharedStore) -> Self {
        Self {
            store,
            event_bus: None,
            device_fingerprint: DeviceProfile::from_host().fingerprint(),
        }
    }

    /// Publish engine events on `bus`
    pub fn with_event_bus(mut self, bus: SharedEventBus) -> Self {
        self.event_bus = Some(bus);
        self
    }

    /// Use a fingerprint derived from `profile` for new sessions
    pub fn with_device(mut self, profile: &DeviceProfile) -> Self {
        self.device_fingerprint = profile.fingerprint();
        self
    }

    /// The store this engine writes to
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    fn publish(&self, event: BallotEvent) {
        if let Some(bus) = &self.event_bus {
            bus.publish(event);
        }
    }

    // =========================================================================
    // Active session
    // =========================================================================

    /// Read the active session without creating one
    pub fn active_session(&self) -> SessionResult<Option<VotingSession>> {
        Ok(get_json(self.store.as_ref(), schema::ACTIVE_SESSION)?)
    }

    /// Return the active session, creating and persisting a new one if the
    /// slot is empty or holds a record that does not parse.
    pub fn get_or_create_session(&self) -> SessionResult<VotingSession> {
        let (session, created) = match self.active_session()? {
            Some(session) => (session, false),
            None => {
                let voter_number = self.next_voter_number()?;
                let session = VotingSession::new(voter_number, self.device_fingerprint.clone());
                self.save_active(&session)?;
                info!(
                    session = session.session_id.short(),
                    voter_number, "Created voting session"
                );
                (session, true)
            }
        };

        self.publish(BallotEvent::SessionReady {
            session_id: session.session_id.clone(),
            voter_number: session.voter_number,
            current_ward: session.current_ward,
            votes_cast: session.votes_cast(),
            created,
            timestamp: Utc::now(),
        });

        Ok(session)
    }

    /// Record the voter's choice for `ward` and persist the result.
    ///
    /// Rejects votes on a completed session, wards outside
    /// `1..=total_wards`, wards that already have a vote, and candidates
    /// from another ward. When the vote fills the last empty ward the
    /// session is marked complete and archived under its voter number.
    pub fn record_vote(
        &self,
        session: &VotingSession,
        ward: WardNumber,
        candidate: CandidateId,
        total_wards: WardNumber,
    ) -> SessionResult<VotingSession> {
        if session.has_voted {
            warn!(
                session = session.session_id.short(),
                ward, "Rejected vote on completed session"
            );
            return Err(SessionError::AlreadyVoted {
                session_id: session.session_id.clone(),
            });
        }
        if ward == 0 || ward > total_wards {
            return Err(SessionError::WardOutOfRange { ward, total_wards });
        }
        if session.votes.contains_key(&ward) {
            return Err(SessionError::WardAlreadyVoted { ward });
        }
        if candidate.ward() != ward {
            return Err(SessionError::CandidateWardMismatch { candidate, ward });
        }

        let mut updated = session.clone();
        updated.votes.insert(ward, candidate.clone());
        // Voting the last ward leaves the pointer where it was, so it never
        // passes total_wards
        if ward < total_wards {
            updated.current_ward = ward + 1;
        }

        let completed = updated.votes.len() == total_wards as usize;
        if completed {
            updated.has_voted = true;
            updated.completed_at = Some(Utc::now());
        }

        // A completed session in the active slot is always already archived
        if completed {
            self.archive_completed(&mut updated)?;
        }
        self.save_active(&updated)?;
        debug!(
            session = updated.session_id.short(),
            ward,
            candidate = %candidate,
            "Vote recorded"
        );

        self.publish(BallotEvent::VoteRecorded {
            session_id: updated.session_id.clone(),
            ward_number: ward,
            candidate_id: candidate,
            completed,
            timestamp: Utc::now(),
        });
        if completed {
            self.publish(BallotEvent::SessionArchived {
                session_id: updated.session_id.clone(),
                voter_number: updated.voter_number,
                timestamp: Utc::now(),
            });
        }

        Ok(updated)
    }

    /// Whether `session` has completed its ballot
    pub fn has_already_voted(session: &VotingSession) -> bool {
        session.has_already_voted()
    }

    /// Remove the active session so the next voter can begin.
    ///
    /// Archived sessions are untouched.
    pub fn clear_active_session(&self) -> SessionResult<()> {
        self.store.delete(schema::ACTIVE_SESSION)?;
        debug!("Active session cleared");
        Ok(())
    }

    /// Hand the device to the next voter: clear the active slot and start a
    /// new session.
    pub fn reset_for_next_voter(&self) -> SessionResult<VotingSession> {
        self.clear_active_session()?;
        self.get_or_create_session()
    }

    fn save_active(&self, session: &VotingSession) -> SessionResult<()> {
        put_json(self.store.as_ref(), schema::ACTIVE_SESSION, session)?;
        Ok(())
    }

    // =========================================================================
    // Archive
    // =========================================================================

    /// Archive `session`, moving it to the next free slot when its own slot is
    /// taken or would leave a gap. Either happens when the archive changed
    /// after the session was created, e.g. a reset while a voter was
    /// mid-ballot.
    fn archive_completed(&self, session: &mut VotingSession) -> SessionResult<()> {
        let next = self.next_voter_number()?;
        let slot = schema::keys::archive(session.voter_number);
        if session.voter_number > next || self.store.get(&slot)?.is_some() {
            warn!(
                session = session.session_id.short(),
                from = session.voter_number,
                to = next,
                "Archive slot unavailable, renumbering voter"
            );
            session.voter_number = next;
        }

        archive::archive_session(self.store.as_ref(), session)?;
        info!(
            session = session.session_id.short(),
            voter_number = session.voter_number,
            "Session complete, archived"
        );
        Ok(())
    }

    /// Number of archive slots currently in use
    pub fn archived_count(&self) -> SessionResult<usize> {
        Ok(self.store.list_keys(schema::ARCHIVE_PREFIX)?.len())
    }

    /// Voter number for the next new session: one past the highest archive
    /// slot in use
    pub fn next_voter_number(&self) -> SessionResult<u64> {
        let highest = self
            .store
            .list_keys(schema::ARCHIVE_PREFIX)?
            .iter()
            .filter_map(|key| schema::keys::parse_archive_voter(key))
            .max()
            .unwrap_or(0);
        Ok(highest + 1)
    }

    /// Read every archive slot, skipping and counting unusable entries
    pub fn scan_archive(&self) -> SessionResult<ArchiveScan> {
        Ok(archive::scan_archive(self.store.as_ref())?)
    }

    /// Completed sessions in ascending voter-number order
    pub fn list_archived_sessions(&self) -> SessionResult<Vec<VotingSession>> {
        Ok(self.scan_archive()?.sessions)
    }

    /// Reset the election to zero votes: remove the active session and every
    /// archived session. Returns the number of archive slots removed.
    pub fn clear_all_votes(&self) -> SessionResult<usize> {
        self.store.delete(schema::ACTIVE_SESSION)?;

        let keys = self.store.list_keys(schema::ARCHIVE_PREFIX)?;
        for key in &keys {
            self.store.delete(key)?;
        }

        info!(archived_removed = keys.len(), "All votes cleared");
        self.publish(BallotEvent::VotesCleared {
            archived_removed: keys.len(),
            timestamp: Utc::now(),
        });

        Ok(keys.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{drain, EventBus};
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    fn engine() -> SessionEngine {
        SessionEngine::new(MemoryStore::new().shared())
    }

    fn id(s: &str) -> CandidateId {
        s.parse().unwrap()
    }

    /// Vote for party `PA` in every ward of a `total` ward ballot
    fn complete_ballot(engine: &SessionEngine, total: WardNumber) -> VotingSession {
        let mut session = engine.get_or_create_session().unwrap();
        for ward in 1..=total {
            session = engine
                .record_vote(&session, ward, id(&format!("W{ward}_PA")), total)
                .unwrap();
        }
        session
    }

    #[test]
    fn test_get_or_create_on_empty_store() {
        let engine = engine();
        let session = engine.get_or_create_session().unwrap();

        assert_eq!(session.current_ward, 1);
        assert!(session.votes.is_empty());
        assert!(!session.has_voted);
        assert_eq!(session.voter_number, 1);
    }

    #[test]
    fn test_get_or_create_returns_persisted_session() {
        let engine = engine();
        let first = engine.get_or_create_session().unwrap();
        let second = engine.get_or_create_session().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_active_session_is_replaced() {
        let engine = engine();
        engine.store().set(schema::ACTIVE_SESSION, "{\"broken\"").unwrap();

        let session = engine.get_or_create_session().unwrap();
        assert_eq!(session.current_ward, 1);
        assert_eq!(engine.active_session().unwrap(), Some(session));
    }

    #[test]
    fn test_votes_advance_ward_and_complete() {
        let engine = engine();
        let session = engine.get_or_create_session().unwrap();

        let s1 = engine.record_vote(&session, 1, id("W1_PA"), 3).unwrap();
        assert_eq!(s1.current_ward, 2);
        assert!(!s1.has_voted);

        let s2 = engine.record_vote(&s1, 2, id("W2_PB"), 3).unwrap();
        assert_eq!(s2.current_ward, 3);
        assert!(!s2.has_voted);
        assert!(s2.completed_at.is_none());

        let s3 = engine.record_vote(&s2, 3, id("W3_PA"), 3).unwrap();
        assert_eq!(s3.current_ward, 3);
        assert!(s3.has_voted);
        assert!(s3.completed_at.is_some());
        assert_eq!(s3.votes.len(), 3);

        // Active slot holds the completed session
        assert_eq!(engine.active_session().unwrap(), Some(s3.clone()));
        assert_eq!(engine.list_archived_sessions().unwrap(), vec![s3]);
    }

    #[test]
    fn test_out_of_order_votes_complete_when_all_wards_filled() {
        let engine = engine();
        let session = engine.get_or_create_session().unwrap();

        let s = engine.record_vote(&session, 2, id("W2_PA"), 2).unwrap();
        assert_eq!(s.current_ward, 1);
        assert!(!s.has_voted);

        let s = engine.record_vote(&s, 1, id("W1_PB"), 2).unwrap();
        assert_eq!(s.current_ward, 2);
        assert!(s.has_voted);
    }

    #[test]
    fn test_completed_session_rejects_votes() {
        let engine = engine();
        let done = complete_ballot(&engine, 2);

        let err = engine.record_vote(&done, 1, id("W1_PB"), 2).unwrap_err();
        assert!(matches!(err, SessionError::AlreadyVoted { .. }));
        assert!(err.is_rejection());
        assert!(SessionEngine::has_already_voted(&done));
    }

    #[test]
    fn test_invalid_votes_are_rejected() {
        let engine = engine();
        let session = engine.get_or_create_session().unwrap();

        assert!(matches!(
            engine.record_vote(&session, 0, id("W1_PA"), 2),
            Err(SessionError::WardOutOfRange { ward: 0, .. })
        ));
        assert!(matches!(
            engine.record_vote(&session, 3, id("W3_PA"), 2),
            Err(SessionError::WardOutOfRange { ward: 3, .. })
        ));
        assert!(matches!(
            engine.record_vote(&session, 1, id("W2_PA"), 2),
            Err(SessionError::CandidateWardMismatch { .. })
        ));

        let voted = engine.record_vote(&session, 1, id("W1_PA"), 2).unwrap();
        assert!(matches!(
            engine.record_vote(&voted, 1, id("W1_PB"), 2),
            Err(SessionError::WardAlreadyVoted { ward: 1 })
        ));
        assert!(voted.votes.len() <= 2);
    }

    #[test]
    fn test_voter_numbers_follow_archive() {
        let engine = engine();

        for expected in 1..=3 {
            let done = complete_ballot(&engine, 2);
            assert_eq!(done.voter_number, expected);
            engine.clear_active_session().unwrap();
        }

        let numbers: Vec<u64> = engine
            .list_archived_sessions()
            .unwrap()
            .iter()
            .map(|s| s.voter_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_clear_active_keeps_archive() {
        let engine = engine();
        complete_ballot(&engine, 1);
        engine.clear_active_session().unwrap();

        assert!(engine.active_session().unwrap().is_none());
        assert_eq!(engine.archived_count().unwrap(), 1);

        let next = engine.get_or_create_session().unwrap();
        assert_eq!(next.voter_number, 2);
    }

    #[test]
    fn test_clear_all_votes() {
        let engine = engine();
        complete_ballot(&engine, 1);
        engine.clear_active_session().unwrap();
        complete_ballot(&engine, 1);

        assert_eq!(engine.clear_all_votes().unwrap(), 2);
        assert!(engine.active_session().unwrap().is_none());
        assert!(engine.list_archived_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_stale_session_after_reset_does_not_overwrite() {
        let engine = engine();
        complete_ballot(&engine, 1);
        engine.clear_active_session().unwrap();

        // Voter 2 is mid-ballot when an admin resets the election
        let stale = engine.get_or_create_session().unwrap();
        assert_eq!(stale.voter_number, 2);
        engine.clear_all_votes().unwrap();

        let done = engine.record_vote(&stale, 1, id("W1_PB"), 1).unwrap();
        assert_eq!(done.voter_number, 1);
        engine.clear_active_session().unwrap();

        let next = complete_ballot(&engine, 1);
        assert_eq!(next.voter_number, 2);

        let archived = engine.list_archived_sessions().unwrap();
        let numbers: Vec<u64> = archived.iter().map(|s| s.voter_number).collect();
        assert_eq!(numbers, vec![1, 2]);
        assert_eq!(archived[0].votes[&1], id("W1_PB"));
    }

    #[test]
    fn test_taken_slot_moves_ballot_to_next_free_number() {
        let engine = engine();
        let held = engine.get_or_create_session().unwrap();
        assert_eq!(held.voter_number, 1);

        // Another ballot lands in slot 1 first
        engine.clear_active_session().unwrap();
        complete_ballot(&engine, 1);

        let done = engine.record_vote(&held, 1, id("W1_PC"), 1).unwrap();
        assert_eq!(done.voter_number, 2);
        assert_eq!(engine.archived_count().unwrap(), 2);
        assert_eq!(engine.active_session().unwrap(), Some(done));
    }

    #[test]
    fn test_next_voter_number_skips_past_gaps() {
        let engine = engine();
        for _ in 0..3 {
            complete_ballot(&engine, 1);
            engine.clear_active_session().unwrap();
        }
        engine.store().delete(&schema::keys::archive(2)).unwrap();

        assert_eq!(engine.archived_count().unwrap(), 2);
        assert_eq!(engine.next_voter_number().unwrap(), 4);
        assert_eq!(complete_ballot(&engine, 1).voter_number, 4);
    }

    #[test]
    fn test_scan_archive_skips_and_counts_bad_entries() {
        let engine = engine();
        complete_ballot(&engine, 1);

        let store = engine.store();
        store.set(&schema::keys::archive(7), "not json").unwrap();
        store
            .set(
                &schema::keys::archive(8),
                r#"{"sessionId":"s","voterNumber":8,"currentWard":1,"votes":{"1":"bogus"},"hasVoted":true,"deviceFingerprint":"fp","createdAt":"2024-01-01T00:00:00Z"}"#,
            )
            .unwrap();

        let mut incomplete = VotingSession::new(9, "fp");
        incomplete.session_id = "incomplete".to_string().into();
        put_json(store.as_ref(), &schema::keys::archive(9), &incomplete).unwrap();

        let scan = engine.scan_archive().unwrap();
        assert_eq!(scan.sessions.len(), 1);
        assert_eq!(scan.skipped, 3);
    }

    #[test]
    fn test_events_follow_ballot_lifecycle() {
        let bus = EventBus::new().shared();
        let mut rx = bus.subscribe();
        let engine =
            SessionEngine::new(MemoryStore::new().shared()).with_event_bus(Arc::clone(&bus));

        complete_ballot(&engine, 2);
        engine.clear_all_votes().unwrap();

        let types: Vec<&str> = drain(&mut rx).iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec![
                "session_ready",
                "vote_recorded",
                "vote_recorded",
                "session_archived",
                "votes_cleared"
            ]
        );
    }
}
