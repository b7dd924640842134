//! Archive of completed sessions
//!
//! Read side is shared by the session engine and the tabulation engine.
//! Parsing happens here, so a candidate id that fails validation makes its
//! whole entry unusable.

use tracing::{debug, warn};

use crate::session::types::{ArchiveScan, VotingSession};
use crate::storage::{put_json, schema, KeyValueStore, StoreResult};

/// Write a completed session to its voter-numbered slot
pub fn archive_session(store: &dyn KeyValueStore, session: &VotingSession) -> StoreResult<()> {
    put_json(store, &schema::keys::archive(session.voter_number), session)
}

/// Read every archive slot.
///
/// Entries that do not parse, or that parse but are not complete, are
/// skipped and counted rather than treated as errors. Sessions come back in
/// ascending voter-number order.
pub fn scan_archive(store: &dyn KeyValueStore) -> StoreResult<ArchiveScan> {
    let keys = store.list_keys(schema::ARCHIVE_PREFIX)?;
    let mut scan = ArchiveScan::default();

    for key in &keys {
        let Some(raw) = store.get(key)? else {
            continue;
        };

        match serde_json::from_str::<VotingSession>(&raw) {
            Ok(session) if session.has_voted => scan.sessions.push(session),
            Ok(session) => {
                debug!(
                    key = %key,
                    session = session.session_id.short(),
                    "Skipping incomplete archived session"
                );
                scan.skipped += 1;
            }
            Err(e) => {
                debug!(key = %key, error = %e, "Skipping malformed archived session");
                scan.skipped += 1;
            }
        }
    }

    scan.sessions.sort_by_key(|s| s.voter_number);

    if scan.skipped > 0 {
        warn!(
            skipped = scan.skipped,
            total = keys.len(),
            "Archive contains unusable entries"
        );
    }

    Ok(scan)
}
