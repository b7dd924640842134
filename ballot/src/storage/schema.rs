//! Key layout for the ballot key-value store
//!
//! All records live in one flat namespace. The active session and the
//! election configuration each own a single slot; completed sessions are
//! archived one slot per voter number under a common prefix.

/// Slot holding the in-progress voter's session
pub const ACTIVE_SESSION: &str = "voting_session";

/// Slot holding the election configuration
pub const ELECTION_CONFIG: &str = "election_config";

/// Prefix shared by all archived session slots
pub const ARCHIVE_PREFIX: &str = "archive:";

/// Key builders for compound keys
pub mod keys {
    use super::ARCHIVE_PREFIX;

    /// Create an archive key for a voter number.
    ///
    /// Voter numbers are zero-padded so that lexicographic key order matches
    /// numeric order.
    pub fn archive(voter_number: u64) -> String {
        format!("{}{:08}", ARCHIVE_PREFIX, voter_number)
    }

    /// Parse the voter number back out of an archive key
    pub fn parse_archive_voter(key: &str) -> Option<u64> {
        key.strip_prefix(ARCHIVE_PREFIX)?.parse().ok()
    }
}
