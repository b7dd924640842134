//! Election configuration: ward count, ward label and party slate
//!
//! A configuration is validated once when it is created. The session and
//! tabulation engines assume a configuration they receive is valid.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::candidate::{generate_candidates, Candidate, CandidateId, WardNumber};
use super::party::{self, InvalidPartyCode, PartyCode};
use crate::storage::{get_json, put_json, schema, KeyValueStore, StoreError};

/// Inclusive bounds on the number of wards
pub const MIN_WARDS: WardNumber = 1;
pub const MAX_WARDS: WardNumber = 50;

/// Inclusive bounds on the number of parties
pub const MIN_PARTIES: usize = 2;
pub const MAX_PARTIES: usize = 20;

/// Errors raised while building or persisting a configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Election name must not be empty")]
    EmptyName,

    #[error("Ward count {0} is outside 1..=50")]
    WardCount(WardNumber),

    #[error("Party count {0} is outside 2..=20")]
    PartyCount(usize),

    #[error("Party {0} appears more than once")]
    DuplicateParty(PartyCode),

    #[error("Party {0} is not in the party library")]
    UnknownParty(PartyCode),

    #[error(transparent)]
    InvalidPartyCode(#[from] InvalidPartyCode),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for configuration operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Election-wide setup, fixed before voting begins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionConfig {
    pub id: String,
    pub name: String,
    pub wards: WardNumber,
    /// "Ward", "Constituency", "Seat"; display only
    pub ward_label: String,
    pub party_codes: Vec<PartyCode>,
    /// Derived from `wards` and `party_codes`
    pub candidates: Vec<Candidate>,
    pub created_at: DateTime<Utc>,
}

impl ElectionConfig {
    /// Build and validate a configuration
    pub fn new(
        name: impl Into<String>,
        wards: WardNumber,
        ward_label: impl Into<String>,
        party_codes: Vec<PartyCode>,
    ) -> ConfigResult<Self> {
        let now = Utc::now();
        let mut config = Self {
            id: format!("election_{}", now.timestamp_millis()),
            name: name.into(),
            wards,
            ward_label: ward_label.into(),
            party_codes,
            candidates: Vec::new(),
            created_at: now,
        };

        config.validate()?;
        config.candidates = generate_candidates(config.wards, &config.party_codes);
        Ok(config)
    }

    /// Build a configuration from raw party code strings
    pub fn from_codes<S: AsRef<str>>(
        name: impl Into<String>,
        wards: WardNumber,
        ward_label: impl Into<String>,
        codes: &[S],
    ) -> ConfigResult<Self> {
        let party_codes = codes
            .iter()
            .map(|c| PartyCode::new(c.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(name, wards, ward_label, party_codes)
    }

    /// Check the configuration against the election rules
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if !(MIN_WARDS..=MAX_WARDS).contains(&self.wards) {
            return Err(ConfigError::WardCount(self.wards));
        }
        if !(MIN_PARTIES..=MAX_PARTIES).contains(&self.party_codes.len()) {
            return Err(ConfigError::PartyCount(self.party_codes.len()));
        }

        let mut seen = HashSet::new();
        for code in &self.party_codes {
            if !seen.insert(code) {
                return Err(ConfigError::DuplicateParty(code.clone()));
            }
            if party::lookup(code.as_str()).is_none() {
                return Err(ConfigError::UnknownParty(code.clone()));
            }
        }

        Ok(())
    }

    /// Find a candidate on this election's slate
    pub fn candidate(&self, id: &CandidateId) -> Option<&Candidate> {
        self.candidates.iter().find(|c| &c.id == id)
    }

    /// Candidate for `party` in `ward`, if both are part of this election
    pub fn candidate_for(&self, ward: WardNumber, party: &PartyCode) -> Option<&Candidate> {
        self.candidate(&CandidateId::new(ward, party.clone()))
    }

    /// Whether `ward` is a valid ward number for this election
    pub fn has_ward(&self, ward: WardNumber) -> bool {
        (1..=self.wards).contains(&ward)
    }
}

/// The default election: a four-ward municipal corporation
pub fn default_config() -> ConfigResult<ElectionConfig> {
    super::presets::MUNICIPAL.to_config()
}

// =========================================================================
// Persistence
// =========================================================================

/// Persist the configuration to its slot
pub fn save_election_config(store: &dyn KeyValueStore, config: &ElectionConfig) -> ConfigResult<()> {
    put_json(store, schema::ELECTION_CONFIG, config)?;
    info!(
        id = %config.id,
        wards = config.wards,
        parties = config.party_codes.len(),
        "Election configuration saved"
    );
    Ok(())
}

/// Load the configuration, treating a missing or malformed record as absent
pub fn load_election_config(store: &dyn KeyValueStore) -> ConfigResult<Option<ElectionConfig>> {
    let config: Option<ElectionConfig> = get_json(store, schema::ELECTION_CONFIG)?;
    debug!(found = config.is_some(), "Loaded election configuration");
    Ok(config)
}

/// Remove the configuration (for a new election)
pub fn clear_election_config(store: &dyn KeyValueStore) -> ConfigResult<()> {
    store.delete(schema::ELECTION_CONFIG)?;
    Ok(())
}
