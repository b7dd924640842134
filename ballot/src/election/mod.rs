//! Election configuration provider
//!
//! Supplies the ward count, ward label and ordered party slate that the
//! session and tabulation engines consume, and derives the candidate list
//! from them (`W{ward}_{party}` per ward and party).

pub mod candidate;
pub mod config;
pub mod party;
pub mod presets;

pub use candidate::{
    candidate_name, candidates_for_ward, generate_candidates, Candidate, CandidateId,
    CandidateIdError, WardNumber,
};
pub use config::{
    clear_election_config, default_config, load_election_config, save_election_config,
    ConfigError, ConfigResult, ElectionConfig,
};
pub use party::{PartyCode, PartyKind, PARTY_LIBRARY};
pub use presets::{all_presets, preset, ElectionPreset};
