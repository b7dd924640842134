//! Candidate identifiers and the per-ward candidate slate

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::party::{InvalidPartyCode, PartyCode};

/// Ward number, 1-based
pub type WardNumber = u32;

/// Error returned when a candidate identifier cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CandidateIdError {
    #[error("Candidate id '{0}' must look like W<ward>_<party>")]
    Malformed(String),

    #[error("Candidate id '{0}' has ward 0; wards are 1-based")]
    ZeroWard(String),

    #[error(transparent)]
    Party(#[from] InvalidPartyCode),
}

/// Identifies one candidate: a party standing in a ward.
///
/// Rendered and persisted as `W{ward}_{party}`, e.g. `W2_PB`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CandidateId {
    ward: WardNumber,
    party: PartyCode,
}

impl CandidateId {
    pub fn new(ward: WardNumber, party: PartyCode) -> Self {
        Self { ward, party }
    }

    pub fn ward(&self) -> WardNumber {
        self.ward
    }

    pub fn party(&self) -> &PartyCode {
        &self.party
    }
}

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "W{}_{}", self.ward, self.party)
    }
}

impl FromStr for CandidateId {
    type Err = CandidateIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || CandidateIdError::Malformed(s.to_string());

        let rest = s.strip_prefix('W').ok_or_else(malformed)?;
        let (ward, party) = rest.split_once('_').ok_or_else(malformed)?;
        if ward.is_empty() || !ward.chars().all(|c| c.is_ascii_digit()) {
            return Err(malformed());
        }

        let ward: WardNumber = ward.parse().map_err(|_| malformed())?;
        if ward == 0 {
            return Err(CandidateIdError::ZeroWard(s.to_string()));
        }

        Ok(Self::new(ward, PartyCode::new(party)?))
    }
}

impl TryFrom<String> for CandidateId {
    type Error = CandidateIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CandidateId> for String {
    fn from(id: CandidateId) -> Self {
        id.to_string()
    }
}

/// One entry on a ward's ballot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub id: CandidateId,
    pub ward_number: WardNumber,
    pub party_code: PartyCode,
    pub candidate_name: String,
    /// 1-based position of the party in the election's party list
    pub serial_number: u32,
}

/// Display name for the candidate at party position `index` (0-based) in `ward`.
///
/// Position 0 in ward 3 is "Candidate A3", position 1 is "Candidate B3".
pub fn candidate_name(index: usize, ward: WardNumber) -> String {
    let letter = char::from_u32('A' as u32 + index as u32).unwrap_or('?');
    format!("Candidate {}{}", letter, ward)
}

/// Build the full slate: one candidate per (ward, party) pair, ward-major
pub fn generate_candidates(wards: WardNumber, party_codes: &[PartyCode]) -> Vec<Candidate> {
    let mut candidates = Vec::with_capacity(wards as usize * party_codes.len());

    for ward in 1..=wards {
        for (index, code) in party_codes.iter().enumerate() {
            candidates.push(Candidate {
                id: CandidateId::new(ward, code.clone()),
                ward_number: ward,
                party_code: code.clone(),
                candidate_name: candidate_name(index, ward),
                serial_number: index as u32 + 1,
            });
        }
    }

    candidates
}

/// Candidates standing in `ward`, in serial order
pub fn candidates_for_ward(ward: WardNumber, all: &[Candidate]) -> Vec<&Candidate> {
    let mut slate: Vec<&Candidate> = all.iter().filter(|c| c.ward_number == ward).collect();
    slate.sort_by_key(|c| c.serial_number);
    slate
}
