//! Party codes and the built-in party catalogue

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Maximum length of a party code
const MAX_CODE_LEN: usize = 12;

/// Error returned when a party code is not well formed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid party code '{0}': expected 1-12 upper-case letters or digits")]
pub struct InvalidPartyCode(pub String);

/// Validated party identifier such as `PA` or `CPIM`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PartyCode(String);

impl PartyCode {
    /// Parse and validate a party code
    pub fn new(code: impl Into<String>) -> Result<Self, InvalidPartyCode> {
        let code = code.into();
        let well_formed = !code.is_empty()
            && code.len() <= MAX_CODE_LEN
            && code
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit());

        if well_formed {
            Ok(Self(code))
        } else {
            Err(InvalidPartyCode(code))
        }
    }

    /// The code as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Catalogue entry for this code, if it is a known party
    pub fn party(&self) -> Option<&'static Party> {
        lookup(&self.0)
    }
}

impl fmt::Display for PartyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PartyCode {
    type Err = InvalidPartyCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for PartyCode {
    type Error = InvalidPartyCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PartyCode> for String {
    fn from(code: PartyCode) -> Self {
        code.0
    }
}

/// Party classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartyKind {
    National,
    State,
    Regional,
    /// Generic placeholder parties for local elections
    Custom,
}

/// Catalogue entry for a party
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Party {
    pub code: &'static str,
    /// Short display name
    pub name: &'static str,
    pub full_name: &'static str,
    pub kind: PartyKind,
}

const fn party(
    code: &'static str,
    name: &'static str,
    full_name: &'static str,
    kind: PartyKind,
) -> Party {
    Party {
        code,
        name,
        full_name,
        kind,
    }
}

/// Every party an election may be configured with
pub const PARTY_LIBRARY: &[Party] = &[
    party("BJP", "BJP", "Bharatiya Janata Party", PartyKind::National),
    party("INC", "Congress", "Indian National Congress", PartyKind::National),
    party("AAP", "AAP", "Aam Aadmi Party", PartyKind::National),
    party("BSP", "BSP", "Bahujan Samaj Party", PartyKind::National),
    party("CPI", "CPI", "Communist Party of India", PartyKind::National),
    party(
        "CPIM",
        "CPI(M)",
        "Communist Party of India (Marxist)",
        PartyKind::National,
    ),
    party("NCP", "NCP", "Nationalist Congress Party", PartyKind::National),
    party("SP", "SP", "Samajwadi Party", PartyKind::State),
    party("TMC", "TMC", "All India Trinamool Congress", PartyKind::State),
    party("DMK", "DMK", "Dravida Munnetra Kazhagam", PartyKind::State),
    party(
        "AIADMK",
        "AIADMK",
        "All India Anna Dravida Munnetra Kazhagam",
        PartyKind::State,
    ),
    party("SS", "Shiv Sena", "Shiv Sena", PartyKind::State),
    party("RJD", "RJD", "Rashtriya Janata Dal", PartyKind::State),
    party("JDU", "JD(U)", "Janata Dal (United)", PartyKind::State),
    party("BJD", "BJD", "Biju Janata Dal", PartyKind::State),
    party("TRS", "BRS", "Bharat Rashtra Samithi", PartyKind::State),
    party("YSRCP", "YSRCP", "YSR Congress Party", PartyKind::State),
    party("TDP", "TDP", "Telugu Desam Party", PartyKind::State),
    party("SAD", "SAD", "Shiromani Akali Dal", PartyKind::State),
    party(
        "NC",
        "NC",
        "Jammu & Kashmir National Conference",
        PartyKind::State,
    ),
    party(
        "AIMIM",
        "AIMIM",
        "All India Majlis-e-Ittehadul Muslimeen",
        PartyKind::Regional,
    ),
    party("PA", "Party A", "Independent Party A", PartyKind::Custom),
    party("PB", "Party B", "Independent Party B", PartyKind::Custom),
    party("PC", "Party C", "Independent Party C", PartyKind::Custom),
    party("PD", "Party D", "Independent Party D", PartyKind::Custom),
    party("PE", "Party E", "Independent Party E", PartyKind::Custom),
];

/// Look up a party by code
pub fn lookup(code: &str) -> Option<&'static Party> {
    PARTY_LIBRARY.iter().find(|p| p.code == code)
}

/// Display name for a code, falling back to the code itself
pub fn display_name(code: &PartyCode) -> &str {
    match code.party() {
        Some(p) => p.name,
        None => code.as_str(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_party_code_validation() {
        assert!(PartyCode::new("PA").is_ok());
        assert!(PartyCode::new("AIADMK").is_ok());
        assert!(PartyCode::new("").is_err());
        assert!(PartyCode::new("pa").is_err());
        assert!(PartyCode::new("P_A").is_err());
        assert!(PartyCode::new("ABCDEFGHIJKLM").is_err());
    }

    #[test]
    fn test_library_codes_are_valid_and_unique() {
        let mut seen = std::collections::HashSet::new();
        for p in PARTY_LIBRARY {
            assert!(PartyCode::new(p.code).is_ok(), "bad code {}", p.code);
            assert!(seen.insert(p.code), "duplicate code {}", p.code);
        }
    }

    #[test]
    fn test_display_name_falls_back_to_code() {
        assert_eq!(display_name(&PartyCode::new("INC").unwrap()), "Congress");
        assert_eq!(display_name(&PartyCode::new("ZZ").unwrap()), "ZZ");
    }

    #[test]
    fn test_party_code_serde_rejects_invalid() {
        let ok: PartyCode = serde_json::from_str("\"PB\"").unwrap();
        assert_eq!(ok.as_str(), "PB");
        assert!(serde_json::from_str::<PartyCode>("\"p b\"").is_err());
    }
}
