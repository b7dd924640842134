//! Pre-configured election types

use serde::Serialize;

use super::candidate::WardNumber;
use super::config::{ConfigResult, ElectionConfig};

/// Template for a common kind of election
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElectionPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub wards: WardNumber,
    pub ward_label: &'static str,
    pub party_codes: &'static [&'static str],
}

impl ElectionPreset {
    /// Materialise the preset as a validated configuration
    pub fn to_config(&self) -> ConfigResult<ElectionConfig> {
        ElectionConfig::from_codes(self.name, self.wards, self.ward_label, self.party_codes)
    }
}

pub const LOK_SABHA: ElectionPreset = ElectionPreset {
    id: "LOK_SABHA",
    name: "Lok Sabha Election",
    description: "National parliamentary election with major political parties",
    wards: 1,
    ward_label: "Constituency",
    party_codes: &["BJP", "INC", "AAP", "BSP", "CPIM"],
};

pub const STATE_ASSEMBLY: ElectionPreset = ElectionPreset {
    id: "STATE_ASSEMBLY",
    name: "State Assembly Election",
    description: "State legislative assembly election across multiple constituencies",
    wards: 5,
    ward_label: "Constituency",
    party_codes: &["BJP", "INC", "AAP", "BSP"],
};

pub const MUNICIPAL: ElectionPreset = ElectionPreset {
    id: "MUNICIPAL",
    name: "Municipal Corporation",
    description: "Local body election with ward-wise voting",
    wards: 4,
    ward_label: "Ward",
    party_codes: &["PA", "PB", "PC", "PD", "PE"],
};

pub const PANCHAYAT: ElectionPreset = ElectionPreset {
    id: "PANCHAYAT",
    name: "Gram Panchayat",
    description: "Village council election with independent candidates",
    wards: 3,
    ward_label: "Ward",
    party_codes: &["PA", "PB", "PC"],
};

/// All built-in presets
pub fn all_presets() -> &'static [ElectionPreset] {
    &[LOK_SABHA, STATE_ASSEMBLY, MUNICIPAL, PANCHAYAT]
}

/// Look up a preset by id, case-insensitively
pub fn preset(id: &str) -> Option<&'static ElectionPreset> {
    all_presets().iter().find(|p| p.id.eq_ignore_ascii_case(id))
}
