//! Wire types for the ballot backend's REST API

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Ballot layout served by `GET /config`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteConfig {
    pub parties: Vec<String>,
    pub candidates: Vec<String>,
    /// Every selectable option, candidates plus any extra choices such as NOTA
    pub options: Vec<String>,
    #[serde(default)]
    pub candidate_party_map: BTreeMap<String, String>,
}

impl RemoteConfig {
    /// Whether `option` is accepted by `POST /vote`
    pub fn is_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    /// Party that `candidate` stands for, if any
    pub fn party_of(&self, candidate: &str) -> Option<&str> {
        self.candidate_party_map.get(candidate).map(String::as_str)
    }
}

/// Body of `POST /vote`
#[derive(Debug, Clone, Serialize)]
pub struct VoteRequest<'a> {
    pub candidate: &'a str,
}

/// Acknowledgement from `POST /vote` and `POST /simulate/{count}`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VoteReceipt {
    pub message: String,
    pub total_votes: u64,
}

/// Acknowledgement from `POST /reset`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResetReceipt {
    pub message: String,
}

/// Leading option in `GET /results`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteWinner {
    pub name: String,
    pub votes: u64,
}

/// Counts served by `GET /results`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteResults {
    /// Votes per option; options without votes are absent
    #[serde(default)]
    pub results: BTreeMap<String, u64>,
    pub total: u64,
    /// `None` until the first vote is cast
    pub winner: Option<RemoteWinner>,
}

impl RemoteResults {
    /// Options ordered by descending vote count, then by name
    pub fn ranked(&self) -> Vec<(&str, u64)> {
        let mut ranked: Vec<(&str, u64)> =
            self.results.iter().map(|(k, v)| (k.as_str(), *v)).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked
    }

    /// Per-party totals using `config`'s candidate-to-party map. Options
    /// outside the map (NOTA) are reported under their own name.
    pub fn party_totals(&self, config: &RemoteConfig) -> Vec<(String, u64)> {
        let mut totals: BTreeMap<String, u64> = BTreeMap::new();
        for (option, votes) in &self.results {
            let party = config.party_of(option).unwrap_or(option);
            *totals.entry(party.to_string()).or_insert(0) += votes;
        }
        let mut totals: Vec<(String, u64)> = totals.into_iter().collect();
        totals.sort_by(|a, b| b.1.cmp(&a.1));
        totals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG_JSON: &str = r#"{
        "parties": ["Party A", "Party B"],
        "candidates": ["Party A - Candidate 1", "Party B - Candidate 1"],
        "options": ["Party A - Candidate 1", "Party B - Candidate 1", "NOTA"],
        "candidate_party_map": {
            "Party A - Candidate 1": "Party A",
            "Party B - Candidate 1": "Party B"
        }
    }"#;

    #[test]
    fn test_parse_config() {
        let config: RemoteConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        assert_eq!(config.parties.len(), 2);
        assert!(config.is_option("NOTA"));
        assert!(!config.is_option("Party C - Candidate 1"));
        assert_eq!(config.party_of("Party B - Candidate 1"), Some("Party B"));
        assert_eq!(config.party_of("NOTA"), None);
    }

    #[test]
    fn test_parse_empty_results() {
        let results: RemoteResults =
            serde_json::from_str(r#"{"results": {}, "winner": null, "total": 0}"#).unwrap();
        assert_eq!(results.total, 0);
        assert!(results.winner.is_none());
        assert!(results.ranked().is_empty());
    }

    #[test]
    fn test_ranked_and_party_totals() {
        let config: RemoteConfig = serde_json::from_str(CONFIG_JSON).unwrap();
        let results: RemoteResults = serde_json::from_str(
            r#"{
                "results": {"Party A - Candidate 1": 2, "Party B - Candidate 1": 5, "NOTA": 1},
                "total": 8,
                "winner": {"name": "Party B - Candidate 1", "votes": 5}
            }"#,
        )
        .unwrap();

        assert_eq!(results.winner.as_ref().unwrap().votes, 5);
        assert_eq!(results.ranked()[0], ("Party B - Candidate 1", 5));
        assert_eq!(
            results.party_totals(&config),
            vec![
                ("Party B".to_string(), 5),
                ("Party A".to_string(), 2),
                ("NOTA".to_string(), 1)
            ]
        );
    }

    #[test]
    fn test_vote_request_body() {
        let body = serde_json::to_string(&VoteRequest { candidate: "NOTA" }).unwrap();
        assert_eq!(body, r#"{"candidate":"NOTA"}"#);
    }
}
