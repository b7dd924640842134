//! Plain-text screens for the terminal ballot unit and admin view

use std::fmt::Write as _;

use ballot::election::party::display_name;
use ballot::election::{candidates_for_ward, ElectionConfig, ElectionPreset};
use ballot::remote::{RemoteConfig, RemoteResults};
use ballot::tally::{percentage, ElectionResults, PartyTotal};
use ballot::VotingSession;
use chrono::{DateTime, Utc};

const BAR_WIDTH: usize = 20;

fn bar(percent: f64) -> String {
    let filled = ((percent / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

pub fn presets(presets: &[ElectionPreset]) -> String {
    let mut out = String::new();
    for p in presets {
        let _ = writeln!(
            out,
            "{:<16} {} ({} x {}, parties: {})",
            p.id,
            p.name,
            p.wards,
            p.ward_label,
            p.party_codes.join(" ")
        );
        let _ = writeln!(out, "{:<16} {}", "", p.description);
    }
    out
}

pub fn election(config: &ElectionConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", config.name);
    let _ = writeln!(
        out,
        "  {} x {}, {} parties, configured {}",
        config.wards,
        config.ward_label,
        config.party_codes.len(),
        timestamp(config.created_at)
    );
    for (i, code) in config.party_codes.iter().enumerate() {
        let _ = writeln!(out, "  {:>2}. {:<8} {}", i + 1, code.as_str(), display_name(code));
    }
    out
}

/// Ballot screen: progress, choices made so far, and the current ward's slate
pub fn ballot(config: &ElectionConfig, session: &VotingSession) -> String {
    let mut out = String::new();
    let progress = session.progress(config.wards);
    let _ = writeln!(
        out,
        "Voter #{} [{}] {}/{} voted",
        session.voter_number,
        bar(progress.percent()),
        progress.cast,
        progress.total
    );

    for (ward, candidate) in &session.votes {
        let _ = writeln!(out, "  {} {}: {} voted", config.ward_label, ward, candidate);
    }

    if session.has_already_voted() {
        let _ = writeln!(
            out,
            "Thank you. Your vote has been recorded in all {} {}s.",
            config.wards,
            config.ward_label.to_lowercase()
        );
        let _ = writeln!(out, "Run `next-voter` to hand over the machine.");
        return out;
    }

    let ward = session.current_ward;
    let _ = writeln!(out, "{} {} ballot:", config.ward_label, ward);
    for candidate in candidates_for_ward(ward, &config.candidates) {
        let _ = writeln!(
            out,
            "  {:>2}. {:<14} {:<8} {}",
            candidate.serial_number,
            candidate.candidate_name,
            candidate.party_code.as_str(),
            display_name(&candidate.party_code)
        );
    }
    out
}

/// Admin results: every ward ranked, then party totals
pub fn results(config: &ElectionConfig, results: &ElectionResults, totals: &[PartyTotal]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {} ballots counted at {}",
        config.name,
        results.ballots_counted,
        timestamp(results.computed_at)
    );
    if results.skipped_entries > 0 {
        let _ = writeln!(
            out,
            "  {} archive entries could not be read and were skipped",
            results.skipped_entries
        );
    }

    for ward in &results.wards {
        let _ = writeln!(
            out,
            "\n{} {} ({} votes)",
            config.ward_label, ward.ward_number, ward.total_votes
        );
        for candidate in &ward.candidates {
            let share = ward.percentage(candidate);
            let _ = writeln!(
                out,
                "  {} {:<14} {:<8} {:>5} {:>6.1}% {}",
                if ward.is_winner(candidate) { "*" } else { " " },
                candidate.candidate_name,
                candidate.party_code.as_str(),
                candidate.votes,
                share,
                bar(share)
            );
        }
        if ward.winner.is_none() {
            let _ = writeln!(out, "  no votes cast");
        }
    }

    let total = results.total_votes();
    let _ = writeln!(out, "\nParty totals");
    for party in totals {
        let _ = writeln!(
            out,
            "  {:<8} {:<12} {:>5} {:>6.1}%  {} won",
            party.party_code.as_str(),
            display_name(&party.party_code),
            party.votes,
            percentage(party.votes, total),
            party.wards_won
        );
    }
    out
}

pub fn remote_config(config: &RemoteConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Parties: {}", config.parties.join(", "));
    for option in &config.options {
        match config.party_of(option) {
            Some(party) => {
                let _ = writeln!(out, "  {option}  ({party})");
            }
            None => {
                let _ = writeln!(out, "  {option}");
            }
        }
    }
    out
}

pub fn remote_results(config: Option<&RemoteConfig>, results: &RemoteResults) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} votes", results.total);
    for (option, votes) in results.ranked() {
        let share = percentage(votes, results.total);
        let _ = writeln!(out, "  {:<28} {:>5} {:>6.1}% {}", option, votes, share, bar(share));
    }

    if let Some(config) = config {
        let _ = writeln!(out, "\nBy party");
        for (party, votes) in results.party_totals(config) {
            let _ = writeln!(out, "  {:<28} {:>5}", party, votes);
        }
    }

    match &results.winner {
        Some(winner) => {
            let _ = writeln!(out, "\nLeading: {} ({} votes)", winner.name, winner.votes);
        }
        None => {
            let _ = writeln!(out, "\nNo votes cast");
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot::election::{all_presets, preset};
    use ballot::tally::{compute_results, party_totals};

    #[test]
    fn test_bar_bounds() {
        assert_eq!(bar(0.0), ".".repeat(BAR_WIDTH));
        assert_eq!(bar(100.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(250.0), "#".repeat(BAR_WIDTH));
        assert_eq!(bar(50.0).matches('#').count(), BAR_WIDTH / 2);
    }

    #[test]
    fn test_presets_lists_every_preset() {
        let text = presets(all_presets());
        for p in all_presets() {
            assert!(text.contains(p.id));
        }
        assert!(text.contains("1 x Constituency,"));
    }

    #[test]
    fn test_ballot_shows_current_ward_slate() {
        let config = preset("PANCHAYAT").unwrap().to_config().unwrap();
        let mut session = VotingSession::new(3, "fp_test");
        session.votes.insert(1, "W1_PB".parse().unwrap());
        session.current_ward = 2;

        let text = ballot(&config, &session);
        assert!(text.starts_with("Voter #3"));
        assert!(text.contains("1/3"));
        assert!(text.contains("W1_PB voted"));
        assert!(text.contains("Ward 2 ballot:"));
        assert!(text.contains("Candidate A2"));
        assert!(text.contains("Party C"));
    }

    #[test]
    fn test_ballot_for_completed_session() {
        let config = preset("LOK_SABHA").unwrap().to_config().unwrap();
        let mut session = VotingSession::new(1, "fp_test");
        session.votes.insert(1, "W1_INC".parse().unwrap());
        session.has_voted = true;

        let text = ballot(&config, &session);
        assert!(text.contains("Thank you"));
        assert!(!text.contains("ballot:"));
    }

    #[test]
    fn test_results_marks_winner_and_empty_wards() {
        let config = preset("PANCHAYAT").unwrap().to_config().unwrap();
        let mut session = VotingSession::new(1, "fp_test");
        session.votes.insert(1, "W1_PB".parse().unwrap());
        session.has_voted = true;

        let computed = compute_results(&[session], &config);
        let totals = party_totals(&computed, &config);
        let text = results(&config, &computed, &totals);

        assert!(text.contains("1 ballots counted"));
        assert!(text.contains("* Candidate B1"));
        assert!(text.contains("100.0%"));
        assert!(text.contains("no votes cast"));
        assert!(text.contains("Party totals"));
    }
}
