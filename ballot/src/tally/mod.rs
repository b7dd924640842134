//! Result tabulation
//!
//! Turns the archive of completed sessions into ranked per-ward tallies with
//! a winner per ward, plus party-level totals for the admin view.

pub mod engine;
pub mod types;

pub use engine::{compute_results, party_totals, TabulationEngine};
pub use types::{percentage, CandidateTally, ElectionResults, PartyTotal, WardTally};
