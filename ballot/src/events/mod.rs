//! Engine events for front ends
//!
//! The session and tabulation engines publish [`BallotEvent`]s on an
//! optional [`EventBus`]. A ballot screen subscribes to move between wards
//! and to show the completion screen; the admin view subscribes to refresh
//! the tally.

pub mod bus;
pub mod types;

pub use bus::{drain, EventBus, SharedEventBus};
pub use types::BallotEvent;
