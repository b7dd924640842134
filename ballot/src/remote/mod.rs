//! Client for the server-authoritative variant
//!
//! In this variant the backend keeps every vote and does the counting; the
//! device only forwards choices. There is no session, ward or archive state
//! on the client side.

pub mod client;
pub mod types;

pub use client::{RemoteBallotClient, RemoteError, RemoteResult};
pub use types::{RemoteConfig, RemoteResults, RemoteWinner, ResetReceipt, VoteReceipt};
