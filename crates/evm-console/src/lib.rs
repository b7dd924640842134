//! Terminal front end for the simulated electronic voting machine
//!
//! Wires a file-backed store into the ballot session and tabulation engines
//! and exposes them as subcommands: election setup, the voter-facing ballot
//! (`status`, `vote`, `next-voter`), and passcode-gated admin commands
//! (`results`, `simulate`, `reset`). `remote` talks to a backend that keeps
//! votes server-side instead.
//!
//! # Usage
//!
//! ```bash
//! evm-console setup --preset PANCHAYAT
//! evm-console vote 1 PA
//! evm-console next-voter
//! evm-console results --passcode 12345
//!
//! # Settings file and overrides
//! EVM_DATA_DIR=/var/lib/evm evm-console --config evm.toml status
//! ```

#![allow(clippy::uninlined_format_args)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod render;

pub use commands::{run_remote, Console};
pub use config::ConsoleConfig;
