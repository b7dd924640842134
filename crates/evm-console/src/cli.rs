use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::ConsoleConfig;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// TOML settings file (data_dir, vote_delay_ms, admin_passcode, backend_url)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the session, archive and election files
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Pause after each vote, in milliseconds
    #[arg(long, global = true)]
    pub vote_delay_ms: Option<u64>,

    /// Ballot backend for `remote` commands
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Print status and results as JSON
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Command-line flags take precedence over file and environment settings
    pub fn apply(&self, mut config: ConsoleConfig) -> ConsoleConfig {
        if let Some(dir) = &self.data_dir {
            config.data_dir = dir.clone();
        }
        if let Some(delay) = self.vote_delay_ms {
            config.vote_delay_ms = delay;
        }
        if let Some(url) = &self.backend_url {
            config.backend_url = url.clone();
        }
        config
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List the built-in election presets
    Presets,

    /// Configure the election and start a fresh ballot
    Setup(SetupArgs),

    /// Show the current voter's ballot
    Status,

    /// Vote for PARTY's candidate in WARD
    Vote { ward: u32, party: String },

    /// Hand the machine to the next voter
    NextVoter,

    /// Show per-ward results (admin)
    Results {
        #[arg(long)]
        passcode: String,
    },

    /// Cast COUNT random complete ballots (admin)
    Simulate {
        count: usize,
        #[arg(long)]
        passcode: String,
        /// Seed for reproducible runs
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Delete every recorded vote (admin)
    Reset {
        #[arg(long)]
        passcode: String,
    },

    /// Talk to a backend that keeps votes server-side
    #[command(subcommand)]
    Remote(RemoteCommand),
}

#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct SetupArgs {
    /// Preset id, e.g. MUNICIPAL or LOK_SABHA
    #[arg(long, conflicts_with_all = ["wards", "parties"])]
    pub preset: Option<String>,

    #[arg(long, default_value = "Custom Election")]
    pub name: String,

    /// Number of wards for a custom election
    #[arg(long, requires = "parties")]
    pub wards: Option<u32>,

    #[arg(long, default_value = "Ward")]
    pub label: String,

    /// Comma-separated party codes, in ballot order
    #[arg(long, value_delimiter = ',')]
    pub parties: Vec<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum RemoteCommand {
    /// Show the backend's ballot options
    Config,
    /// Cast one vote for OPTION
    Vote { option: String },
    /// Ask the backend to cast COUNT random votes
    Simulate { count: u32 },
    /// Show the backend's counts
    Results,
    /// Delete every vote on the backend (admin)
    Reset {
        #[arg(long)]
        passcode: String,
    },
}
