use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Runtime settings for the console.
///
/// Resolved in layers: built-in defaults, then an optional TOML file, then
/// `EVM_*` environment variables. Command-line flags are applied last by
/// the binary.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Directory holding the file-backed store
    pub data_dir: PathBuf,
    /// Pause after each vote before the ballot moves on
    pub vote_delay_ms: u64,
    /// Gate for admin commands. A UI convenience, not access control.
    pub admin_passcode: String,
    /// Backend for `remote` commands
    pub backend_url: String,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("evm-data"),
            vote_delay_ms: 800,
            admin_passcode: "12345".into(),
            backend_url: "http://localhost:8000".into(),
        }
    }
}

impl ConsoleConfig {
    /// Load settings from a TOML file. Missing keys keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).context(format!("Failed to read {}", path.display()))?;
        let config: ConsoleConfig =
            toml::from_str(&content).context("Failed to parse console config TOML")?;
        Ok(config)
    }

    /// Defaults, then `path` if given, then the process environment
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `EVM_*` overrides looked up through `lookup`.
    ///
    /// - `EVM_DATA_DIR`
    /// - `EVM_VOTE_DELAY_MS`
    /// - `EVM_ADMIN_PASSCODE`
    /// - `EVM_BACKEND_URL`
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(dir) = lookup("EVM_DATA_DIR") {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(delay) = lookup("EVM_VOTE_DELAY_MS") {
            self.vote_delay_ms = delay
                .trim()
                .parse()
                .context(format!("EVM_VOTE_DELAY_MS is not a number: {delay}"))?;
        }
        if let Some(passcode) = lookup("EVM_ADMIN_PASSCODE") {
            self.admin_passcode = passcode;
        }
        if let Some(url) = lookup("EVM_BACKEND_URL") {
            self.backend_url = url;
        }
        Ok(self)
    }

    pub fn vote_delay(&self) -> Duration {
        Duration::from_millis(self.vote_delay_ms)
    }

    /// Whether `given` matches the admin passcode
    pub fn check_passcode(&self, given: &str) -> bool {
        !self.admin_passcode.is_empty() && given == self.admin_passcode
    }
}
