//! Command handlers
//!
//! Each handler returns the text to print so the binary stays a thin shell
//! around [`Console`].

use anyhow::{anyhow, bail, ensure, Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use ballot::election::{
    default_config, load_election_config, preset, save_election_config, ElectionConfig,
    PartyCode,
};
use ballot::events::{drain, EventBus};
use ballot::remote::RemoteBallotClient;
use ballot::session::SessionEngine;
use ballot::storage::{FileStore, SharedStore};
use ballot::tally::{party_totals, TabulationEngine};
use ballot::{simulate_voters, BallotEvent};

use crate::cli::{Command, RemoteCommand, SetupArgs};
use crate::config::ConsoleConfig;
use crate::render;

/// A voting machine: one store, both engines, and the settings that gate
/// admin access.
pub struct Console {
    config: ConsoleConfig,
    store: SharedStore,
    sessions: SessionEngine,
    tally: TabulationEngine,
    events: broadcast::Receiver<BallotEvent>,
}

impl Console {
    /// Open the file-backed store under `config.data_dir`
    pub fn open(config: ConsoleConfig) -> Result<Self> {
        let store = FileStore::open(&config.data_dir)
            .context(format!("Failed to open data dir {}", config.data_dir.display()))?
            .shared();
        Ok(Self::with_store(config, store))
    }

    /// Run against an existing store
    pub fn with_store(config: ConsoleConfig, store: SharedStore) -> Self {
        let bus = EventBus::new().shared();
        let events = bus.subscribe();
        Self {
            sessions: SessionEngine::new(store.clone()).with_event_bus(bus.clone()),
            tally: TabulationEngine::new(store.clone()).with_event_bus(bus),
            config,
            store,
            events,
        }
    }

    pub fn sessions(&self) -> &SessionEngine {
        &self.sessions
    }

    /// Dispatch a local command. `Command::Remote` is handled by [`run_remote`].
    pub async fn run(&mut self, command: &Command, json: bool) -> Result<String> {
        let output = match command {
            Command::Presets => Ok(render::presets(ballot::election::all_presets())),
            Command::Setup(args) => self.setup(args),
            Command::Status => self.status(json),
            Command::Vote { ward, party } => self.vote(*ward, party).await,
            Command::NextVoter => self.next_voter(),
            Command::Results { passcode } => self.results(passcode, json),
            Command::Simulate {
                count,
                passcode,
                seed,
            } => {
                let mut rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(*seed),
                    None => StdRng::from_entropy(),
                };
                self.simulate(passcode, *count, &mut rng)
            }
            Command::Reset { passcode } => self.reset(passcode),
            Command::Remote(_) => Err(anyhow!("remote commands do not use the local store")),
        };
        self.log_events();
        output
    }

    fn log_events(&mut self) {
        for event in drain(&mut self.events) {
            debug!(
                event = event.event_type(),
                session = event.session_id().map(|s| s.short()),
                "Engine event"
            );
        }
    }

    fn require_passcode(&self, passcode: &str) -> Result<()> {
        ensure!(self.config.check_passcode(passcode), "Invalid passcode");
        Ok(())
    }

    /// The saved election, or an error telling the operator to run setup
    pub fn election(&self) -> Result<ElectionConfig> {
        match load_election_config(self.store.as_ref())? {
            Some(config) => Ok(config),
            None => bail!("No election configured. Run `evm-console setup` first."),
        }
    }

    pub fn setup(&self, args: &SetupArgs) -> Result<String> {
        let config = match (&args.preset, args.wards) {
            (Some(id), _) => preset(id)
                .with_context(|| format!("Unknown preset {id}; see `evm-console presets`"))?
                .to_config()?,
            (None, Some(wards)) => ElectionConfig::from_codes(
                args.name.as_str(),
                wards,
                args.label.as_str(),
                args.parties.as_slice(),
            )?,
            (None, None) => default_config()?,
        };

        save_election_config(self.store.as_ref(), &config)?;
        // A new configuration starts with a fresh ballot
        self.sessions.clear_active_session()?;

        let archived = self.sessions.archived_count()?;
        if archived > 0 {
            warn!(
                archived,
                "Archive still holds ballots from an earlier configuration; run `reset` to clear"
            );
        }

        info!(election = %config.id, wards = config.wards, "Election configured");
        Ok(render::election(&config))
    }

    pub fn status(&self, json: bool) -> Result<String> {
        let config = self.election()?;
        let session = self.sessions.get_or_create_session()?;
        if json {
            return Ok(serde_json::to_string_pretty(&session)? + "\n");
        }
        Ok(render::ballot(&config, &session))
    }

    /// Record a vote for `party`'s candidate in `ward` on the active ballot
    pub async fn vote(&self, ward: u32, party: &str) -> Result<String> {
        let config = self.election()?;
        let party = PartyCode::new(party)?;
        let candidate = config
            .candidate_for(ward, &party)
            .with_context(|| format!("No {party} candidate in {} {ward}", config.ward_label))?;

        let session = self.sessions.get_or_create_session()?;
        ensure!(
            !session.has_already_voted(),
            "This voter has already voted. Run `evm-console next-voter`."
        );

        let session = self
            .sessions
            .record_vote(&session, ward, candidate.id.clone(), config.wards)?;

        // Give the voter time to see their choice register
        tokio::time::sleep(self.config.vote_delay()).await;

        Ok(render::ballot(&config, &session))
    }

    pub fn next_voter(&self) -> Result<String> {
        let config = self.election()?;
        let session = self.sessions.reset_for_next_voter()?;
        Ok(render::ballot(&config, &session))
    }

    pub fn results(&self, passcode: &str, json: bool) -> Result<String> {
        self.require_passcode(passcode)?;
        let config = self.election()?;
        let results = self.tally.results(&config)?;
        if json {
            return Ok(serde_json::to_string_pretty(&results)? + "\n");
        }
        let totals = party_totals(&results, &config);
        Ok(render::results(&config, &results, &totals))
    }

    pub fn simulate<R: Rng>(&self, passcode: &str, count: usize, rng: &mut R) -> Result<String> {
        self.require_passcode(passcode)?;
        let config = self.election()?;
        simulate_voters(&self.sessions, &config, count, rng)?;
        let archived = self.sessions.archived_count()?;
        Ok(format!("Simulated {count} voters; {archived} ballots recorded\n"))
    }

    /// Clear every vote, active and archived
    pub fn reset(&self, passcode: &str) -> Result<String> {
        self.require_passcode(passcode)?;
        let removed = self.sessions.clear_all_votes()?;
        Ok(format!("Election reset; {removed} ballots removed\n"))
    }
}

/// Run a command against the remote backend at `config.backend_url`
pub async fn run_remote(config: &ConsoleConfig, command: &RemoteCommand) -> Result<String> {
    let client = RemoteBallotClient::new(config.backend_url.as_str())?;
    debug!(backend = client.base_url(), "Remote command");

    let output = match command {
        RemoteCommand::Config => render::remote_config(&client.get_config().await?),
        RemoteCommand::Vote { option } => {
            let ballot = client.get_config().await?;
            ensure!(
                ballot.is_option(option),
                "{option} is not on the backend's ballot; see `evm-console remote config`"
            );
            let receipt = client.cast_vote(option).await?;
            format!("{} ({} votes total)\n", receipt.message, receipt.total_votes)
        }
        RemoteCommand::Simulate { count } => {
            let receipt = client.simulate(*count).await?;
            format!("{} ({} votes total)\n", receipt.message, receipt.total_votes)
        }
        RemoteCommand::Results => {
            // Party grouping is optional; counts alone are still useful
            let ballot = client.get_config().await.ok();
            let results = client.results().await?;
            render::remote_results(ballot.as_ref(), &results)
        }
        RemoteCommand::Reset { passcode } => {
            ensure!(config.check_passcode(passcode), "Invalid passcode");
            format!("{}\n", client.reset().await?.message)
        }
    };
    Ok(output)
}
