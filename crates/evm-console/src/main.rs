use anyhow::Result;
use clap::Parser;
use evm_console::cli::{Args, Command};
use evm_console::{run_remote, Console, ConsoleConfig};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.apply(ConsoleConfig::load(args.config.as_deref())?);

    let output = match &args.command {
        Command::Remote(command) => {
            info!(backend = %config.backend_url, "EVM console starting in remote mode");
            run_remote(&config, command).await?
        }
        command => {
            info!(data_dir = %config.data_dir.display(), "EVM console starting");
            let mut console = Console::open(config)?;
            console.run(command, args.json).await?
        }
    };

    print!("{output}");
    Ok(())
}
