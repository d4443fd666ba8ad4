use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rumbo_gateway::{Config, Daemon};

/// Rumbo - Conversational travel assistant gateway
#[derive(Parser)]
#[command(name = "rumbo", version, about)]
struct Cli {
    /// Port to listen on
    #[arg(long, env = "RUMBO_PORT")]
    port: Option<u16>,

    /// Path to a TOML config file (defaults to ~/.config/rumbo/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = match cli.verbose {
        0 => "info,rumbo_gateway=info",
        1 => "info,rumbo_gateway=debug",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("fatal: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(port) = cli.port {
        config.port = port;
    }

    tracing::info!(
        port = config.port,
        backend = config.backend.api_key.is_some(),
        "starting rumbo gateway"
    );

    Daemon::new(config).run().await?;
    Ok(())
}
