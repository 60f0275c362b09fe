//! FBA ledger console
//!
//! Terminal front end for an FBA ledger service.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (ledger at http://localhost:5000)
//! fba-console
//!
//! # Start with a configuration file
//! fba-console --config console.toml
//!
//! # Point at another ledger and make the node animation reproducible
//! fba-console --url http://ledger.local:5000 --seed 42
//! ```
//!
//! Type `help` at the prompt for the list of commands.

use anyhow::{Context, Result};
use clap::Parser;
use fba_client::HttpLedgerClient;
use fba_node::ConsoleStateMachine;
use fba_production::{
    init_logging, parse_line, resolve_filter, ConsoleConfig, ConsoleInput, ProductionRunner, HELP,
};
use fba_view::TerminalSurface;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tracing::{debug, info, warn};

/// FBA ledger console
///
/// Manages a wallet and watches the consensus of an FBA ledger service.
#[derive(Parser, Debug)]
#[command(name = "fba-console")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Ledger service base URL (overrides config)
    #[arg(long)]
    url: Option<String>,

    /// Log filter (overrides RUST_LOG and config)
    #[arg(long)]
    log_level: Option<String>,

    /// Seed for the node animation delays (random if omitted)
    #[arg(long)]
    seed: Option<u64>,
}

fn load_config(cli: &Cli) -> Result<ConsoleConfig> {
    let mut config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)?,
        None => ConsoleConfig::default(),
    };
    if let Some(url) = &cli.url {
        config.remote.base_url = url.clone();
    }
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(&cli)?;

    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = resolve_filter(
        cli.log_level.as_deref(),
        rust_log.as_deref(),
        &config.telemetry.log_filter,
    );
    init_logging(&filter)?;

    let seed = cli.seed.unwrap_or_else(rand::random);
    info!(
        base_url = %config.remote.base_url,
        seed,
        "Console configuration loaded"
    );

    let client = HttpLedgerClient::new(&config.remote.base_url, config.request_timeout())
        .context("Failed to create ledger client")?;
    let machine = ConsoleStateMachine::new(config.state_machine_config(seed));
    let surface = TerminalSurface::new(std::io::stdout());

    let (mut runner, commands) = ProductionRunner::new(machine, Arc::new(client), surface);
    let shutdown = runner
        .shutdown_handle()
        .context("Shutdown handle already taken")?;

    println!("{}", HELP);

    // Reads stdin until `quit` or EOF; dropping `commands` stops the runner.
    let input = tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    warn!(error = %e, "Failed to read input");
                    break;
                }
            };
            match parse_line(&line) {
                Ok(Some(ConsoleInput::Command(command))) => {
                    debug!(command = command.type_name(), "Command entered");
                    if commands.send(command).await.is_err() {
                        break;
                    }
                }
                Ok(Some(ConsoleInput::Help)) => println!("{}", HELP),
                Ok(Some(ConsoleInput::Quit)) => break,
                Ok(None) => {}
                Err(e) => println!("{}", e),
            }
        }
    });

    tokio::spawn(async move {
        if signal::ctrl_c().await.is_ok() {
            info!("Interrupted");
            shutdown.shutdown();
        }
    });

    runner.run().await;
    input.abort();

    info!("Goodbye");
    Ok(())
}
