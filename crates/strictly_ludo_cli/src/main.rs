//! Strictly Ludo - terminal front end
//!
//! Play against the engine in real time, or let machines play each other in
//! virtual time.

#![warn(missing_docs)]

mod cli;
mod config;
mod play;
mod render;
mod simulate;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use config::LudoConfig;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => LudoConfig::from_file(path)?,
        None => LudoConfig::default(),
    };

    match cli.command {
        Command::Play { table } => {
            init_tracing(cli.verbose, Some(PLAY_LOG))?;
            let settings = config.settings(&table);
            let seed = config.resolve_seed(&table);
            play::run(settings, *config.timings(), seed).await
        }
        Command::Simulate { table, games, json } => {
            init_tracing(cli.verbose, None)?;
            let settings = config.settings(&table);
            let seed = config.resolve_seed(&table);
            run_simulation(&settings, &config, seed, games, json)
        }
    }
}

/// Log file used while the board owns the terminal.
const PLAY_LOG: &str = "strictly_ludo.log";

/// Logs to `log_file` when given, otherwise to stderr so reports on stdout
/// stay clean.
fn init_tracing(verbose: bool, log_file: Option<&str>) -> Result<()> {
    let fallback = if verbose {
        "debug"
    } else {
        "warn,strictly_ludo=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match log_file {
        Some(path) => {
            let file = std::fs::File::create(path)?;
            builder
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .init();
        }
        None => builder.with_writer(std::io::stderr).init(),
    }
    Ok(())
}

#[instrument(skip(settings, config))]
fn run_simulation(
    settings: &strictly_ludo::GameSettings,
    config: &LudoConfig,
    seed: u64,
    games: u32,
    json: bool,
) -> Result<()> {
    info!(players = settings.player_count(), "Simulating");
    let report = simulate::run(settings, *config.timings(), seed, games)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report.to_text());
    }
    Ok(())
}
