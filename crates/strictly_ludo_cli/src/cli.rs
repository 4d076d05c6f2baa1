//! Command-line interface for strictly_ludo.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use strictly_ludo::{Color, Difficulty, GameMode};

/// Strictly Ludo - four-player Ludo in the terminal
#[derive(Parser, Debug)]
#[command(name = "strictly_ludo")]
#[command(about = "Ludo rules engine with a terminal front end", long_about = None)]
#[command(version)]
pub struct Cli {
    /// TOML file with [game] and [timings] sections
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in real time
    Play {
        /// Table overrides
        #[command(flatten)]
        table: TableArgs,
    },

    /// Run machine-only games in virtual time and report statistics
    Simulate {
        /// Table overrides
        #[command(flatten)]
        table: TableArgs,

        /// Number of games to play
        #[arg(short, long, default_value = "10")]
        games: u32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Flags that override the `[game]` section and the seed.
#[derive(Args, Debug, Clone, Default)]
pub struct TableArgs {
    /// Number of players (2, 3 or 4)
    #[arg(short, long)]
    pub players: Option<usize>,

    /// Seat assignment: local or vs-machine
    #[arg(short, long)]
    pub mode: Option<GameMode>,

    /// Machine strength: easy or medium
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Color played by a human in vs-machine mode (repeatable)
    #[arg(long = "human")]
    pub humans: Vec<Color>,

    /// Seed for dice and machine noise
    #[arg(short, long)]
    pub seed: Option<u64>,
}
