//! Optional TOML configuration for the terminal front end.

use crate::cli::TableArgs;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use strictly_ludo::{Color, Difficulty, GameMode, GameSettings, Timings};
use tracing::{debug, info, instrument};

/// Configuration error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// The `[game]` table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSection {
    /// Number of seated players.
    players: usize,
    /// Seat assignment mode.
    mode: GameMode,
    /// Machine strength.
    difficulty: Difficulty,
    /// Human colors in vs-machine mode.
    human_seats: Option<Vec<Color>>,
}

impl Default for GameSection {
    fn default() -> Self {
        Self {
            players: 4,
            mode: GameMode::VsMachine,
            difficulty: Difficulty::Medium,
            human_seats: None,
        }
    }
}

/// Whole configuration file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct LudoConfig {
    /// Table setup.
    game: GameSection,
    /// Controller delays.
    timings: Timings,
    /// Fixed seed; a random one is drawn when absent.
    seed: Option<u64>,
}

impl LudoConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(players = config.game.players, seed = ?config.seed, "Config loaded");
        Ok(config)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Game settings with command-line overrides applied.
    #[instrument(skip(self))]
    pub fn settings(&self, args: &TableArgs) -> GameSettings {
        let players = args.players.unwrap_or(self.game.players);
        let mode = args.mode.unwrap_or(self.game.mode);
        let difficulty = args.difficulty.unwrap_or(self.game.difficulty);
        let settings = GameSettings::new(players, mode, difficulty);
        let humans = if args.humans.is_empty() {
            self.game.human_seats.clone()
        } else {
            Some(args.humans.clone())
        };
        match humans {
            Some(humans) => settings.with_human_seats(humans),
            None => settings,
        }
    }

    /// Seed from the flags, then the file, then fresh entropy.
    pub fn resolve_seed(&self, args: &TableArgs) -> u64 {
        args.seed
            .or(self.seed)
            .unwrap_or_else(rand::random::<u64>)
    }
}
