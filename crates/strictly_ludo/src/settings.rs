//! Game setup and controller timings.

use super::{Color, Difficulty, GameMode, PlayerKind};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Invalid arguments to `initialize`, with the caller's location.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
#[display("Setup error: {} at {}:{}", message, file, line)]
pub struct SetupError {
    /// What was wrong.
    pub message: String,
    /// Line number where the error was raised.
    pub line: u32,
    /// Source file where the error was raised.
    pub file: &'static str,
}

impl SetupError {
    /// Creates a setup error with caller location tracking.
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

/// Delays of every self-scheduled action, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Dice animation before the face lands.
    roll_ms: u64,
    /// Pause before a turn with no legal move passes.
    auto_skip_ms: u64,
    /// Easy machine thinking before a roll.
    think_easy_ms: u64,
    /// Medium machine thinking before a roll.
    think_medium_ms: u64,
    /// Delay before a paused machine action resumes.
    resume_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            roll_ms: 600,
            auto_skip_ms: 1000,
            think_easy_ms: 800,
            think_medium_ms: 1200,
            resume_ms: 500,
        }
    }
}

impl Timings {
    /// Every delay zero, for tests and simulations that only care about order.
    pub fn instant() -> Self {
        Self {
            roll_ms: 0,
            auto_skip_ms: 0,
            think_easy_ms: 0,
            think_medium_ms: 0,
            resume_ms: 0,
        }
    }

    /// Machine thinking time before it rolls.
    pub fn think(&self, difficulty: Difficulty) -> u64 {
        match difficulty {
            Difficulty::Easy => self.think_easy_ms,
            Difficulty::Medium => self.think_medium_ms,
        }
    }

    /// Machine delay between seeing its roll and moving: half its thinking time.
    pub fn machine_move(&self, difficulty: Difficulty) -> u64 {
        self.think(difficulty) / 2
    }
}

/// Arguments to `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameSettings {
    /// Seated players, `2..=4`.
    player_count: usize,
    /// Human-only or against machines.
    mode: GameMode,
    /// Machine strength.
    difficulty: Difficulty,
    /// Human colors in `VsMachine` mode; the first seat when absent.
    human_seats: Option<Vec<Color>>,
}

impl GameSettings {
    /// Settings with the default human seat.
    pub fn new(player_count: usize, mode: GameMode, difficulty: Difficulty) -> Self {
        Self {
            player_count,
            mode,
            difficulty,
            human_seats: None,
        }
    }

    /// Overrides which colors humans play in `VsMachine` mode.
    pub fn with_human_seats(mut self, seats: Vec<Color>) -> Self {
        self.human_seats = Some(seats);
        self
    }

    /// Colors and kinds in seating order.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the player count is outside `2..=4`.
    #[instrument(skip(self), fields(players = self.player_count, mode = ?self.mode))]
    pub fn seats(&self) -> Result<Vec<(Color, PlayerKind)>, SetupError> {
        let colors = Color::seating(self.player_count).ok_or_else(|| {
            SetupError::new(format!(
                "player count must be 2, 3 or 4, got {}",
                self.player_count
            ))
        })?;

        let seats = colors
            .iter()
            .enumerate()
            .map(|(index, &color)| {
                let human = match (self.mode, &self.human_seats) {
                    (GameMode::Local, _) => true,
                    (GameMode::VsMachine, Some(humans)) => humans.contains(&color),
                    (GameMode::VsMachine, None) => index == 0,
                };
                let kind = if human {
                    PlayerKind::Human
                } else {
                    PlayerKind::Machine
                };
                (color, kind)
            })
            .collect();
        debug!(?seats, "Seats assigned");
        Ok(seats)
    }
}

impl Default for GameSettings {
    fn default() -> Self {
        Self::new(4, GameMode::Local, Difficulty::Medium)
    }
}
