//! Core domain enums for Ludo.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// One of the four seat colors.
///
/// Declaration order is the seating order around the track.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(ascii_case_insensitive)]
pub enum Color {
    /// Enters the ring at absolute square 0.
    Red,
    /// Enters the ring at absolute square 13.
    Green,
    /// Enters the ring at absolute square 26.
    Yellow,
    /// Enters the ring at absolute square 39.
    Blue,
}

impl Color {
    /// All colors in seating order.
    pub const ALL: [Color; 4] = [Color::Red, Color::Green, Color::Yellow, Color::Blue];

    /// Index into color-keyed tables.
    pub const fn index(self) -> usize {
        match self {
            Color::Red => 0,
            Color::Green => 1,
            Color::Yellow => 2,
            Color::Blue => 3,
        }
    }

    /// Display name used for player labels.
    #[instrument]
    pub fn label(self) -> &'static str {
        match self {
            Color::Red => "Red",
            Color::Green => "Green",
            Color::Yellow => "Yellow",
            Color::Blue => "Blue",
        }
    }

    /// Colors seated for a given player count, in seating order.
    ///
    /// Two players sit opposite each other. Returns `None` outside `2..=4`.
    #[instrument]
    pub fn seating(player_count: usize) -> Option<&'static [Color]> {
        match player_count {
            2 => Some(&[Color::Red, Color::Yellow]),
            3 => Some(&[Color::Red, Color::Green, Color::Yellow]),
            4 => Some(&Color::ALL),
            _ => None,
        }
    }
}

/// Who decides a seat's moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerKind {
    /// Moves arrive as UI requests.
    Human,
    /// Moves are synthesized by the heuristic opponent.
    Machine,
}

/// Strength of the heuristic opponent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Noisy scoring with occasional random picks among the best three.
    Easy,
    /// Deterministic scoring with a danger penalty.
    #[default]
    Medium,
}

/// How seats are assigned to humans and machines.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum GameMode {
    /// Every seat is human (pass-and-play).
    #[default]
    Local,
    /// The first seat, or the requested seats, are human; the rest are machines.
    VsMachine,
}

/// Screen the front end should show. The engine only stores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Screen {
    /// Startup splash.
    #[default]
    Splash,
    /// Menu.
    Home,
    /// Board in play.
    Game,
    /// Final ranking.
    GameOver,
}
