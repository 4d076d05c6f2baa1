//! Turn phases and game outcome.

use super::token::TokenId;
use super::Color;
use serde::{Deserialize, Serialize};

/// Where the current turn stands.
///
/// ```text
/// AwaitingRoll -> Rolling -> AwaitingMove -> (extra turn ? AwaitingRoll : next player)
///                         \-> Skipping -> next player
/// ```
///
/// Applying a move is synchronous and has no phase of its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "camelCase")]
pub enum TurnPhase {
    /// No game: before `initialize` or after `reset`.
    Idle,
    /// The current player may roll.
    AwaitingRoll,
    /// The die is animating.
    Rolling,
    /// The current player must pick one of `legal`.
    AwaitingMove {
        /// Tokens the landed face can move, in slot order.
        legal: Vec<TokenId>,
    },
    /// The turn passes after a short visible delay.
    Skipping {
        /// Why the roll was discarded.
        reason: SkipReason,
    },
    /// A player finished all four tokens.
    GameOver,
}

impl TurnPhase {
    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::AwaitingRoll => "awaiting_roll",
            TurnPhase::Rolling => "rolling",
            TurnPhase::AwaitingMove { .. } => "awaiting_move",
            TurnPhase::Skipping { .. } => "skipping",
            TurnPhase::GameOver => "game_over",
        }
    }

    /// Tokens a move request may name; empty outside `AwaitingMove`.
    pub fn legal_tokens(&self) -> &[TokenId] {
        match self {
            TurnPhase::AwaitingMove { legal } => legal,
            _ => &[],
        }
    }
}

/// Why a roll produced no move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkipReason {
    /// No token can use the landed face.
    NoLegalMove,
    /// Third six in a row; the roll is forfeited.
    ThirdSix,
}

/// Result of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Color that finished all four tokens.
    pub winner: Color,
    /// Every seated color, winner first, then by finished tokens descending
    /// with seating order breaking ties.
    pub ranking: Vec<Color>,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} wins", self.winner)
    }
}
