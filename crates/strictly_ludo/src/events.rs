//! What the controller publishes to front ends.

use super::action::MoveRecord;
use super::dice::DieValue;
use super::phases::{Outcome, TurnPhase};
use super::token::TokenId;
use super::{Color, Difficulty, GameMode, GameState, Screen};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Something that happened, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum GameEvent {
    /// A die landed.
    Rolled {
        /// Player who rolled.
        color: Color,
        /// Face shown.
        die: DieValue,
    },
    /// A move was applied.
    Moved {
        /// The new log entry.
        record: MoveRecord,
    },
    /// Opponent tokens were sent home.
    Captured {
        /// Capturing color.
        by: Color,
        /// Tokens returned to base.
        tokens: Vec<TokenId>,
    },
    /// No token could use the roll.
    TurnSkipped {
        /// Player who lost the turn.
        color: Color,
        /// The unusable face.
        die: DieValue,
    },
    /// Third six in a row; the roll was discarded.
    TurnForfeited {
        /// Player who lost the turn.
        color: Color,
    },
    /// Control moved to the next seat.
    TurnPassed {
        /// Previous player.
        from: Color,
        /// Player now to roll.
        to: Color,
    },
    /// The same player rolls again.
    ExtraTurn {
        /// Player rolling again.
        color: Color,
    },
    /// Scheduled actions are frozen.
    Paused,
    /// Scheduled actions continue.
    Resumed,
    /// A player finished all four tokens.
    GameOver {
        /// Winner and ranking.
        outcome: Outcome,
    },
    /// The game was discarded.
    Reset,
}

/// Immutable view of the controller for one frame.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Snapshot {
    /// The game, absent before `initialize` and after `reset`.
    game: Option<GameState>,
    /// Current turn phase.
    phase: TurnPhase,
    /// Tokens a move request may name.
    legal_token_ids: Vec<TokenId>,
    /// Screen the front end should show.
    screen: Screen,
    /// Passthrough sound flag.
    sound_enabled: bool,
    /// Machine strength.
    difficulty: Difficulty,
    /// Seat assignment mode.
    mode: GameMode,
    /// Controller clock in milliseconds.
    now: u64,
}

impl Snapshot {
    pub(crate) fn new(
        game: Option<GameState>,
        phase: TurnPhase,
        screen: Screen,
        sound_enabled: bool,
        difficulty: Difficulty,
        mode: GameMode,
        now: u64,
    ) -> Self {
        let legal_token_ids = phase.legal_tokens().to_vec();
        Self {
            game,
            phase,
            legal_token_ids,
            screen,
            sound_enabled,
            difficulty,
            mode,
            now,
        }
    }

    /// Snapshot of a controller that has no game yet.
    pub fn empty() -> Self {
        Self::new(
            None,
            TurnPhase::Idle,
            Screen::default(),
            true,
            Difficulty::default(),
            GameMode::default(),
            0,
        )
    }
}
