//! Move log entries and move errors.
//!
//! A move is a domain event: the log is the canonical, append-only history of
//! a game and can be inspected or serialized independently of the board.

use super::dice::DieValue;
use super::token::TokenId;
use super::Color;
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};

/// A move request: spend `die` on `token` for `color`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Color making the move.
    pub color: Color,
    /// Token to move.
    pub token: TokenId,
    /// Face being spent.
    pub die: DieValue,
}

impl Move {
    /// Creates a move request.
    pub fn new(color: Color, token: TokenId, die: DieValue) -> Self {
        Self { color, token, die }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} moves {} by {}", self.color, self.token, self.die)
    }
}

/// One applied move.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize, new)]
pub struct MoveRecord {
    /// Color that moved.
    color: Color,
    /// Token that moved.
    token: TokenId,
    /// Progress before the move, `None` when launched from base.
    from: Option<u8>,
    /// Progress after the move.
    to: u8,
    /// Die face that was spent.
    die: DieValue,
    /// Opponent tokens sent back to base; a stack is captured whole.
    captured: Vec<TokenId>,
    /// Controller clock in milliseconds when the move was applied.
    timestamp: u64,
}

impl MoveRecord {
    /// Whether this move sent an opponent home.
    pub fn was_capture(&self) -> bool {
        !self.captured.is_empty()
    }
}

impl std::fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.from {
            Some(from) => write!(f, "{} {} -> {} ({})", self.token, from, self.to, self.die)?,
            None => write!(f, "{} base -> {} ({})", self.token, self.to, self.die)?,
        }
        for captured in &self.captured {
            write!(f, " captures {captured}")?;
        }
        Ok(())
    }
}

/// Why a move cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The token belongs to someone other than the mover.
    #[display("Token {_0} does not belong to {_1}")]
    NotYourToken(TokenId, Color),

    /// The mover's color is not seated.
    #[display("{_0} is not seated")]
    NotSeated(Color),

    /// The token already finished.
    #[display("Token {_0} has already finished")]
    TokenFinished(TokenId),

    /// A parked token needs a six to launch.
    #[display("Token {_0} needs a six to leave base")]
    NeedsSix(TokenId),

    /// The roll would carry the token past the finish.
    #[display("Token {_0} would overshoot the finish")]
    Overshoot(TokenId),

    /// The game is already over.
    #[display("Game is already over")]
    GameOver,

    /// A postcondition failed after applying the move.
    #[display("Invariant violation: {_0}")]
    InvariantViolation(String),
}

impl std::error::Error for MoveError {}
