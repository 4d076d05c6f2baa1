//! Tokens and their lifecycle.

use super::board::{self, Cell, FINISH, HOME_STRETCH_START, LAST_RING_PROGRESS};
use super::Color;
use serde::{Deserialize, Serialize};

/// Identity of a token: its color and its slot in that color's base.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TokenId {
    /// Owning color.
    pub color: Color,
    /// Base slot, `0..4`.
    pub slot: u8,
}

impl TokenId {
    /// Creates a token id.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below 4.
    pub fn new(color: Color, slot: u8) -> Self {
        assert!(slot < 4, "token slot {slot} out of range");
        Self { color, slot }
    }
}

impl std::fmt::Display for TokenId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.color.label().to_lowercase(), self.slot)
    }
}

/// Where a token is. The modes are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "camelCase")]
pub enum TokenState {
    /// Parked in its base slot, waiting for a six.
    AtBase,
    /// On the shared ring, progress `0..=51`.
    OnRing {
        /// Steps taken since entering the ring.
        progress: u8,
    },
    /// In the color's private home stretch, progress `52..=56`.
    InStretch {
        /// Steps taken since entering the ring.
        progress: u8,
    },
    /// Reached progress 57; never moves again.
    Finished,
}

impl TokenState {
    /// State for a token that has taken `progress` steps.
    ///
    /// # Panics
    ///
    /// Panics if `progress` is past the finish.
    pub fn at_progress(progress: u8) -> Self {
        match progress {
            0..=LAST_RING_PROGRESS => TokenState::OnRing { progress },
            HOME_STRETCH_START..FINISH => TokenState::InStretch { progress },
            FINISH => TokenState::Finished,
            _ => panic!("progress {progress} is past the finish"),
        }
    }

    /// Relative progress, or `None` while at base.
    pub fn progress(self) -> Option<u8> {
        match self {
            TokenState::AtBase => None,
            TokenState::OnRing { progress } | TokenState::InStretch { progress } => Some(progress),
            TokenState::Finished => Some(FINISH),
        }
    }
}

/// A single token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token {
    id: TokenId,
    state: TokenState,
}

impl Token {
    /// A token parked in its base.
    pub fn parked(id: TokenId) -> Self {
        Self {
            id,
            state: TokenState::AtBase,
        }
    }

    /// A token with an explicit state.
    pub fn with_state(id: TokenId, state: TokenState) -> Self {
        Self { id, state }
    }

    /// The token's identity.
    pub fn id(&self) -> TokenId {
        self.id
    }

    /// Owning color.
    pub fn color(&self) -> Color {
        self.id.color
    }

    /// Current mode.
    pub fn state(&self) -> TokenState {
        self.state
    }

    /// Relative progress, or `None` while at base.
    pub fn progress(&self) -> Option<u8> {
        self.state.progress()
    }

    /// Whether the token is parked in its base.
    pub fn is_at_base(&self) -> bool {
        self.state == TokenState::AtBase
    }

    /// Whether the token has reached the finish.
    pub fn is_finished(&self) -> bool {
        self.state == TokenState::Finished
    }

    /// Absolute ring square, if the token is on the ring.
    pub fn ring_square(&self) -> Option<u8> {
        match self.state {
            TokenState::OnRing { progress } => Some(board::absolute_of(progress, self.id.color)),
            _ => None,
        }
    }

    /// Grid cell a renderer should draw this token in.
    pub fn cell(&self) -> Cell {
        match self.state {
            TokenState::AtBase => board::base_coord(self.id.color, self.id.slot),
            TokenState::OnRing { progress } => {
                board::ring_coord(board::absolute_of(progress, self.id.color))
            }
            TokenState::InStretch { progress } => board::stretch_coord(progress, self.id.color),
            TokenState::Finished => board::CENTER,
        }
    }

    pub(crate) fn set_state(&mut self, state: TokenState) {
        self.state = state;
    }
}
