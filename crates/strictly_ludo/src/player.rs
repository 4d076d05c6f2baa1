//! Seated players and their tokens.

use super::token::{Token, TokenId};
use super::{Color, PlayerKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// A seat at the table.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct Player {
    /// Seat color.
    color: Color,
    /// Human or machine.
    kind: PlayerKind,
    /// Display name.
    name: String,
    /// The four tokens, indexed by slot.
    tokens: [Token; 4],
    /// Cached count of finished tokens.
    finished_tokens: u8,
}

impl Player {
    /// Seats a player with all four tokens in base.
    #[instrument]
    pub fn new(color: Color, kind: PlayerKind) -> Self {
        let name = match kind {
            PlayerKind::Human => color.label().to_string(),
            PlayerKind::Machine => format!("{} (Machine)", color.label()),
        };
        Self {
            color,
            kind,
            name,
            tokens: std::array::from_fn(|slot| Token::parked(TokenId::new(color, slot as u8))),
            finished_tokens: 0,
        }
    }

    /// Token in the given slot.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not below 4.
    pub fn token(&self, slot: u8) -> &Token {
        &self.tokens[slot as usize]
    }

    /// Whether all four tokens are home.
    pub fn has_won(&self) -> bool {
        self.finished_tokens == 4
    }

    /// Whether a machine plays this seat.
    pub fn is_machine(&self) -> bool {
        self.kind == PlayerKind::Machine
    }

    pub(crate) fn token_mut(&mut self, slot: u8) -> &mut Token {
        &mut self.tokens[slot as usize]
    }

    /// Recounts finished tokens from the tokens themselves.
    pub(crate) fn recount_finished(&mut self) {
        self.finished_tokens = self.tokens.iter().filter(|t| t.is_finished()).count() as u8;
    }

    #[cfg(test)]
    pub(crate) fn set_finished_count(&mut self, count: u8) {
        self.finished_tokens = count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TokenState;

    #[test]
    fn test_new_player_parks_all_tokens() {
        let player = Player::new(Color::Blue, PlayerKind::Human);
        assert_eq!(player.name(), "Blue");
        for (slot, token) in player.tokens().iter().enumerate() {
            assert!(token.is_at_base());
            assert_eq!(token.id(), TokenId::new(Color::Blue, slot as u8));
        }
        assert_eq!(*player.finished_tokens(), 0);
    }

    #[test]
    fn test_machine_name_suffix() {
        assert_eq!(Player::new(Color::Green, PlayerKind::Machine).name(), "Green (Machine)");
    }

    #[test]
    fn test_recount_tracks_finished_tokens() {
        let mut player = Player::new(Color::Red, PlayerKind::Human);
        player.token_mut(0).set_state(TokenState::Finished);
        player.token_mut(2).set_state(TokenState::Finished);
        player.recount_finished();
        assert_eq!(*player.finished_tokens(), 2);
        assert!(!player.has_won());
    }
}
