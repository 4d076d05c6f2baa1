//! Token modes carry progress in their own range.

use super::super::board::{FINISH, HOME_STRETCH_START, LAST_RING_PROGRESS};
use super::super::{GameState, TokenState};
use super::Invariant;

/// Invariant: ring tokens sit at `0..=51`, stretch tokens at `52..=56`.
///
/// Parked and finished tokens are distinct variants, so the remaining
/// ways to go wrong are out-of-range payloads.
pub struct TokenModeConsistent;

impl Invariant<GameState> for TokenModeConsistent {
    fn holds(state: &GameState) -> bool {
        state.tokens().all(|token| match token.state() {
            TokenState::AtBase | TokenState::Finished => true,
            TokenState::OnRing { progress } => progress <= LAST_RING_PROGRESS,
            TokenState::InStretch { progress } => (HOME_STRETCH_START..FINISH).contains(&progress),
        })
    }

    fn description() -> &'static str {
        "Token progress lies within its mode's range"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, PlayerKind, TokenId};

    #[test]
    fn test_stretch_payload_on_ring_is_caught() {
        let mut state = GameState::new(&[(Color::Red, PlayerKind::Human), (Color::Yellow, PlayerKind::Human)]);
        state.place_token(TokenId::new(Color::Red, 0), TokenState::at_progress(56));
        assert!(TokenModeConsistent::holds(&state));

        state.place_token(TokenId::new(Color::Red, 0), TokenState::InStretch { progress: 40 });
        assert!(!TokenModeConsistent::holds(&state));
    }
}
