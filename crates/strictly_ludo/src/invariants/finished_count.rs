//! Cached finished counts agree with the tokens.

use super::super::GameState;
use super::Invariant;
use tracing::warn;

/// Invariant: `finished_tokens` equals the number of finished tokens.
pub struct FinishedCountConsistent;

impl Invariant<GameState> for FinishedCountConsistent {
    fn holds(state: &GameState) -> bool {
        state.players().iter().all(|player| {
            let counted = player.tokens().iter().filter(|t| t.is_finished()).count();
            let valid = counted == *player.finished_tokens() as usize;
            if !valid {
                warn!(color = %player.color(), counted, cached = player.finished_tokens(), "Finished count drifted");
            }
            valid
        })
    }

    fn description() -> &'static str {
        "Finished count matches tokens at the finish"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, PlayerKind, TokenId, TokenState};

    #[test]
    fn test_detects_stale_count() {
        let mut state = GameState::new(&[(Color::Red, PlayerKind::Human), (Color::Yellow, PlayerKind::Human)]);
        state.place_token(TokenId::new(Color::Yellow, 2), TokenState::Finished);
        assert!(FinishedCountConsistent::holds(&state));

        state.player_mut(Color::Yellow).unwrap().set_finished_count(3);
        assert!(!FinishedCountConsistent::holds(&state));
    }
}
