//! Every seated color owns exactly four tokens.

use super::super::GameState;
use super::Invariant;

/// Invariant: each player holds four tokens, one per slot, all its own color.
pub struct FourTokensPerColor;

impl Invariant<GameState> for FourTokensPerColor {
    fn holds(state: &GameState) -> bool {
        state.players().iter().all(|player| {
            player.tokens().len() == 4
                && player.tokens().iter().enumerate().all(|(slot, token)| {
                    token.color() == *player.color() && token.id().slot as usize == slot
                })
        })
    }

    fn description() -> &'static str {
        "Each color has exactly four tokens in slot order"
    }
}
