//! Opponents never share an unsafe ring square.

use super::super::board::{LAST_RING_PROGRESS, absolute_of, is_safe};
use super::super::{Color, GameState, TokenState};
use super::Invariant;
use std::collections::HashMap;

/// Invariant: tokens of distinct colors share a ring square only if it is
/// safe.
///
/// A color may stack its own tokens anywhere.
pub struct SingleOccupancy;

impl Invariant<GameState> for SingleOccupancy {
    fn holds(state: &GameState) -> bool {
        let mut owners: HashMap<u8, Color> = HashMap::new();
        for token in state.tokens() {
            let square = match token.state() {
                TokenState::OnRing { progress } if progress <= LAST_RING_PROGRESS => {
                    absolute_of(progress, token.color())
                }
                _ => continue,
            };
            if is_safe(square) {
                continue;
            }
            match owners.get(&square) {
                Some(&color) if color != token.color() => return false,
                Some(_) => {}
                None => {
                    owners.insert(square, token.color());
                }
            }
        }
        true
    }

    fn description() -> &'static str {
        "Opponents share a ring square only on safe squares"
    }
}
