//! Capture ("cut") resolution.

use super::super::board::{self, LAST_RING_PROGRESS};
use super::super::state::GameState;
use super::super::token::TokenId;
use super::super::Color;
use tracing::{debug, instrument};

/// Opponent tokens a `mover` landing on ring `square` sends back to base.
///
/// Nothing is captured on a safe square. Every opponent token on an unsafe
/// square is captured, so a same-color stack goes home together.
#[instrument(skip(state))]
pub fn capture_at(square: u8, mover: Color, state: &GameState) -> Vec<TokenId> {
    if board::is_safe(square) {
        return Vec::new();
    }
    let captured: Vec<TokenId> = state
        .tokens()
        .filter(|t| t.color() != mover && t.ring_square() == Some(square))
        .map(|t| t.id())
        .collect();
    if !captured.is_empty() {
        debug!(square, count = captured.len(), "Opponent tokens on destination");
    }
    captured
}

/// Captures caused by a `mover` token arriving at relative `progress`.
///
/// Home stretches are private, so arrivals past the ring capture nothing.
#[instrument(skip(state))]
pub fn capture_on_arrival(progress: u8, mover: Color, state: &GameState) -> Vec<TokenId> {
    if progress > LAST_RING_PROGRESS {
        return Vec::new();
    }
    capture_at(board::absolute_of(progress, mover), mover, state)
}
