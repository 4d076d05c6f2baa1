//! The move transition.

use super::super::action::{Move, MoveError, MoveRecord};
use super::super::board::FINISH;
use super::super::contracts::{Contract, MoveContract};
use super::super::token::{TokenId, TokenState};
use super::super::GameState;
use super::capture::capture_on_arrival;
use super::legal::next_progress;
use tracing::{debug, instrument};

/// What applying a move produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// State after the move, with the record appended to its log.
    pub state: GameState,
    /// Opponent tokens sent back to base.
    pub captured: Vec<TokenId>,
    /// The moving token reached the finish.
    pub finished_now: bool,
}

/// Applies `mv` to `state`, returning the next state.
///
/// Pure: the input is untouched and equal inputs give equal outputs.
/// `timestamp` is stamped on the log entry. Dice and turn bookkeeping are
/// the caller's concern.
#[instrument(skip(state), fields(mv = %mv))]
pub fn apply_move(state: &GameState, mv: Move, timestamp: u64) -> Result<MoveOutcome, MoveError> {
    MoveContract::pre(state, &mv)?;
    let token = *state
        .token(mv.token)
        .ok_or(MoveError::NotSeated(mv.color))?;

    let from = token.progress();
    let to = next_progress(&token, mv.die);
    let captured = capture_on_arrival(to, mv.color, state);

    let mut next = state.clone();
    for &id in &captured {
        next.place_token(id, TokenState::AtBase);
    }
    next.place_token(mv.token, TokenState::at_progress(to));
    next.push_record(MoveRecord::new(
        mv.color,
        mv.token,
        from,
        to,
        mv.die,
        captured.clone(),
        timestamp,
    ));
    next.set_last_captured(captured.clone());

    #[cfg(debug_assertions)]
    MoveContract::post(state, &next)?;

    debug!(?from, to, captured = captured.len(), "Move applied");
    Ok(MoveOutcome {
        state: next,
        captured,
        finished_now: to == FINISH,
    })
}
