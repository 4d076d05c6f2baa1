//! Contract-based validation for moves.
//!
//! Contracts pair a precondition on the request with a postcondition on the
//! transition: {P} apply_move {Q}.

use super::action::{Move, MoveError};
use super::invariants::{InvariantSet, LudoInvariants};
use super::rules::check_legal;
use super::GameState;
use tracing::{instrument, warn};

/// Preconditions and postconditions for a state transition.
pub trait Contract<S, A> {
    /// Checks preconditions before applying the action.
    fn pre(state: &S, action: &A) -> Result<(), MoveError>;

    /// Checks postconditions after applying the action.
    fn post(before: &S, after: &S) -> Result<(), MoveError>;
}

/// Precondition: the game is still running.
pub struct GameRunning;

impl GameRunning {
    /// Rejects requests once a winner exists.
    pub fn check(state: &GameState) -> Result<(), MoveError> {
        if state.is_over() {
            Err(MoveError::GameOver)
        } else {
            Ok(())
        }
    }
}

/// Precondition: the token belongs to the seated mover.
pub struct OwnToken;

impl OwnToken {
    /// Rejects unseated colors and foreign tokens.
    pub fn check(mv: &Move, state: &GameState) -> Result<(), MoveError> {
        if state.player(mv.color).is_none() {
            return Err(MoveError::NotSeated(mv.color));
        }
        if mv.token.color != mv.color {
            return Err(MoveError::NotYourToken(mv.token, mv.color));
        }
        Ok(())
    }
}

/// Contract for move actions.
///
/// Preconditions:
/// - Game not over
/// - Token belongs to the seated mover
/// - The die can move the token
///
/// Postconditions:
/// - Every state invariant holds
/// - Exactly one log entry was appended
pub struct MoveContract;

impl Contract<GameState, Move> for MoveContract {
    #[instrument(skip(state), fields(mv = %action))]
    fn pre(state: &GameState, action: &Move) -> Result<(), MoveError> {
        GameRunning::check(state)?;
        OwnToken::check(action, state)?;
        let token = state
            .token(action.token)
            .ok_or(MoveError::NotSeated(action.color))?;
        check_legal(token, action.die)
    }

    fn post(before: &GameState, after: &GameState) -> Result<(), MoveError> {
        LudoInvariants::check_all(after).map_err(|violations| {
            let descriptions = violations
                .iter()
                .map(|v| v.description.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            warn!(%descriptions, "Postcondition failed");
            MoveError::InvariantViolation(format!("Postcondition failed: {descriptions}"))
        })?;
        if after.log().len() != before.log().len() + 1 {
            return Err(MoveError::InvariantViolation(format!(
                "Move log grew from {} to {}",
                before.log().len(),
                after.log().len()
            )));
        }
        Ok(())
    }
}

/// Asserts that all state invariants hold (panics on violation in debug builds).
#[instrument(skip(state))]
pub fn assert_invariants(state: &GameState) {
    let result = LudoInvariants::check_all(state);
    debug_assert!(result.is_ok(), "Invariants violated: {result:?}");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, DieValue, PlayerKind, TokenId, TokenState};

    fn two_seats() -> GameState {
        GameState::new(&[(Color::Red, PlayerKind::Human), (Color::Yellow, PlayerKind::Human)])
    }

    #[test]
    fn test_precondition_accepts_launch() {
        let mv = Move::new(Color::Red, TokenId::new(Color::Red, 0), DieValue::SIX);
        assert!(MoveContract::pre(&two_seats(), &mv).is_ok());
    }

    #[test]
    fn test_precondition_rejects_foreign_token() {
        let mv = Move::new(Color::Red, TokenId::new(Color::Yellow, 0), DieValue::SIX);
        assert!(matches!(
            MoveContract::pre(&two_seats(), &mv),
            Err(MoveError::NotYourToken(..))
        ));
    }

    #[test]
    fn test_precondition_rejects_unseated_color() {
        let mv = Move::new(Color::Green, TokenId::new(Color::Green, 0), DieValue::SIX);
        assert_eq!(
            MoveContract::pre(&two_seats(), &mv),
            Err(MoveError::NotSeated(Color::Green))
        );
    }

    #[test]
    fn test_postcondition_requires_log_entry() {
        let state = two_seats();
        assert!(matches!(
            MoveContract::post(&state, &state),
            Err(MoveError::InvariantViolation(_))
        ));
    }

    #[test]
    fn test_postcondition_detects_corruption() {
        let before = two_seats();
        let mut after = before.clone();
        after.place_token(TokenId::new(Color::Red, 3), TokenState::OnRing { progress: 54 });
        assert!(MoveContract::post(&before, &after).is_err());
    }
}
