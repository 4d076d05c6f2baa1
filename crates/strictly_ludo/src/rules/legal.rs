//! Which tokens a die face can move.

use super::super::action::MoveError;
use super::super::board::FINISH;
use super::super::dice::DieValue;
use super::super::player::Player;
use super::super::token::{Token, TokenId, TokenState};
use tracing::instrument;

/// Progress a token would reach by spending `die`.
///
/// A parked token launches to progress 0, the color's start square. The
/// result may exceed the finish; [`is_legal`] rejects that.
#[instrument(level = "trace")]
pub fn next_progress(token: &Token, die: DieValue) -> u8 {
    match token.state() {
        TokenState::AtBase => 0,
        state => state.progress().unwrap_or(FINISH) + die.get(),
    }
}

/// Explains why `die` cannot move `token`, or `Ok` if it can.
pub fn check_legal(token: &Token, die: DieValue) -> Result<(), MoveError> {
    match token.state() {
        TokenState::Finished => Err(MoveError::TokenFinished(token.id())),
        TokenState::AtBase if !die.is_six() => Err(MoveError::NeedsSix(token.id())),
        TokenState::AtBase => Ok(()),
        TokenState::OnRing { .. } | TokenState::InStretch { .. } => {
            if next_progress(token, die) > FINISH {
                Err(MoveError::Overshoot(token.id()))
            } else {
                Ok(())
            }
        }
    }
}

/// Whether `die` can move `token`.
///
/// Finished tokens never move, parked tokens leave only on a six, and the
/// finish must be reached exactly.
#[instrument(level = "trace")]
pub fn is_legal(token: &Token, die: DieValue) -> bool {
    check_legal(token, die).is_ok()
}

/// Whether any of the player's tokens can use `die`.
#[instrument(level = "trace", skip(player), fields(color = %player.color()))]
pub fn any_legal(player: &Player, die: DieValue) -> bool {
    player.tokens().iter().any(|t| is_legal(t, die))
}

/// The player's movable tokens in slot order.
#[instrument(level = "trace", skip(player), fields(color = %player.color()))]
pub fn legal_tokens(player: &Player, die: DieValue) -> Vec<TokenId> {
    player
        .tokens()
        .iter()
        .filter(|t| is_legal(t, die))
        .map(Token::id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Color, PlayerKind};

    fn die(face: u8) -> DieValue {
        DieValue::new(face).unwrap()
    }

    fn token_at(progress: u8) -> Token {
        Token::with_state(TokenId::new(Color::Red, 0), TokenState::at_progress(progress))
    }

    #[test]
    fn test_parked_token_needs_six() {
        let token = Token::parked(TokenId::new(Color::Red, 0));
        for face in 1..=5 {
            assert!(!is_legal(&token, die(face)));
        }
        assert!(is_legal(&token, DieValue::SIX));
        assert_eq!(next_progress(&token, DieValue::SIX), 0);
    }

    #[test]
    fn test_exact_finish_from_55() {
        let token = token_at(55);
        assert!(is_legal(&token, die(1)));
        assert!(is_legal(&token, die(2)));
        assert_eq!(next_progress(&token, die(2)), FINISH);
        for face in 3..=6 {
            assert_eq!(check_legal(&token, die(face)), Err(MoveError::Overshoot(token.id())));
        }
    }

    #[test]
    fn test_finished_token_never_moves() {
        let token = token_at(57);
        for face in 1..=6 {
            assert!(!is_legal(&token, die(face)));
        }
    }

    #[test]
    fn test_ring_token_enters_stretch() {
        let token = token_at(49);
        assert_eq!(next_progress(&token, die(5)), 54);
        assert!(is_legal(&token, die(6)));
    }

    #[test]
    fn test_legal_tokens_in_slot_order() {
        let mut player = Player::new(Color::Red, PlayerKind::Human);
        player.token_mut(1).set_state(TokenState::at_progress(10));
        player.token_mut(3).set_state(TokenState::at_progress(56));
        assert_eq!(legal_tokens(&player, die(3)), vec![TokenId::new(Color::Red, 1)]);
        assert_eq!(legal_tokens(&player, DieValue::SIX).len(), 3);
        assert!(any_legal(&player, die(1)));
        player.token_mut(1).set_state(TokenState::Finished);
        assert!(!any_legal(&player, die(2)));
    }
}
