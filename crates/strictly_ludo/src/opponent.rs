//! Heuristic opponent for machine seats.
//!
//! Every legal token is scored by what its move would achieve; the best
//! score wins. Easy play adds noise and sometimes settles for one of the top
//! three, medium play penalizes landing just ahead of opponents.

use super::board::{FINISH, HOME_STRETCH_START, RING_LENGTH, absolute_of, is_safe};
use super::dice::DieValue;
use super::player::Player;
use super::rules::{capture_on_arrival, legal_tokens, next_progress};
use super::token::TokenId;
use super::{Color, Difficulty, GameState};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

const LAUNCH_BONUS: i32 = 50;
const CAPTURE_BONUS: i32 = 100;
const DEEP_CAPTURE_BONUS: i32 = 50;
/// Captured tokens beyond this progress count as deep.
const DEEP_CAPTURE_PROGRESS: u8 = 26;
const SAFE_BONUS: i32 = 30;
const STRETCH_BONUS: i32 = 40;
const STRETCH_STEP_BONUS: i32 = 10;
const FINISH_BONUS: i32 = 200;
const ADVANCEMENT_STEP: i32 = 5;
const DANGER_WEIGHT: i32 = 10;
const EASY_NOISE: i32 = 30;
const EASY_WANDER_PROBABILITY: f64 = 0.3;
const EASY_WANDER_POOL: usize = 3;

/// Dominant reason behind a score, for logs and hints.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MoveReason {
    /// Nothing special.
    Advance,
    /// Leaves base.
    Launch,
    /// Sends an opponent home.
    Capture,
    /// Sends a far-advanced opponent home.
    DeepCapture,
    /// Lands on a safe square.
    Safety,
    /// Steps into the home stretch.
    HomeStretch,
    /// Reaches the finish.
    Finish,
    /// Scored down for nearby opponents.
    AvoidDanger,
}

/// A legal token with its heuristic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredMove {
    /// Token the move would use.
    pub token: TokenId,
    /// Higher is better.
    pub score: i32,
    /// Why the score is what it is.
    pub reason: MoveReason,
}

/// Picks moves for machine seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HeuristicOpponent {
    difficulty: Difficulty,
}

impl HeuristicOpponent {
    /// Creates an opponent at the given strength.
    pub fn new(difficulty: Difficulty) -> Self {
        Self { difficulty }
    }

    /// Configured strength.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Scores every legal token, best first.
    ///
    /// The sort is stable, so equal scores keep slot order. Easy play draws
    /// one noise value per legal token from `rng`.
    #[instrument(skip(self, player, state, rng), fields(color = %player.color(), die = %die))]
    pub fn score_moves<R: Rng + ?Sized>(
        &self,
        player: &Player,
        die: DieValue,
        state: &GameState,
        rng: &mut R,
    ) -> Vec<ScoredMove> {
        let mut scored: Vec<ScoredMove> = legal_tokens(player, die)
            .into_iter()
            .map(|id| {
                let mut scored = self.score(id, die, state);
                if self.difficulty == Difficulty::Easy {
                    scored.score += rng.random_range(0..EASY_NOISE);
                }
                scored
            })
            .collect();
        scored.sort_by(|a, b| b.score.cmp(&a.score));
        scored
    }

    /// Chooses a token to move, or `None` when nothing is legal.
    ///
    /// A single legal token is returned without consulting `rng`.
    #[instrument(skip(self, player, state, rng), fields(color = %player.color(), die = %die))]
    pub fn choose<R: Rng + ?Sized>(
        &self,
        player: &Player,
        die: DieValue,
        state: &GameState,
        rng: &mut R,
    ) -> Option<TokenId> {
        let legal = legal_tokens(player, die);
        match legal.as_slice() {
            [] => return None,
            [only] => return Some(*only),
            _ => {}
        }

        let scored = self.score_moves(player, die, state, rng);
        if self.difficulty == Difficulty::Easy && rng.random_bool(EASY_WANDER_PROBABILITY) {
            let pick = rng.random_range(0..scored.len().min(EASY_WANDER_POOL));
            debug!(token = %scored[pick].token, pick, "Wandering from best move");
            return Some(scored[pick].token);
        }
        let best = scored.first()?;
        debug!(token = %best.token, score = best.score, reason = %best.reason, "Best move");
        Some(best.token)
    }

    fn score(&self, id: TokenId, die: DieValue, state: &GameState) -> ScoredMove {
        let Some(token) = state.token(id) else {
            panic!("{id} is not seated");
        };
        let to = next_progress(token, die);
        let mut score = 0;
        let mut reason = MoveReason::Advance;

        match token.progress() {
            None => {
                score += LAUNCH_BONUS;
                reason = MoveReason::Launch;
            }
            Some(progress) => score += i32::from(progress / 10) * ADVANCEMENT_STEP,
        }

        let captured = capture_on_arrival(to, id.color, state);
        if !captured.is_empty() {
            score += CAPTURE_BONUS;
            reason = MoveReason::Capture;
            let deep = captured.iter().any(|&victim| {
                state
                    .token(victim)
                    .and_then(|t| t.progress())
                    .is_some_and(|p| p > DEEP_CAPTURE_PROGRESS)
            });
            if deep {
                score += DEEP_CAPTURE_BONUS;
                reason = MoveReason::DeepCapture;
            }
        }

        if to < HOME_STRETCH_START && is_safe(absolute_of(to, id.color)) {
            score += SAFE_BONUS;
            if reason == MoveReason::Advance {
                reason = MoveReason::Safety;
            }
        }

        if to >= HOME_STRETCH_START {
            score += STRETCH_BONUS + i32::from(to - HOME_STRETCH_START) * STRETCH_STEP_BONUS;
            reason = MoveReason::HomeStretch;
        }

        if to == FINISH {
            score += FINISH_BONUS;
            reason = MoveReason::Finish;
        }

        if self.difficulty == Difficulty::Medium {
            let danger = danger(to, id.color, state);
            score -= danger;
            if danger > 2 * DANGER_WEIGHT {
                reason = MoveReason::AvoidDanger;
            }
        }

        ScoredMove {
            token: id,
            score,
            reason,
        }
    }
}

/// Threat to a token landing at `to`: opponents up to one die behind it.
///
/// Safe squares and the home stretch carry no threat.
pub fn danger(to: u8, mover: Color, state: &GameState) -> i32 {
    if to >= HOME_STRETCH_START {
        return 0;
    }
    let square = absolute_of(to, mover);
    if is_safe(square) {
        return 0;
    }
    state
        .tokens()
        .filter(|t| t.color() != mover)
        .filter_map(|t| t.ring_square())
        .map(|theirs| (square + RING_LENGTH - theirs) % RING_LENGTH)
        .filter(|distance| (1..=6).contains(distance))
        .map(|distance| (7 - i32::from(distance)) * DANGER_WEIGHT)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PlayerKind, TokenState};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn die(face: u8) -> DieValue {
        DieValue::new(face).unwrap()
    }

    fn table() -> GameState {
        let seats: Vec<_> = Color::ALL.iter().map(|&c| (c, PlayerKind::Machine)).collect();
        GameState::new(&seats)
    }

    fn red(state: &GameState) -> &Player {
        state.player(Color::Red).unwrap()
    }

    #[test]
    fn test_launch_scores_launch_plus_safe() {
        let state = table();
        let opponent = HeuristicOpponent::new(Difficulty::Medium);
        let scored = opponent.score_moves(red(&state), DieValue::SIX, &state, &mut StdRng::seed_from_u64(0));
        assert_eq!(scored.len(), 4);
        assert!(scored.iter().all(|s| s.score == LAUNCH_BONUS + SAFE_BONUS));
        // Ties keep slot order.
        assert_eq!(scored[0].token, TokenId::new(Color::Red, 0));
    }

    #[test]
    fn test_capture_preferred_over_advance() {
        let mut state = table();
        let runner = TokenId::new(Color::Red, 0);
        let hunter = TokenId::new(Color::Red, 1);
        state.place_token(runner, TokenState::at_progress(2));
        state.place_token(hunter, TokenState::at_progress(18));
        state.place_token(TokenId::new(Color::Green, 0), TokenState::at_progress(7));

        let opponent = HeuristicOpponent::new(Difficulty::Medium);
        let chosen = opponent.choose(red(&state), die(2), &state, &mut StdRng::seed_from_u64(1));
        assert_eq!(chosen, Some(hunter));
    }

    #[test]
    fn test_deep_capture_bonus() {
        let mut state = table();
        let hunter = TokenId::new(Color::Red, 0);
        state.place_token(hunter, TokenState::at_progress(30));
        state.place_token(TokenId::new(Color::Red, 1), TokenState::at_progress(3));
        // Blue progress 45 sits on absolute 32.
        state.place_token(TokenId::new(Color::Blue, 0), TokenState::at_progress(45));

        let opponent = HeuristicOpponent::new(Difficulty::Medium);
        let scored = opponent.score_moves(red(&state), die(2), &state, &mut StdRng::seed_from_u64(0));
        let best = scored[0];
        assert_eq!(best.token, hunter);
        assert_eq!(best.reason, MoveReason::DeepCapture);
        assert!(best.score >= CAPTURE_BONUS + DEEP_CAPTURE_BONUS);
    }

    #[test]
    fn test_finish_dominates() {
        let mut state = table();
        let closer = TokenId::new(Color::Red, 0);
        state.place_token(closer, TokenState::at_progress(54));
        state.place_token(TokenId::new(Color::Red, 1), TokenState::at_progress(10));

        let opponent = HeuristicOpponent::new(Difficulty::Medium);
        let scored = opponent.score_moves(red(&state), die(3), &state, &mut StdRng::seed_from_u64(0));
        assert_eq!(scored[0].token, closer);
        assert_eq!(scored[0].reason, MoveReason::Finish);
        // 5 advancement + 40 + 50 stretch + 200 finish.
        assert_eq!(scored[0].score, 5 * 5 + STRETCH_BONUS + 5 * STRETCH_STEP_BONUS + FINISH_BONUS);
    }

    #[test]
    fn test_danger_counts_opponents_behind() {
        let mut state = table();
        // Green progress 40 sits on absolute 1, two squares behind absolute 3.
        state.place_token(TokenId::new(Color::Green, 0), TokenState::at_progress(40));
        assert_eq!(danger(3, Color::Red, &state), 5 * DANGER_WEIGHT);
        // Ahead of the landing square is harmless.
        assert_eq!(danger(51, Color::Red, &state), 0);
        // Safe squares and the stretch carry no threat.
        assert_eq!(danger(8, Color::Red, &state), 0);
        assert_eq!(danger(53, Color::Red, &state), 0);
    }

    #[test]
    fn test_single_legal_move_skips_scoring() {
        let mut state = table();
        let only = TokenId::new(Color::Red, 2);
        state.place_token(only, TokenState::at_progress(12));

        let opponent = HeuristicOpponent::new(Difficulty::Easy);
        assert_eq!(opponent.choose(red(&state), die(4), &state, &mut StdRng::seed_from_u64(9)), Some(only));
    }

    #[test]
    fn test_no_legal_move() {
        let state = table();
        let opponent = HeuristicOpponent::new(Difficulty::Easy);
        assert_eq!(opponent.choose(red(&state), die(3), &state, &mut StdRng::seed_from_u64(9)), None);
    }
}
