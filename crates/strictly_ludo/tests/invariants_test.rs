//! Whole machine-only games checked against the state invariants.

use strictly_ludo::board::{FINISH, HOME_STRETCH_START, LAST_RING_PROGRESS};
use strictly_ludo::invariants::{InvariantSet, LudoInvariants};
use strictly_ludo::{
    Color, Difficulty, GameEvent, GameMode, GameSettings, GameState, Timings, TokenState,
    TurnController,
};
use tokio::sync::mpsc;

const MAX_STEPS: usize = 200_000;

fn machines(players: usize, difficulty: Difficulty) -> GameSettings {
    // No human seat: every color is played by the opponent.
    GameSettings::new(players, GameMode::VsMachine, difficulty).with_human_seats(Vec::new())
}

fn check_state(state: &GameState) {
    if let Err(violations) = LudoInvariants::check_all(state) {
        panic!("invariants violated: {violations:?}");
    }
    for token in state.tokens() {
        match token.state() {
            TokenState::AtBase => assert!(!token.is_finished()),
            TokenState::Finished => assert_eq!(token.progress(), Some(FINISH)),
            TokenState::OnRing { progress } => assert!(progress <= LAST_RING_PROGRESS),
            TokenState::InStretch { progress } => {
                assert!((HOME_STRETCH_START..FINISH).contains(&progress))
            }
        }
    }
}

/// Plays one seeded game to the end, checking every intermediate state.
fn play_out(seed: u64, players: usize, difficulty: Difficulty) -> GameState {
    let mut ctl = TurnController::seeded(seed, Timings::default());
    let (tx, mut rx) = mpsc::unbounded_channel();
    ctl.attach_events(tx);
    ctl.initialize(machines(players, difficulty)).unwrap();

    let mut moves = 0;
    for _ in 0..MAX_STEPS {
        assert!(ctl.step(), "machine game stalled");
        while let Ok(event) = rx.try_recv() {
            if matches!(event, GameEvent::Moved { .. }) {
                moves += 1;
            }
        }
        let state = ctl.game().unwrap();
        check_state(state);
        assert_eq!(state.log().len(), moves, "log length tracks applied moves");
        if state.is_over() {
            return state.clone();
        }
    }
    panic!("game with seed {seed} did not finish in {MAX_STEPS} steps");
}

#[test]
fn test_random_games_keep_invariants() {
    for seed in 0..6 {
        for players in 2..=4 {
            let difficulty = if seed % 2 == 0 {
                Difficulty::Medium
            } else {
                Difficulty::Easy
            };
            let state = play_out(seed, players, difficulty);

            let winners: Vec<Color> = state
                .players()
                .iter()
                .filter(|p| *p.finished_tokens() == 4)
                .map(|p| *p.color())
                .collect();
            assert_eq!(winners.len(), 1, "exactly one winner");
            assert_eq!(state.winner(), Some(winners[0]));
            assert_eq!(state.ranking().len(), players);
            assert_eq!(state.ranking()[0], winners[0]);
        }
    }
}

#[test]
fn test_seeded_games_are_reproducible() {
    let a = play_out(42, 4, Difficulty::Easy);
    let b = play_out(42, 4, Difficulty::Easy);
    assert_eq!(a.log(), b.log());
    assert_eq!(a.winner(), b.winner());
}

#[test]
fn test_ranking_is_sorted_by_finished_tokens() {
    let state = play_out(7, 4, Difficulty::Medium);
    let finished: Vec<u8> = state
        .ranking()
        .iter()
        .map(|&c| *state.player(c).unwrap().finished_tokens())
        .collect();
    assert!(finished.windows(2).all(|w| w[0] >= w[1]));
}
