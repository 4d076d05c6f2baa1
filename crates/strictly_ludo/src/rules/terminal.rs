//! Win detection and ranking.

use super::super::phases::Outcome;
use super::super::state::GameState;
use super::super::Color;
use tracing::{debug, instrument};

/// Seated colors ordered by finished tokens, most first.
///
/// The sort is stable, so seating order breaks ties.
pub fn standings(state: &GameState) -> Vec<Color> {
    let mut players: Vec<_> = state.players().iter().collect();
    players.sort_by(|a, b| b.finished_tokens().cmp(a.finished_tokens()));
    players.into_iter().map(|p| *p.color()).collect()
}

/// The outcome if some player has finished all four tokens.
#[instrument(skip(state))]
pub fn terminal(state: &GameState) -> Option<Outcome> {
    let winner = state.players().iter().find(|p| p.has_won())?;
    let winner = *winner.color();
    let mut ranking = standings(state);
    // Only one player can hold four finished tokens, so this is a no-op
    // unless the caller built an impossible position.
    ranking.retain(|c| *c != winner);
    ranking.insert(0, winner);
    debug!(%winner, ?ranking, "Terminal position");
    Some(Outcome { winner, ranking })
}
