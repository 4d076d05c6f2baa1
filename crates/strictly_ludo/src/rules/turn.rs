//! Extra-turn policy.

use super::super::dice::DieValue;
use tracing::instrument;

/// Sixes in a row that forfeit the turn.
pub const MAX_SIXES: u8 = 3;

/// Whether a six streak has reached the forfeit threshold.
pub fn forfeits_turn(six_streak: u8) -> bool {
    six_streak >= MAX_SIXES
}

/// Whether the same player rolls again after a move.
///
/// `six_streak` counts the roll that was just spent. A six or a capture
/// grants another roll; a streak at the threshold never does.
#[instrument(level = "trace")]
pub fn extra_turn(die: DieValue, captured: bool, six_streak: u8) -> bool {
    if die.is_six() && forfeits_turn(six_streak) {
        return false;
    }
    die.is_six() || captured
}
