//! Game rules for Ludo.
//!
//! Pure functions over [`GameState`](crate::GameState): legality, capture,
//! move application, extra-turn policy, and terminal detection. Rules are
//! kept apart from the controller so they can be composed into contracts and
//! tested without timers.

pub mod apply;
pub mod capture;
pub mod legal;
pub mod terminal;
pub mod turn;

pub use apply::{MoveOutcome, apply_move};
pub use capture::{capture_at, capture_on_arrival};
pub use legal::{any_legal, check_legal, is_legal, legal_tokens, next_progress};
pub use terminal::{standings, terminal};
pub use turn::{MAX_SIXES, extra_turn, forfeits_turn};
