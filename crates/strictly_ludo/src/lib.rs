//! Strictly Ludo - a four-player Ludo rules engine and turn controller.
//!
//! # Architecture
//!
//! - **Board**: ring and home-stretch topology plus a 15×15 grid projection
//! - **Rules**: pure functions for legality, captures, moves, extra turns and
//!   game end, guarded by first-class invariants and contracts
//! - **Opponent**: heuristic move scoring for machine seats
//! - **Controller**: the single writer of game state; delays run on an
//!   injectable scheduler and state is published as snapshots
//!
//! # Example
//!
//! ```
//! use strictly_ludo::{Difficulty, GameMode, GameSettings, Timings, TurnController};
//!
//! let mut controller = TurnController::seeded(7, Timings::default());
//! controller
//!     .initialize(GameSettings::new(2, GameMode::Local, Difficulty::Medium))
//!     .expect("two players is a valid table");
//! controller.request_roll();
//! controller.advance(600);
//! assert!(controller.game().unwrap().dice().value().is_some());
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod action;
pub mod board;
mod contracts;
mod controller;
mod dice;
mod events;
pub mod invariants;
mod opponent;
mod phases;
mod player;
pub mod rules;
mod scheduler;
mod settings;
mod state;
mod token;
mod types;

// Crate-level exports - Domain types
pub use types::{Color, Difficulty, GameMode, PlayerKind, Screen};

// Crate-level exports - Board pieces
pub use board::Cell;
pub use player::Player;
pub use state::GameState;
pub use token::{Token, TokenId, TokenState};

// Crate-level exports - Dice
pub use dice::{Dice, DiceState, DieValue, FairDice, LoadedDice};

// Crate-level exports - Moves and phases
pub use action::{Move, MoveError, MoveRecord};
pub use phases::{Outcome, SkipReason, TurnPhase};

// Crate-level exports - Contracts
pub use contracts::{Contract, GameRunning, MoveContract, OwnToken, assert_invariants};

// Crate-level exports - Opponent
pub use opponent::{HeuristicOpponent, MoveReason, ScoredMove, danger};

// Crate-level exports - Controller
pub use controller::TurnController;
pub use events::{GameEvent, Snapshot};
pub use scheduler::{ScheduledAction, Scheduler, VirtualScheduler};
pub use settings::{GameSettings, SetupError, Timings};
