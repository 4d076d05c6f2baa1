//! Die faces, dice sources, and the per-turn dice state.

use derive_getters::Getters;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, instrument};

/// A single die face, always in `1..=6`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct DieValue(u8);

impl DieValue {
    /// The face that launches tokens and grants another roll.
    pub const SIX: DieValue = DieValue(6);

    /// Wraps a face, rejecting anything outside `1..=6`.
    pub const fn new(face: u8) -> Option<Self> {
        if face >= 1 && face <= 6 {
            Some(Self(face))
        } else {
            None
        }
    }

    /// The face as a number of steps.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Whether this is a six.
    pub const fn is_six(self) -> bool {
        self.0 == 6
    }
}

impl TryFrom<u8> for DieValue {
    type Error = String;

    fn try_from(face: u8) -> Result<Self, Self::Error> {
        Self::new(face).ok_or_else(|| format!("die face {face} outside 1..=6"))
    }
}

impl From<DieValue> for u8 {
    fn from(value: DieValue) -> Self {
        value.0
    }
}

/// Source of die rolls.
pub trait Dice: Send {
    /// Rolls once.
    fn roll(&mut self) -> DieValue;
}

/// Uniform die backed by any random number generator.
#[derive(Debug, Clone)]
pub struct FairDice<R> {
    rng: R,
}

impl<R: Rng> FairDice<R> {
    /// Wraps a random number generator.
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng + Send> Dice for FairDice<R> {
    fn roll(&mut self) -> DieValue {
        DieValue(self.rng.random_range(1..=6))
    }
}

/// Replays a fixed script of faces, starting over once exhausted.
#[derive(Debug, Clone)]
pub struct LoadedDice {
    script: Vec<DieValue>,
    pending: VecDeque<DieValue>,
}

impl LoadedDice {
    /// Builds a script from raw faces.
    ///
    /// Returns `None` if the script is empty or holds a face outside `1..=6`.
    #[instrument]
    pub fn from_faces(faces: &[u8]) -> Option<Self> {
        let script = faces
            .iter()
            .map(|&face| DieValue::new(face))
            .collect::<Option<Vec<_>>>()?;
        if script.is_empty() {
            return None;
        }
        Some(Self {
            pending: script.iter().copied().collect(),
            script,
        })
    }
}

impl Dice for LoadedDice {
    fn roll(&mut self) -> DieValue {
        if self.pending.is_empty() {
            debug!(len = self.script.len(), "Dice script exhausted, replaying");
            self.pending.extend(self.script.iter().copied());
        }
        // Refilled above from a non-empty script.
        self.pending.pop_front().unwrap_or(DieValue::SIX)
    }
}

/// Dice state of the player whose turn it is.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct DiceState {
    /// Last rolled face, `None` while no roll is active.
    value: Option<DieValue>,
    /// The die is animating.
    rolling: bool,
    /// A roll request would be accepted.
    can_roll: bool,
    /// Sixes rolled in a row during this turn.
    six_streak: u8,
}

impl DiceState {
    /// Fresh dice for the start of a turn.
    pub fn new() -> Self {
        Self {
            value: None,
            rolling: false,
            can_roll: true,
            six_streak: 0,
        }
    }

    /// Face value with `0` standing for "no active roll".
    pub fn face(&self) -> u8 {
        self.value.map_or(0, DieValue::get)
    }

    pub(crate) fn start_rolling(&mut self) {
        self.rolling = true;
        self.can_roll = false;
    }

    /// Records a landed face and returns the updated six streak.
    pub(crate) fn land(&mut self, value: DieValue) -> u8 {
        self.value = Some(value);
        self.rolling = false;
        self.can_roll = false;
        self.six_streak = if value.is_six() { self.six_streak + 1 } else { 0 };
        self.six_streak
    }

    /// Clears the face for another roll by the same player.
    ///
    /// The streak carries over; [`DiceState::land`] already zeroed it on a non-six.
    pub(crate) fn grant_reroll(&mut self) {
        self.value = None;
        self.rolling = false;
        self.can_roll = true;
    }

    pub(crate) fn freeze(&mut self) {
        self.can_roll = false;
    }
}

impl Default for DiceState {
    fn default() -> Self {
        Self::new()
    }
}
