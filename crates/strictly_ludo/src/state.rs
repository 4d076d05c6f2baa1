//! Complete game state.

use super::action::MoveRecord;
use super::dice::DiceState;
use super::phases::Outcome;
use super::player::Player;
use super::token::{Token, TokenId};
use super::{Color, PlayerKind};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Everything the rules need to know about a game in progress.
///
/// Rule functions take a `&GameState` and produce a new one; only the turn
/// controller keeps a state it mutates.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameState {
    /// Seated players in seating order.
    players: Vec<Player>,
    /// Index into `players` of whoever is to act.
    current: usize,
    /// Dice of the current player.
    dice: DiceState,
    /// Append-only history of applied moves.
    log: Vec<MoveRecord>,
    /// Tokens captured by the latest move, for animation.
    last_captured: Vec<TokenId>,
    /// Set once a player finishes all four tokens.
    outcome: Option<Outcome>,
    /// Self-scheduled actions are frozen.
    paused: bool,
}

impl GameState {
    /// Seats players in the given order, all tokens in base.
    ///
    /// # Panics
    ///
    /// Panics if a color appears twice.
    #[instrument]
    pub fn new(seats: &[(Color, PlayerKind)]) -> Self {
        let mut players: Vec<Player> = Vec::with_capacity(seats.len());
        for &(color, kind) in seats {
            assert!(
                players.iter().all(|p| *p.color() != color),
                "{color} seated twice"
            );
            players.push(Player::new(color, kind));
        }
        Self {
            players,
            current: 0,
            dice: DiceState::new(),
            log: Vec::new(),
            last_captured: Vec::new(),
            outcome: None,
            paused: false,
        }
    }

    /// Player whose turn it is.
    pub fn current_player(&self) -> &Player {
        &self.players[self.current]
    }

    /// Whether it is `color`'s turn.
    pub fn is_players_turn(&self, color: Color) -> bool {
        *self.current_player().color() == color
    }

    /// Seated player of the given color.
    pub fn player(&self, color: Color) -> Option<&Player> {
        self.players.iter().find(|p| *p.color() == color)
    }

    /// Looks up a token by id among seated players.
    pub fn token(&self, id: TokenId) -> Option<&Token> {
        self.player(id.color).map(|p| p.token(id.slot))
    }

    /// Every seated token.
    pub fn tokens(&self) -> impl Iterator<Item = &Token> {
        self.players.iter().flat_map(|p| p.tokens().iter())
    }

    /// Whether a player has won.
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Winning color, once the game is over.
    pub fn winner(&self) -> Option<Color> {
        self.outcome.as_ref().map(|o| o.winner)
    }

    /// Final ranking; empty while the game runs.
    pub fn ranking(&self) -> &[Color] {
        match &self.outcome {
            Some(outcome) => &outcome.ranking,
            None => &[],
        }
    }

    pub(crate) fn player_mut(&mut self, color: Color) -> Option<&mut Player> {
        self.players.iter_mut().find(|p| *p.color() == color)
    }

    pub(crate) fn players_mut(&mut self) -> &mut [Player] {
        &mut self.players
    }

    pub(crate) fn dice_mut(&mut self) -> &mut DiceState {
        &mut self.dice
    }

    pub(crate) fn push_record(&mut self, record: MoveRecord) {
        self.log.push(record);
    }

    pub(crate) fn pop_record(&mut self) -> Option<MoveRecord> {
        self.log.pop()
    }

    pub(crate) fn set_last_captured(&mut self, tokens: Vec<TokenId>) {
        self.last_captured = tokens;
    }

    pub(crate) fn set_outcome(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
    }

    pub(crate) fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Hands the turn to the next seat with fresh dice.
    pub(crate) fn rotate(&mut self) {
        self.current = (self.current + 1) % self.players.len();
        self.dice = DiceState::new();
    }

    /// Places a token directly, bypassing the rules.
    ///
    /// Meant for setting up positions in tests and tooling; the finished count
    /// is kept consistent.
    ///
    /// # Panics
    ///
    /// Panics if the token's color is not seated.
    pub fn place_token(&mut self, id: TokenId, state: crate::TokenState) {
        let player = self
            .player_mut(id.color)
            .unwrap_or_else(|| panic!("{} is not seated", id.color));
        player.token_mut(id.slot).set_state(state);
        player.recount_finished();
    }

    /// Sets whose turn it is, with fresh dice.
    ///
    /// # Panics
    ///
    /// Panics if the color is not seated.
    pub fn set_current(&mut self, color: Color) {
        let index = self
            .players
            .iter()
            .position(|p| *p.color() == color)
            .unwrap_or_else(|| panic!("{color} is not seated"));
        self.current = index;
        self.dice = DiceState::new();
    }
}
