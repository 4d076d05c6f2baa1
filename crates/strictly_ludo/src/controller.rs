//! The turn controller: single owner of the mutable game.
//!
//! Front ends send requests (`request_roll`, `request_move`, ...) and read
//! [`Snapshot`]s. Every delay is a [`ScheduledAction`] on the controller's
//! [`Scheduler`]; nothing happens between requests until the host calls
//! [`TurnController::advance`].
//!
//! Requests that do not fit the current phase are ignored without a state
//! change. Broken invariants panic.

use super::action::{Move, MoveRecord};
use super::contracts::assert_invariants;
use super::dice::{Dice, FairDice};
use super::events::{GameEvent, Snapshot};
use super::opponent::HeuristicOpponent;
use super::phases::{SkipReason, TurnPhase};
use super::player::Player;
use super::rules::{apply_move, extra_turn, forfeits_turn, legal_tokens, terminal};
use super::scheduler::{ScheduledAction, Scheduler, VirtualScheduler};
use super::settings::{GameSettings, SetupError, Timings};
use super::token::TokenId;
use super::{Color, GameState, Screen};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

/// Owns the game state and drives turns.
pub struct TurnController {
    game: Option<GameState>,
    phase: TurnPhase,
    settings: GameSettings,
    timings: Timings,
    opponent: HeuristicOpponent,
    dice: Box<dyn Dice>,
    rng: Box<dyn RngCore + Send>,
    scheduler: Box<dyn Scheduler>,
    screen: Screen,
    sound_enabled: bool,
    snapshots: watch::Sender<Snapshot>,
    events: Option<mpsc::UnboundedSender<GameEvent>>,
}

impl TurnController {
    /// Creates an idle controller on a virtual clock.
    ///
    /// `dice` supplies every roll; `rng` feeds the opponent's noise.
    pub fn new(
        dice: impl Dice + 'static,
        rng: impl RngCore + Send + 'static,
        timings: Timings,
    ) -> Self {
        let (snapshots, _) = watch::channel(Snapshot::empty());
        Self {
            game: None,
            phase: TurnPhase::Idle,
            settings: GameSettings::default(),
            timings,
            opponent: HeuristicOpponent::default(),
            dice: Box::new(dice),
            rng: Box::new(rng),
            scheduler: Box::new(VirtualScheduler::new()),
            screen: Screen::default(),
            sound_enabled: true,
            snapshots,
            events: None,
        }
    }

    /// Fair dice and opponent noise derived from one seed.
    pub fn seeded(seed: u64, timings: Timings) -> Self {
        Self::new(
            FairDice::new(StdRng::seed_from_u64(seed)),
            StdRng::seed_from_u64(seed.wrapping_add(1)),
            timings,
        )
    }

    /// Replaces the scheduler; pending actions of the old one are dropped.
    pub fn with_scheduler(mut self, scheduler: impl Scheduler + 'static) -> Self {
        self.scheduler = Box::new(scheduler);
        self
    }

    /// Sends every subsequent [`GameEvent`] to `tx`.
    pub fn attach_events(&mut self, tx: mpsc::UnboundedSender<GameEvent>) {
        self.events = Some(tx);
    }

    /// Receiver that always holds the latest snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.snapshots.subscribe()
    }

    // ─────────────────────────────────────────────────────────────
    //  Requests
    // ─────────────────────────────────────────────────────────────

    /// Starts a new game, discarding any current one.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the player count is outside `2..=4`.
    #[instrument(skip(self), fields(players = settings.player_count(), mode = ?settings.mode()))]
    pub fn initialize(&mut self, settings: GameSettings) -> Result<(), SetupError> {
        let seats = settings.seats()?;
        self.scheduler.clear();
        self.opponent = HeuristicOpponent::new(*settings.difficulty());
        self.settings = settings;
        self.game = Some(GameState::new(&seats));
        self.phase = TurnPhase::AwaitingRoll;
        self.screen = Screen::Game;
        info!(?seats, "Game initialized");
        self.schedule_machine_roll();
        self.publish();
        Ok(())
    }

    /// Replaces the board with a prepared position, `current` to roll.
    ///
    /// Meant for puzzles, tests and tooling. The move log of `state` is kept.
    ///
    /// # Panics
    ///
    /// Panics if no game is running or `state` breaks a state invariant.
    #[instrument(skip(self, state))]
    pub fn load_position(&mut self, mut state: GameState, current: Color) {
        assert!(self.game.is_some(), "load_position before initialize");
        state.set_current(current);
        assert_invariants(&state);
        self.scheduler.clear();
        self.game = Some(state);
        self.phase = TurnPhase::AwaitingRoll;
        self.schedule_machine_roll();
        self.publish();
    }

    /// Rolls for the current human player.
    #[instrument(skip(self), fields(phase = self.phase.label()))]
    pub fn request_roll(&mut self) {
        if !self.accepts_human_request() || self.phase != TurnPhase::AwaitingRoll {
            debug!("Roll request ignored");
            return;
        }
        self.begin_roll();
        self.publish();
    }

    /// Moves `token` for the current human player.
    #[instrument(skip(self), fields(phase = self.phase.label()))]
    pub fn request_move(&mut self, token: TokenId) {
        if !self.accepts_human_request() || !self.phase.legal_tokens().contains(&token) {
            debug!("Move request ignored");
            return;
        }
        self.play_move(token);
        self.publish();
    }

    /// Freezes self-scheduled actions and ignores requests until `resume`.
    #[instrument(skip(self))]
    pub fn pause(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if *game.paused() || self.phase == TurnPhase::GameOver {
            return;
        }
        game.set_paused(true);
        self.scheduler.clear();
        info!(phase = self.phase.label(), "Paused");
        self.emit(GameEvent::Paused);
        self.publish();
    }

    /// Lifts a pause and re-queues whatever was pending with a fresh delay.
    #[instrument(skip(self))]
    pub fn resume(&mut self) {
        let Some(game) = self.game.as_mut() else {
            return;
        };
        if !*game.paused() {
            return;
        }
        game.set_paused(false);
        if let Some(action) = self.pending_action() {
            debug!(%action, "Rehydrating pending action");
            self.scheduler.schedule(*self.timings.resume_ms(), action);
        }
        info!(phase = self.phase.label(), "Resumed");
        self.emit(GameEvent::Resumed);
        self.publish();
    }

    /// Discards the game and returns to the menu.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        self.scheduler.clear();
        self.game = None;
        self.phase = TurnPhase::Idle;
        self.screen = Screen::Home;
        info!("Game reset");
        self.emit(GameEvent::Reset);
        self.publish();
    }

    /// Stores the sound flag for front ends; the engine makes no sound.
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        self.sound_enabled = enabled;
        self.publish();
    }

    /// Stores which screen the front end should show.
    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
        self.publish();
    }

    /// Drops the newest move-log entry. The board is left as it is.
    #[instrument(skip(self))]
    pub fn undo_last_log_entry(&mut self) -> Option<MoveRecord> {
        let record = self.game.as_mut()?.pop_record();
        if let Some(record) = &record {
            debug!(%record, "Log entry removed");
        }
        self.publish();
        record
    }

    // ─────────────────────────────────────────────────────────────
    //  Time
    // ─────────────────────────────────────────────────────────────

    /// Moves the clock forward by `ms`, firing everything that falls due.
    pub fn advance(&mut self, ms: u64) {
        let target = self.scheduler.now() + ms;
        self.advance_to(target);
    }

    /// Moves the clock to `at`, firing everything due by then in order.
    ///
    /// Actions scheduled by fired actions run too if they fall due by `at`.
    pub fn advance_to(&mut self, at: u64) {
        while let Some(action) = self.scheduler.pop_due(at) {
            self.fire(action);
        }
        self.scheduler.advance_clock(at);
        self.publish();
    }

    /// Jumps to the next deadline and fires it. Returns `false` when nothing
    /// is pending.
    pub fn step(&mut self) -> bool {
        match self.scheduler.next_due() {
            Some(due) => {
                self.advance_to(due);
                true
            }
            None => false,
        }
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<u64> {
        self.scheduler.next_due()
    }

    /// Controller clock in milliseconds.
    pub fn now(&self) -> u64 {
        self.scheduler.now()
    }

    // ─────────────────────────────────────────────────────────────
    //  Queries
    // ─────────────────────────────────────────────────────────────

    /// The running game, if any.
    pub fn game(&self) -> Option<&GameState> {
        self.game.as_ref()
    }

    /// Current turn phase.
    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    /// Settings of the running game.
    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    /// Screen the front end should show.
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// Passthrough sound flag.
    pub fn sound_enabled(&self) -> bool {
        self.sound_enabled
    }

    /// Player whose turn it is.
    pub fn current_player(&self) -> Option<&Player> {
        self.game.as_ref().map(GameState::current_player)
    }

    /// Whether a game is running and it is `color`'s turn.
    pub fn is_players_turn(&self, color: Color) -> bool {
        self.game.as_ref().is_some_and(|g| g.is_players_turn(color))
    }

    /// Immutable view for one frame.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(
            self.game.clone(),
            self.phase.clone(),
            self.screen,
            self.sound_enabled,
            *self.settings.difficulty(),
            *self.settings.mode(),
            self.scheduler.now(),
        )
    }

    // ─────────────────────────────────────────────────────────────
    //  Transitions
    // ─────────────────────────────────────────────────────────────

    fn fire(&mut self, action: ScheduledAction) {
        let Some(game) = self.game.as_ref() else {
            debug!(%action, "Dropped: no game");
            return;
        };
        if *game.paused() {
            debug!(%action, "Dropped: paused");
            return;
        }
        let machine = game.current_player().is_machine();
        match action {
            ScheduledAction::FinishRoll if self.phase == TurnPhase::Rolling => self.finish_roll(),
            ScheduledAction::MachineRoll if machine && self.phase == TurnPhase::AwaitingRoll => {
                self.begin_roll()
            }
            ScheduledAction::MachineMove
                if machine && matches!(self.phase, TurnPhase::AwaitingMove { .. }) =>
            {
                self.machine_move()
            }
            ScheduledAction::AutoSkip if matches!(self.phase, TurnPhase::Skipping { .. }) => {
                self.pass_turn()
            }
            action => {
                warn!(%action, phase = self.phase.label(), "Stale scheduled action dropped")
            }
        }
    }

    fn begin_roll(&mut self) {
        let game = self.game_mut();
        game.dice_mut().start_rolling();
        self.phase = TurnPhase::Rolling;
        self.scheduler
            .schedule(*self.timings.roll_ms(), ScheduledAction::FinishRoll);
        debug!("Rolling");
    }

    fn finish_roll(&mut self) {
        let die = self.dice.roll();
        let game = self.game_mut();
        let streak = game.dice_mut().land(die);
        let player = game.current_player();
        let color = *player.color();
        let machine = player.is_machine();
        let legal = legal_tokens(player, die);
        debug!(%color, %die, streak, legal = legal.len(), "Die landed");
        self.emit(GameEvent::Rolled { color, die });

        if forfeits_turn(streak) {
            info!(%color, "Third six forfeits the turn");
            self.enter_skip(SkipReason::ThirdSix);
            self.emit(GameEvent::TurnForfeited { color });
        } else if legal.is_empty() {
            self.enter_skip(SkipReason::NoLegalMove);
            self.emit(GameEvent::TurnSkipped { color, die });
        } else {
            self.phase = TurnPhase::AwaitingMove { legal };
            if machine {
                let delay = self.timings.machine_move(*self.settings.difficulty());
                self.scheduler.schedule(delay, ScheduledAction::MachineMove);
            }
        }
    }

    fn enter_skip(&mut self, reason: SkipReason) {
        self.game_mut().dice_mut().freeze();
        self.phase = TurnPhase::Skipping { reason };
        self.scheduler
            .schedule(*self.timings.auto_skip_ms(), ScheduledAction::AutoSkip);
    }

    fn machine_move(&mut self) {
        let Some(game) = self.game.as_ref() else {
            return;
        };
        let Some(die) = *game.dice().value() else {
            panic!("machine move without a landed die");
        };
        let Some(token) = self
            .opponent
            .choose(game.current_player(), die, game, self.rng.as_mut())
        else {
            panic!("machine move with no legal token");
        };
        self.play_move(token);
    }

    fn play_move(&mut self, token: TokenId) {
        let now = self.scheduler.now();
        let game = self.game_mut();
        let color = *game.current_player().color();
        let Some(die) = *game.dice().value() else {
            panic!("move without a landed die");
        };
        let streak = *game.dice().six_streak();

        let outcome = apply_move(game, Move::new(color, token, die), now)
            .unwrap_or_else(|err| panic!("legal move {token} rejected: {err}"));
        let captured = !outcome.captured.is_empty();
        *game = outcome.state;
        let record = game.log().last().cloned();
        let over = terminal(game);
        if let Some(record) = record {
            self.emit(GameEvent::Moved { record });
        }
        if captured {
            self.emit(GameEvent::Captured {
                by: color,
                tokens: outcome.captured,
            });
        }

        if let Some(result) = over {
            let game = self.game_mut();
            game.set_outcome(result.clone());
            game.dice_mut().freeze();
            self.phase = TurnPhase::GameOver;
            self.screen = Screen::GameOver;
            self.scheduler.clear();
            info!(winner = %result.winner, "Game over");
            self.emit(GameEvent::GameOver { outcome: result });
            return;
        }

        if extra_turn(die, captured, streak) || outcome.finished_now {
            self.game_mut().dice_mut().grant_reroll();
            self.phase = TurnPhase::AwaitingRoll;
            debug!(%color, "Extra turn");
            self.emit(GameEvent::ExtraTurn { color });
            self.schedule_machine_roll();
        } else {
            self.pass_turn();
        }
    }

    fn pass_turn(&mut self) {
        let game = self.game_mut();
        let from = *game.current_player().color();
        game.rotate();
        let to = *game.current_player().color();
        self.phase = TurnPhase::AwaitingRoll;
        debug!(%from, %to, "Turn passed");
        self.emit(GameEvent::TurnPassed { from, to });
        self.schedule_machine_roll();
    }

    fn schedule_machine_roll(&mut self) {
        if self
            .game
            .as_ref()
            .is_some_and(|g| g.current_player().is_machine())
        {
            let delay = self.timings.think(*self.settings.difficulty());
            self.scheduler.schedule(delay, ScheduledAction::MachineRoll);
        }
    }

    /// Action that was pending in the current phase, for `resume`.
    fn pending_action(&self) -> Option<ScheduledAction> {
        let machine = self.game.as_ref()?.current_player().is_machine();
        match self.phase {
            TurnPhase::Rolling => Some(ScheduledAction::FinishRoll),
            TurnPhase::AwaitingRoll if machine => Some(ScheduledAction::MachineRoll),
            TurnPhase::AwaitingMove { .. } if machine => Some(ScheduledAction::MachineMove),
            TurnPhase::Skipping { .. } => Some(ScheduledAction::AutoSkip),
            _ => None,
        }
    }

    fn accepts_human_request(&self) -> bool {
        self.game
            .as_ref()
            .is_some_and(|g| !*g.paused() && !g.is_over() && !g.current_player().is_machine())
    }

    fn game_mut(&mut self) -> &mut GameState {
        let Some(game) = self.game.as_mut() else {
            panic!("transition without a game");
        };
        game
    }

    fn emit(&self, event: GameEvent) {
        if let Some(tx) = &self.events {
            if tx.send(event).is_err() {
                debug!("Event receiver dropped");
            }
        }
    }

    fn publish(&self) {
        self.snapshots.send_replace(self.snapshot());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Difficulty, GameMode, LoadedDice, PlayerKind, TokenState};
    use rand::rngs::StdRng;

    fn controller(faces: &[u8]) -> TurnController {
        TurnController::new(
            LoadedDice::from_faces(faces).unwrap(),
            StdRng::seed_from_u64(0),
            Timings::default(),
        )
    }

    fn local(players: usize) -> GameSettings {
        GameSettings::new(players, GameMode::Local, Difficulty::Medium)
    }

    #[test]
    fn test_initialize_seats_and_screen() {
        let mut ctl = controller(&[1]);
        ctl.initialize(local(2)).unwrap();
        let game = ctl.game().unwrap();
        assert_eq!(game.players().len(), 2);
        assert!(ctl.is_players_turn(Color::Red));
        assert_eq!(ctl.screen(), Screen::Game);
        assert_eq!(ctl.phase(), &TurnPhase::AwaitingRoll);
    }

    #[test]
    fn test_initialize_rejects_bad_count() {
        let mut ctl = controller(&[1]);
        assert!(ctl.initialize(local(1)).is_err());
        assert!(ctl.game().is_none());
    }

    #[test]
    fn test_roll_waits_for_animation() {
        let mut ctl = controller(&[6]);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        assert_eq!(ctl.phase(), &TurnPhase::Rolling);
        assert!(*ctl.game().unwrap().dice().rolling());

        ctl.advance(599);
        assert_eq!(ctl.phase(), &TurnPhase::Rolling);
        ctl.advance(1);
        assert_eq!(ctl.phase().legal_tokens().len(), 4);
        assert_eq!(ctl.game().unwrap().dice().face(), 6);
    }

    #[test]
    fn test_requests_out_of_phase_are_ignored() {
        let mut ctl = controller(&[6]);
        ctl.initialize(local(2)).unwrap();
        let before = ctl.snapshot();
        ctl.request_move(TokenId::new(Color::Red, 0));
        assert_eq!(ctl.snapshot(), before);

        ctl.request_roll();
        ctl.request_roll();
        assert_eq!(ctl.scheduler.pending(), 1);
    }

    #[test]
    fn test_move_outside_legal_set_is_ignored() {
        let mut ctl = controller(&[6]);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        ctl.advance(600);
        ctl.request_move(TokenId::new(Color::Yellow, 0));
        assert!(ctl.game().unwrap().log().is_empty());
    }

    #[test]
    fn test_no_legal_move_auto_skips() {
        let mut ctl = controller(&[3]);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        ctl.advance(600);
        assert_eq!(
            ctl.phase(),
            &TurnPhase::Skipping {
                reason: SkipReason::NoLegalMove
            }
        );
        ctl.advance(999);
        assert!(ctl.is_players_turn(Color::Red));
        ctl.advance(1);
        assert!(ctl.is_players_turn(Color::Yellow));
        assert_eq!(ctl.phase(), &TurnPhase::AwaitingRoll);
    }

    #[test]
    fn test_pause_freezes_and_resume_rehydrates() {
        let mut ctl = controller(&[3]);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        ctl.pause();
        ctl.advance(5_000);
        assert_eq!(ctl.phase(), &TurnPhase::Rolling);
        ctl.request_roll();
        assert_eq!(ctl.next_due(), None);

        ctl.resume();
        assert_eq!(ctl.next_due(), Some(ctl.now() + 500));
        ctl.advance(500);
        assert!(matches!(ctl.phase(), TurnPhase::Skipping { .. }));
    }

    #[test]
    fn test_reset_drops_pending_callbacks() {
        let mut ctl = controller(&[6]);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        ctl.reset();
        ctl.advance(10_000);
        assert!(ctl.game().is_none());
        assert_eq!(ctl.phase(), &TurnPhase::Idle);
        assert_eq!(ctl.screen(), Screen::Home);
    }

    #[test]
    fn test_machine_seat_plays_itself() {
        let mut ctl = controller(&[6, 4, 2]);
        let settings = GameSettings::new(2, GameMode::VsMachine, Difficulty::Medium)
            .with_human_seats(vec![Color::Yellow]);
        ctl.initialize(settings).unwrap();
        assert_eq!(
            ctl.current_player().map(|p| *p.kind()),
            Some(PlayerKind::Machine)
        );

        // Human requests on a machine turn are ignored.
        ctl.request_roll();
        assert_eq!(ctl.phase(), &TurnPhase::AwaitingRoll);

        // Think 1200, roll 600, move 600: launch on the six.
        ctl.advance(1200 + 600 + 600);
        let red0 = ctl.game().unwrap().token(TokenId::new(Color::Red, 0)).copied();
        assert_eq!(
            red0.map(|t| t.state()),
            Some(TokenState::OnRing { progress: 0 })
        );
        // The six grants another roll; the machine keeps going.
        ctl.advance(1200 + 600 + 600);
        assert_eq!(ctl.game().unwrap().log().len(), 2);
        assert!(ctl.is_players_turn(Color::Yellow));
    }

    #[test]
    fn test_undo_only_trims_log() {
        let mut ctl = controller(&[6]);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        ctl.advance(600);
        ctl.request_move(TokenId::new(Color::Red, 0));
        let record = ctl.undo_last_log_entry().unwrap();
        assert_eq!(*record.to(), 0);
        let game = ctl.game().unwrap();
        assert!(game.log().is_empty());
        assert!(!game.token(TokenId::new(Color::Red, 0)).unwrap().is_at_base());
    }

    #[test]
    fn test_subscribers_see_latest_snapshot() {
        let mut ctl = controller(&[6]);
        let rx = ctl.subscribe();
        ctl.initialize(local(3)).unwrap();
        ctl.set_sound_enabled(false);
        let snapshot = rx.borrow().clone();
        assert!(!snapshot.sound_enabled());
        assert_eq!(snapshot.game().as_ref().map(|g| g.players().len()), Some(3));
    }

    #[test]
    fn test_requests_publish_snapshots() {
        let mut ctl = controller(&[6]);
        ctl.initialize(local(2)).unwrap();
        let rx = ctl.subscribe();

        ctl.request_roll();
        assert_eq!(rx.borrow().phase(), &TurnPhase::Rolling);

        ctl.advance(600);
        ctl.request_move(TokenId::new(Color::Red, 0));
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.game().as_ref().map(|g| g.log().len()), Some(1));
        assert_eq!(snapshot.phase(), &TurnPhase::AwaitingRoll);
    }

    #[test]
    fn test_winning_move_is_published() {
        let mut ctl = controller(&[1]);
        ctl.initialize(local(2)).unwrap();
        let mut state = ctl.game().unwrap().clone();
        for slot in 0..3 {
            state.place_token(TokenId::new(Color::Yellow, slot), TokenState::Finished);
        }
        state.place_token(TokenId::new(Color::Yellow, 3), TokenState::at_progress(56));
        ctl.load_position(state, Color::Yellow);
        let rx = ctl.subscribe();

        ctl.request_roll();
        ctl.advance(600);
        ctl.request_move(TokenId::new(Color::Yellow, 3));
        let snapshot = rx.borrow().clone();
        assert_eq!(snapshot.phase(), &TurnPhase::GameOver);
        assert_eq!(snapshot.game().as_ref().and_then(|g| g.winner()), Some(Color::Yellow));
    }

    #[test]
    fn test_events_stream() {
        let mut ctl = controller(&[6, 1]);
        let (tx, mut rx) = mpsc::unbounded_channel();
        ctl.attach_events(tx);
        ctl.initialize(local(2)).unwrap();
        ctl.request_roll();
        ctl.advance(600);
        ctl.request_move(TokenId::new(Color::Red, 0));

        assert!(matches!(rx.try_recv(), Ok(GameEvent::Rolled { color: Color::Red, .. })));
        assert!(matches!(rx.try_recv(), Ok(GameEvent::Moved { .. })));
        assert_eq!(rx.try_recv(), Ok(GameEvent::ExtraTurn { color: Color::Red }));
    }
}
