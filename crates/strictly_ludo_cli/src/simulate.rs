//! Machine-only games in virtual time.

use anyhow::{Result, bail};
use derive_getters::Getters;
use serde::Serialize;
use std::collections::BTreeMap;
use strictly_ludo::{Color, GameEvent, GameMode, GameSettings, Timings, TurnController};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Upper bound on fired actions per game before it is declared stuck.
const MAX_STEPS: usize = 500_000;

/// How one game went.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct GameSummary {
    /// Seed the game was played with.
    seed: u64,
    /// Winning color.
    winner: Color,
    /// Every color, winner first.
    ranking: Vec<Color>,
    /// Applied moves.
    moves: usize,
    /// Moves that sent tokens home.
    captures: usize,
    /// Turns that passed without a move.
    skipped_turns: usize,
    /// Virtual game length in milliseconds.
    duration_ms: u64,
}

/// Results of a batch of games.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize)]
pub struct SimulationReport {
    /// Per-game summaries in seed order.
    games: Vec<GameSummary>,
    /// Wins per color.
    wins: BTreeMap<Color, u32>,
}

impl SimulationReport {
    /// Mean number of moves per game.
    pub fn average_moves(&self) -> f64 {
        if self.games.is_empty() {
            return 0.0;
        }
        self.games.iter().map(|g| g.moves).sum::<usize>() as f64 / self.games.len() as f64
    }

    /// Human-readable summary.
    pub fn to_text(&self) -> String {
        let mut lines = vec![format!(
            "{} games, {:.1} moves on average",
            self.games.len(),
            self.average_moves()
        )];
        for (color, wins) in &self.wins {
            lines.push(format!("  {color}: {wins} wins"));
        }
        lines.join("\n")
    }
}

/// Plays one machine-only game to the end.
#[instrument(skip(settings, timings))]
pub fn play_one(settings: &GameSettings, timings: Timings, seed: u64) -> Result<GameSummary> {
    let mut controller = TurnController::seeded(seed, timings);
    let (tx, mut events) = mpsc::unbounded_channel();
    controller.attach_events(tx);
    controller.initialize(machines_only(settings))?;

    let (mut moves, mut captures, mut skipped_turns) = (0, 0, 0);
    for _ in 0..MAX_STEPS {
        if !controller.step() {
            bail!("game with seed {seed} stalled");
        }
        while let Ok(event) = events.try_recv() {
            match event {
                GameEvent::Moved { record } => {
                    moves += 1;
                    if record.was_capture() {
                        captures += 1;
                    }
                }
                GameEvent::TurnSkipped { .. } | GameEvent::TurnForfeited { .. } => {
                    skipped_turns += 1
                }
                GameEvent::GameOver { outcome } => {
                    debug!(%outcome, moves, "Game finished");
                    return Ok(GameSummary {
                        seed,
                        winner: outcome.winner,
                        ranking: outcome.ranking,
                        moves,
                        captures,
                        skipped_turns,
                        duration_ms: controller.now(),
                    });
                }
                _ => {}
            }
        }
    }
    bail!("game with seed {seed} did not finish in {MAX_STEPS} steps")
}

/// Plays `games` games with consecutive seeds starting at `seed`.
#[instrument(skip(settings, timings))]
pub fn run(settings: &GameSettings, timings: Timings, seed: u64, games: u32) -> Result<SimulationReport> {
    let mut summaries = Vec::with_capacity(games as usize);
    let mut wins: BTreeMap<Color, u32> = BTreeMap::new();
    for offset in 0..u64::from(games) {
        let summary = play_one(settings, timings, seed.wrapping_add(offset))?;
        *wins.entry(summary.winner).or_default() += 1;
        summaries.push(summary);
    }
    info!(games, "Simulation complete");
    Ok(SimulationReport {
        games: summaries,
        wins,
    })
}

fn machines_only(settings: &GameSettings) -> GameSettings {
    GameSettings::new(*settings.player_count(), GameMode::VsMachine, *settings.difficulty())
        .with_human_seats(Vec::new())
}
