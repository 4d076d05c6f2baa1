//! Interactive game in the terminal, in real time.
//!
//! The controller keeps virtual milliseconds; this loop ties them to the
//! wall clock by advancing the controller to the elapsed time on every tick
//! and polling the keyboard no longer than the next deadline.

use crate::render;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::collections::VecDeque;
use std::io;
use std::time::{Duration, Instant};
use strictly_ludo::{GameEvent, GameSettings, Timings, TokenId, TurnController};
use tokio::sync::mpsc;
use tracing::{debug, info, instrument};

/// Longest wait for a key before the clock is advanced again.
const TICK: Duration = Duration::from_millis(100);

/// Event lines kept for the log panel.
const LOG_LINES: usize = 64;

/// A key the player pressed, as a game command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    /// Roll the die.
    Roll,
    /// Move the token in this slot.
    Move(u8),
    /// Freeze the game.
    Pause,
    /// Continue after a pause.
    Resume,
    /// Drop the last move-log entry.
    Undo,
    /// Flip the sound flag.
    Sound,
    /// Abandon the game and start a fresh one with the same settings.
    Restart,
    /// Leave.
    Quit,
}

impl Input {
    /// Maps a key to a command; `None` for unbound keys.
    pub fn from_key(code: KeyCode) -> Option<Self> {
        let input = match code {
            KeyCode::Char('r') | KeyCode::Char(' ') | KeyCode::Enter => Input::Roll,
            KeyCode::Char('p') => Input::Pause,
            KeyCode::Char('c') => Input::Resume,
            KeyCode::Char('u') => Input::Undo,
            KeyCode::Char('s') => Input::Sound,
            KeyCode::Char('n') => Input::Restart,
            KeyCode::Char('q') | KeyCode::Esc => Input::Quit,
            KeyCode::Char(c @ '0'..='3') => Input::Move(c as u8 - b'0'),
            _ => return None,
        };
        Some(input)
    }
}

/// Runs the game on the alternate screen until the player quits.
#[instrument(skip(settings, timings))]
pub async fn run(settings: GameSettings, timings: Timings, seed: u64) -> Result<()> {
    let mut controller = TurnController::seeded(seed, timings);
    let (tx, events) = mpsc::unbounded_channel();
    controller.attach_events(tx);
    controller.initialize(settings.clone())?;
    info!(seed, "Game started");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, controller, settings, events).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    res
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut controller: TurnController,
    settings: GameSettings,
    mut events: mpsc::UnboundedReceiver<GameEvent>,
) -> Result<()> {
    let snapshots = controller.subscribe();
    let start = Instant::now();
    let elapsed = || start.elapsed().as_millis() as u64;
    let mut log: VecDeque<String> = VecDeque::new();

    loop {
        controller.advance_to(elapsed());
        while let Ok(event) = events.try_recv() {
            if let Some(line) = render::event(&event) {
                push_line(&mut log, line);
            }
        }

        let snapshot = snapshots.borrow().clone();
        terminal.draw(|f| render::draw(f, &snapshot, &log))?;

        let wait = controller.next_due().map_or(TICK, |due| {
            Duration::from_millis(due.saturating_sub(elapsed())).min(TICK)
        });
        if !event::poll(wait)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(input) = Input::from_key(key.code) else {
            debug!(code = ?key.code, "Unbound key");
            continue;
        };

        controller.advance_to(elapsed());
        match input {
            Input::Quit => {
                info!("Player quit");
                return Ok(());
            }
            Input::Roll => controller.request_roll(),
            Input::Move(slot) => {
                if let Some(player) = controller.current_player() {
                    let token = TokenId::new(*player.color(), slot);
                    controller.request_move(token);
                }
            }
            Input::Pause => controller.pause(),
            Input::Resume => controller.resume(),
            Input::Undo => {
                if let Some(record) = controller.undo_last_log_entry() {
                    push_line(&mut log, format!("Removed from log: {record}"));
                }
            }
            Input::Sound => {
                let enabled = !controller.sound_enabled();
                controller.set_sound_enabled(enabled);
            }
            Input::Restart => {
                controller.reset();
                controller.initialize(settings.clone())?;
                log.clear();
            }
        }
    }
}

fn push_line(log: &mut VecDeque<String>, line: String) {
    if log.len() == LOG_LINES {
        log.pop_front();
    }
    log.push_back(line);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_map_to_commands() {
        assert_eq!(Input::from_key(KeyCode::Char('r')), Some(Input::Roll));
        assert_eq!(Input::from_key(KeyCode::Enter), Some(Input::Roll));
        assert_eq!(Input::from_key(KeyCode::Char('2')), Some(Input::Move(2)));
        assert_eq!(Input::from_key(KeyCode::Char('p')), Some(Input::Pause));
        assert_eq!(Input::from_key(KeyCode::Esc), Some(Input::Quit));
    }

    #[test]
    fn test_unbound_keys_are_ignored() {
        assert_eq!(Input::from_key(KeyCode::Char('4')), None);
        assert_eq!(Input::from_key(KeyCode::Char('x')), None);
        assert_eq!(Input::from_key(KeyCode::Tab), None);
    }

    #[test]
    fn test_log_keeps_latest_lines() {
        let mut log = VecDeque::new();
        for i in 0..LOG_LINES + 5 {
            push_line(&mut log, i.to_string());
        }
        assert_eq!(log.len(), LOG_LINES);
        assert_eq!(log.front().map(String::as_str), Some("5"));
    }
}
