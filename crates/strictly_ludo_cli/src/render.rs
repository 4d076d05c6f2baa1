//! Ludo board, status and event log rendering.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color as Hue, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::collections::{HashMap, VecDeque};
use strictly_ludo::board::{self, FINISH, GRID_SIZE, HOME_STRETCH_START, RING_LENGTH};
use strictly_ludo::{Cell, Color, GameEvent, GameState, Snapshot, TurnPhase};

/// Columns taken by the bordered board: two per cell plus the frame.
pub const BOARD_WIDTH: u16 = GRID_SIZE as u16 * 2 + 2;

/// Rows taken by the bordered board.
pub const BOARD_HEIGHT: u16 = GRID_SIZE as u16 + 2;

/// Key bindings shown under the board.
pub const HELP: &str =
    "r roll · 0-3 move token · p pause · c resume · u undo log · s sound · n new game · q quit";

/// Single-letter glyph of a color.
pub fn glyph(color: Color) -> char {
    match color {
        Color::Red => 'R',
        Color::Green => 'G',
        Color::Yellow => 'Y',
        Color::Blue => 'B',
    }
}

fn hue(color: Color) -> Hue {
    match color {
        Color::Red => Hue::Red,
        Color::Green => Hue::Green,
        Color::Yellow => Hue::Yellow,
        Color::Blue => Hue::Blue,
    }
}

/// What one grid cell shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    /// Character drawn in the cell.
    pub symbol: char,
    /// Color the cell belongs to, if any.
    pub owner: Option<Color>,
    /// Whether a token sits here.
    pub occupied: bool,
}

impl Tile {
    const EMPTY: Tile = Tile {
        symbol: ' ',
        owner: None,
        occupied: false,
    };

    fn style(self) -> Style {
        let style = match self.owner {
            Some(color) => Style::default().fg(hue(color)),
            None if self.symbol == '+' => Style::default().fg(Hue::Magenta),
            None => Style::default().fg(Hue::DarkGray),
        };
        if self.occupied {
            style.add_modifier(Modifier::BOLD)
        } else {
            style
        }
    }
}

/// Lays the game out on the 15×15 grid.
///
/// Ring squares are `.`, safe squares `*`, home stretches `=`, empty base
/// cells `o`. A token shows its color letter; several tokens of one color on
/// a cell show their count, mixed colors show `+`. Finished tokens are
/// counted in the status panel instead.
pub fn tiles(game: &GameState) -> Vec<Vec<Tile>> {
    let size = GRID_SIZE as usize;
    let mut grid = vec![vec![Tile::EMPTY; size]; size];
    let mut put = |cell: Cell, tile: Tile| grid[cell.row as usize][cell.col as usize] = tile;

    for square in 0..RING_LENGTH {
        let symbol = if board::is_safe(square) { '*' } else { '.' };
        put(
            board::ring_coord(square),
            Tile {
                symbol,
                ..Tile::EMPTY
            },
        );
    }
    for color in Color::ALL {
        let marked = |symbol| Tile {
            symbol,
            owner: Some(color),
            occupied: false,
        };
        for progress in HOME_STRETCH_START..FINISH {
            put(board::stretch_coord(progress, color), marked('='));
        }
        for slot in 0..4 {
            put(board::base_coord(color, slot), marked('o'));
        }
    }
    put(
        board::CENTER,
        Tile {
            symbol: '#',
            ..Tile::EMPTY
        },
    );

    let mut occupants: HashMap<Cell, (Color, u32, bool)> = HashMap::new();
    for token in game.tokens().filter(|t| !t.is_finished()) {
        let entry = occupants
            .entry(token.cell())
            .or_insert((token.color(), 0, false));
        entry.1 += 1;
        entry.2 |= entry.0 != token.color();
    }
    for (cell, (color, count, mixed)) in occupants {
        let tile = match (mixed, count) {
            (true, _) => Tile {
                symbol: '+',
                owner: None,
                occupied: true,
            },
            (false, n) => Tile {
                symbol: if n == 1 {
                    glyph(color)
                } else {
                    char::from_digit(n, 10).unwrap_or('*')
                },
                owner: Some(color),
                occupied: true,
            },
        };
        put(cell, tile);
    }
    grid
}

fn board_lines(game: &GameState) -> Vec<Line<'static>> {
    tiles(game)
        .into_iter()
        .map(|row| {
            let spans: Vec<Span<'static>> = row
                .into_iter()
                .map(|tile| Span::styled(format!("{} ", tile.symbol), tile.style()))
                .collect();
            Line::from(spans)
        })
        .collect()
}

/// Who is to act, the die, and what can be done.
pub fn status_lines(snapshot: &Snapshot) -> Vec<Line<'static>> {
    let Some(game) = snapshot.game() else {
        return vec![Line::from("No game in progress. Press n to start.")];
    };
    let mut lines = Vec::new();

    let home: Vec<Span<'static>> = game
        .players()
        .iter()
        .map(|p| {
            Span::styled(
                format!("{} {}/4  ", glyph(*p.color()), p.finished_tokens()),
                Style::default().fg(hue(*p.color())),
            )
        })
        .collect();
    let mut first = vec![Span::raw("Home: ")];
    first.extend(home);
    lines.push(Line::from(first));

    let player = game.current_player();
    let mut turn = vec![
        Span::styled(
            player.name().clone(),
            Style::default()
                .fg(hue(*player.color()))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" to play"),
    ];
    if let Some(die) = game.dice().value() {
        turn.push(Span::raw(format!(", rolled {die}")));
    }
    if *game.paused() {
        turn.push(Span::styled(
            " [paused]",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    lines.push(Line::from(turn));

    let prompt = match snapshot.phase() {
        TurnPhase::AwaitingRoll if !player.is_machine() => "Press r to roll.".to_string(),
        TurnPhase::AwaitingMove { legal } if !player.is_machine() => {
            let choices: Vec<String> = legal
                .iter()
                .map(|id| {
                    let at = game
                        .token(*id)
                        .and_then(|t| t.progress())
                        .map_or_else(|| "base".to_string(), |p| format!("step {p}"));
                    format!("{} ({at})", id.slot)
                })
                .collect();
            format!("Move which token? {}", choices.join(", "))
        }
        TurnPhase::Rolling => "Rolling...".to_string(),
        TurnPhase::Skipping { .. } => "No move, passing...".to_string(),
        TurnPhase::GameOver => {
            let ranking: Vec<&str> = game.ranking().iter().map(|c| c.label()).collect();
            format!("Game over. Ranking: {}", ranking.join(", "))
        }
        _ => "Machine is thinking...".to_string(),
    };
    lines.push(Line::from(prompt));
    lines
}

/// One line describing an event, or `None` for events not worth showing.
pub fn event(event: &GameEvent) -> Option<String> {
    let line = match event {
        GameEvent::Rolled { color, die } => format!("{color} rolled {die}"),
        GameEvent::Moved { record } => format!("{} {record}", record.color()),
        GameEvent::Captured { by, tokens } => {
            let victims: Vec<String> = tokens.iter().map(ToString::to_string).collect();
            format!("{by} sends {} home", victims.join(", "))
        }
        GameEvent::TurnSkipped { color, die } => format!("{color} cannot use {die}"),
        GameEvent::TurnForfeited { color } => format!("{color} rolled three sixes and forfeits"),
        GameEvent::TurnPassed { to, .. } => format!("{to}'s turn"),
        GameEvent::ExtraTurn { color } => format!("{color} rolls again"),
        GameEvent::Paused => "Paused".to_string(),
        GameEvent::Resumed => "Resumed".to_string(),
        GameEvent::GameOver { outcome } => format!("{outcome}!"),
        GameEvent::Reset => return None,
    };
    Some(line)
}

/// Draws one frame: board on the left, status and log on the right, keys
/// along the bottom.
pub fn draw(f: &mut Frame, snapshot: &Snapshot, log: &VecDeque<String>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(BOARD_HEIGHT), Constraint::Length(1)])
        .split(f.area());
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(BOARD_WIDTH), Constraint::Min(20)])
        .split(rows[0]);
    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Min(3)])
        .split(cols[1]);

    render_board(f, cols[0], snapshot);
    render_status(f, side[0], snapshot);
    render_log(f, side[1], log);

    let help = Paragraph::new(HELP)
        .style(Style::default().fg(Hue::DarkGray))
        .alignment(Alignment::Center);
    f.render_widget(help, rows[1]);
}

fn render_board(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let block = Block::default().title(" Ludo ").borders(Borders::ALL);
    let paragraph = match snapshot.game() {
        Some(game) => Paragraph::new(board_lines(game)),
        None => Paragraph::new("No board").alignment(Alignment::Center),
    };
    f.render_widget(paragraph.block(block), area);
}

fn render_status(f: &mut Frame, area: Rect, snapshot: &Snapshot) {
    let title = format!(
        " {} · {} · sound {} ",
        snapshot.mode(),
        snapshot.difficulty(),
        if *snapshot.sound_enabled() { "on" } else { "off" }
    );
    let paragraph = Paragraph::new(status_lines(snapshot))
        .block(Block::default().title(title).borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn render_log(f: &mut Frame, area: Rect, log: &VecDeque<String>) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = log
        .iter()
        .skip(log.len().saturating_sub(visible))
        .map(|entry| Line::from(entry.as_str()))
        .collect();
    let paragraph =
        Paragraph::new(lines).block(Block::default().title(" Log ").borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
