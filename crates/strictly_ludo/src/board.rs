//! Board topology: track constants and grid projection.
//!
//! Rules only ever reason about two coordinates:
//!
//! - **absolute square** `0..52`, one shared ring for every color, and
//! - **relative progress** `0..=57`, the number of steps a token has taken
//!   since entering the ring. `0..=51` lies on the ring, `52..=56` in the
//!   color's private home stretch, and `57` is the finish.
//!
//! The `(row, col)` projections onto the 15×15 grid exist for renderers.

use super::Color;
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of squares on the shared ring.
pub const RING_LENGTH: u8 = 52;

/// Number of private squares between the ring and the finish, finish included.
pub const HOME_STRETCH_LENGTH: u8 = 6;

/// Last relative progress that still lies on the ring.
pub const LAST_RING_PROGRESS: u8 = RING_LENGTH - 1;

/// First relative progress inside the home stretch.
pub const HOME_STRETCH_START: u8 = RING_LENGTH;

/// Relative progress of the finish square.
pub const FINISH: u8 = RING_LENGTH + HOME_STRETCH_LENGTH - 1;

/// Side length of the square grid the board is drawn on.
pub const GRID_SIZE: u8 = 15;

/// Absolute squares on which no capture can happen.
pub const SAFE_SQUARES: [u8; 8] = [0, 8, 13, 21, 26, 34, 39, 47];

const START_SQUARES: [u8; 4] = [0, 13, 26, 39];

const HOME_ENTRY_SQUARES: [u8; 4] = [50, 11, 24, 37];

/// A cell on the 15×15 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    /// Row, top to bottom.
    pub row: u8,
    /// Column, left to right.
    pub col: u8,
}

const fn cell(row: u8, col: u8) -> Cell {
    Cell { row, col }
}

/// Center of the board, where finished tokens are drawn.
pub const CENTER: Cell = cell(7, 7);

#[rustfmt::skip]
const RING_CELLS: [Cell; RING_LENGTH as usize] = [
    // Red arm, upward from the red start
    cell(13, 6), cell(12, 6), cell(11, 6), cell(10, 6), cell(9, 6), cell(8, 6),
    cell(8, 5), cell(8, 4), cell(8, 3), cell(8, 2), cell(8, 1), cell(8, 0),
    cell(7, 0),
    // Green arm, rightward from the green start
    cell(6, 0), cell(6, 1), cell(6, 2), cell(6, 3), cell(6, 4), cell(6, 5),
    cell(5, 6), cell(4, 6), cell(3, 6), cell(2, 6), cell(1, 6), cell(0, 6),
    cell(0, 7),
    // Yellow arm, downward from the yellow start
    cell(0, 8), cell(1, 8), cell(2, 8), cell(3, 8), cell(4, 8), cell(5, 8),
    cell(6, 9), cell(6, 10), cell(6, 11), cell(6, 12), cell(6, 13), cell(6, 14),
    cell(7, 14),
    // Blue arm, leftward from the blue start
    cell(8, 14), cell(8, 13), cell(8, 12), cell(8, 11), cell(8, 10), cell(8, 9),
    cell(9, 8), cell(10, 8), cell(11, 8), cell(12, 8), cell(13, 8), cell(14, 8),
    cell(14, 7),
];

#[rustfmt::skip]
const STRETCH_CELLS: [[Cell; HOME_STRETCH_LENGTH as usize]; 4] = [
    [cell(13, 7), cell(12, 7), cell(11, 7), cell(10, 7), cell(9, 7), cell(8, 7)],
    [cell(7, 1), cell(7, 2), cell(7, 3), cell(7, 4), cell(7, 5), cell(7, 6)],
    [cell(1, 7), cell(2, 7), cell(3, 7), cell(4, 7), cell(5, 7), cell(6, 7)],
    [cell(7, 13), cell(7, 12), cell(7, 11), cell(7, 10), cell(7, 9), cell(7, 8)],
];

#[rustfmt::skip]
const BASE_CELLS: [[Cell; 4]; 4] = [
    [cell(11, 2), cell(11, 4), cell(13, 2), cell(13, 4)],
    [cell(2, 2), cell(2, 4), cell(4, 2), cell(4, 4)],
    [cell(2, 10), cell(2, 12), cell(4, 10), cell(4, 12)],
    [cell(11, 10), cell(11, 12), cell(13, 10), cell(13, 12)],
];

/// Absolute square where `color` enters the ring.
pub const fn start_square(color: Color) -> u8 {
    START_SQUARES[color.index()]
}

/// Ring square marking the mouth of `color`'s home column.
///
/// A token crosses it at progress 50, one step before its last ring square.
pub const fn home_entry_square(color: Color) -> u8 {
    HOME_ENTRY_SQUARES[color.index()]
}

/// Whether an absolute ring square is safe from capture.
pub fn is_safe(square: u8) -> bool {
    SAFE_SQUARES.contains(&square)
}

/// Converts a ring progress to its absolute square.
///
/// # Panics
///
/// Panics if `progress` is past the ring; home-stretch squares have no
/// absolute counterpart.
#[instrument(level = "trace")]
pub fn absolute_of(progress: u8, color: Color) -> u8 {
    assert!(
        progress <= LAST_RING_PROGRESS,
        "progress {progress} is not on the ring"
    );
    (start_square(color) + progress) % RING_LENGTH
}

/// Grid cell of an absolute ring square.
///
/// # Panics
///
/// Panics if `square` is not below [`RING_LENGTH`].
#[instrument(level = "trace")]
pub fn ring_coord(square: u8) -> Cell {
    assert!(square < RING_LENGTH, "square {square} is off the ring");
    RING_CELLS[square as usize]
}

/// Grid cell of a home-stretch progress, walking radially inward.
///
/// # Panics
///
/// Panics if `progress` is outside `52..=57`.
#[instrument(level = "trace")]
pub fn stretch_coord(progress: u8, color: Color) -> Cell {
    assert!(
        (HOME_STRETCH_START..=FINISH).contains(&progress),
        "progress {progress} is not in the home stretch"
    );
    STRETCH_CELLS[color.index()][(progress - HOME_STRETCH_START) as usize]
}

/// Grid cell of one of the four parking cells in a color's corner.
///
/// # Panics
///
/// Panics if `slot` is not below 4.
#[instrument(level = "trace")]
pub fn base_coord(color: Color, slot: u8) -> Cell {
    assert!(slot < 4, "base slot {slot} out of range");
    BASE_CELLS[color.index()][slot as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_constants_line_up() {
        assert_eq!(FINISH, 57);
        assert_eq!(LAST_RING_PROGRESS, 51);
        assert_eq!(HOME_STRETCH_START, 52);
    }

    #[test]
    fn test_start_squares_are_safe() {
        for color in Color::ALL {
            assert!(is_safe(start_square(color)), "{color} start not safe");
        }
    }

    #[test]
    fn test_home_entry_precedes_last_ring_step() {
        for color in Color::ALL {
            let entry = home_entry_square(color);
            assert_eq!(absolute_of(LAST_RING_PROGRESS - 1, color), entry);
            assert_eq!(absolute_of(LAST_RING_PROGRESS, color), (entry + 1) % RING_LENGTH);
        }
    }

    #[test]
    fn test_absolute_wraps_around() {
        assert_eq!(absolute_of(0, Color::Blue), 39);
        assert_eq!(absolute_of(13, Color::Blue), 0);
        assert_eq!(absolute_of(51, Color::Green), 12);
        assert_eq!(absolute_of(20, Color::Red), 20);
    }

    #[test]
    #[should_panic(expected = "not on the ring")]
    fn test_absolute_rejects_stretch() {
        absolute_of(52, Color::Red);
    }

    #[test]
    fn test_ring_cells_distinct_and_connected() {
        let distinct: HashSet<_> = RING_CELLS.iter().collect();
        assert_eq!(distinct.len(), RING_LENGTH as usize);

        for square in 0..RING_LENGTH {
            let a = ring_coord(square);
            let b = ring_coord((square + 1) % RING_LENGTH);
            assert!(a.row < GRID_SIZE && a.col < GRID_SIZE);
            let step = a.row.abs_diff(b.row).max(a.col.abs_diff(b.col));
            assert_eq!(step, 1, "squares {square} and next are not adjacent");
        }
    }

    #[test]
    fn test_stretch_walks_toward_center() {
        for color in Color::ALL {
            let first = stretch_coord(HOME_STRETCH_START, color);
            let last = stretch_coord(FINISH, color);
            let dist = |c: Cell| c.row.abs_diff(CENTER.row) + c.col.abs_diff(CENTER.col);
            assert!(dist(last) < dist(first));
            assert_eq!(dist(last), 1);
        }
    }

    #[test]
    fn test_no_overlap_between_layers() {
        let mut seen = HashSet::new();
        for cell in RING_CELLS {
            assert!(seen.insert(cell));
        }
        for color in Color::ALL {
            for progress in HOME_STRETCH_START..=FINISH {
                assert!(seen.insert(stretch_coord(progress, color)));
            }
            for slot in 0..4 {
                assert!(seen.insert(base_coord(color, slot)));
            }
        }
    }
}
