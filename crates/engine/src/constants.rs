//! Constants used in the checkers engine.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIZE: usize = 8;

/// Number of rows at each edge that form a side's home zone.
pub const HOME_ROWS: usize = 2;

// --- Search and Evaluation Constants ---
pub const INFINITY: i32 = 1_000_000;

/// The four diagonal directions as (row, col) offsets.
pub const DIAGONALS: [(i32, i32); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

/// The contents of one board cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Cell {
    #[default]
    Empty,
    White,
    Black,
}

/// The two sides of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Get the opponent of this color.
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row direction in which this side is allowed to jump.
    /// White travels towards row 0, Black towards row 7.
    pub fn forward(self) -> i32 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }

    /// The row this side is racing towards.
    pub fn target_row(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => BOARD_SIZE - 1,
        }
    }

    /// Rows this side has to fill to win. These are the opponent's starting rows.
    pub fn target_rows(self) -> std::ops::Range<usize> {
        match self {
            Color::White => 0..HOME_ROWS,
            Color::Black => BOARD_SIZE - HOME_ROWS..BOARD_SIZE,
        }
    }

    pub fn cell(self) -> Cell {
        match self {
            Color::White => Cell::White,
            Color::Black => Cell::Black,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "White"),
            Color::Black => write!(f, "Black"),
        }
    }
}

impl Cell {
    /// Get the color owning this cell.
    /// Returns `None` if the cell is `Empty`.
    pub fn color(self) -> Option<Color> {
        match self {
            Cell::Empty => None,
            Cell::White => Some(Color::White),
            Cell::Black => Some(Color::Black),
        }
    }

    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    pub fn to_char(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::White => 'w',
            Cell::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Cell> {
        match c {
            '.' => Some(Cell::Empty),
            'w' | 'W' => Some(Cell::White),
            'b' | 'B' => Some(Cell::Black),
            _ => None,
        }
    }
}
