//! The board representation for the checkers engine.

use crate::constants::{BOARD_SIZE, Cell, Color, HOME_ROWS};
use crate::r#move::Move;
use once_cell::sync::Lazy;
use std::fmt;

/// Every playable (dark) square, in row-major order.
pub static DARK_SQUARES: Lazy<Vec<Square>> = Lazy::new(|| {
    (0..BOARD_SIZE)
        .flat_map(|r| (0..BOARD_SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| is_dark(r as i32, c as i32))
        .map(|(r, c)| Square::new(r as u8, c as u8))
        .collect()
});

/// A coordinate that is known to lie on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square {
    pub row: u8,
    pub col: u8,
}

impl Square {
    pub const fn new(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// Builds a square from signed coordinates, or `None` when off the board.
    pub fn checked(row: i32, col: i32) -> Option<Self> {
        if is_on_board(row, col) {
            Some(Self::new(row as u8, col as u8))
        } else {
            None
        }
    }

    /// The square `steps` diagonal steps away in direction (dr, dc).
    pub fn offset(self, dr: i32, dc: i32, steps: i32) -> Option<Square> {
        Self::checked(
            self.row as i32 + dr * steps,
            self.col as i32 + dc * steps,
        )
    }

    pub fn is_dark(self) -> bool {
        is_dark(self.row as i32, self.col as i32)
    }

    pub fn is_on_board(self) -> bool {
        is_on_board(self.row as i32, self.col as i32)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Returns whether the coordinates lie within the 8x8 grid.
pub fn is_on_board(row: i32, col: i32) -> bool {
    (0..BOARD_SIZE as i32).contains(&row) && (0..BOARD_SIZE as i32).contains(&col)
}

/// Dark squares are the only ones pieces may ever occupy.
pub fn is_dark(row: i32, col: i32) -> bool {
    (row + col) % 2 != 0
}

/// The state of the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Cell; BOARD_SIZE]; BOARD_SIZE],
}

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Self {
            cells: [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE],
        }
    }

    /// The starting position: Black on the dark squares of rows 0-1,
    /// White on the dark squares of rows 6-7.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for &sq in DARK_SQUARES.iter() {
            let r = sq.row as usize;
            if r < HOME_ROWS {
                board.set(sq, Cell::Black);
            } else if r >= BOARD_SIZE - HOME_ROWS {
                board.set(sq, Cell::White);
            }
        }
        board
    }

    /// Parses a layout of 8 rows separated by `/`, each row 8 characters
    /// of `.`, `w` or `b`. Pieces on light squares are rejected.
    pub fn from_layout(layout: &str) -> Option<Self> {
        let mut board = Self::empty();
        let rows: Vec<&str> = layout.split('/').collect();
        if rows.len() != BOARD_SIZE {
            return None;
        }
        for (r, row) in rows.iter().enumerate() {
            let chars: Vec<char> = row.chars().collect();
            if chars.len() != BOARD_SIZE {
                return None;
            }
            for (c, ch) in chars.into_iter().enumerate() {
                let cell = Cell::from_char(ch)?;
                if !cell.is_empty() && !is_dark(r as i32, c as i32) {
                    return None;
                }
                board.cells[r][c] = cell;
            }
        }
        Some(board)
    }

    pub fn to_layout(&self) -> String {
        self.cells
            .iter()
            .map(|row| row.iter().map(|c| c.to_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("/")
    }

    pub fn get(&self, sq: Square) -> Cell {
        self.cells[sq.row as usize][sq.col as usize]
    }

    pub fn set(&mut self, sq: Square, cell: Cell) {
        self.cells[sq.row as usize][sq.col as usize] = cell;
    }

    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_empty()
    }

    /// Moves the piece of `color` along `mv`. A jumped-over piece stays where it is.
    pub fn make_move(&mut self, mv: Move, color: Color) {
        self.set(mv.to, color.cell());
        self.set(mv.from, Cell::Empty);
    }

    /// Reverts a move previously applied with `make_move`.
    pub fn unmake_move(&mut self, mv: Move) {
        let moved = self.get(mv.to);
        self.set(mv.from, moved);
        self.set(mv.to, Cell::Empty);
    }

    /// Squares currently holding a piece of `color`, in row-major order.
    pub fn squares_of(&self, color: Color) -> impl Iterator<Item = Square> + '_ {
        DARK_SQUARES
            .iter()
            .copied()
            .filter(move |&sq| self.get(sq) == color.cell())
    }

    pub fn piece_count(&self, color: Color) -> usize {
        self.squares_of(color).count()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  ")?;
        for c in 0..BOARD_SIZE {
            write!(f, " {}", c)?;
        }
        writeln!(f)?;
        for (r, row) in self.cells.iter().enumerate() {
            write!(f, "{} ", r)?;
            for cell in row {
                write!(f, " {}", cell.to_char())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
