//! Evaluates a board position and returns a score.

use crate::board::Board;
use crate::config::Config;
use crate::constants::{BOARD_SIZE, Color};

/// Positional value of one piece of `color` standing on `row`.
///
/// Each row advanced from the piece's own back edge is worth
/// `advance_weight`; standing inside the target zone adds `home_zone_bonus`.
pub fn piece_value(color: Color, row: usize, config: &Config) -> i32 {
    let advanced = match color {
        Color::White => BOARD_SIZE - 1 - row,
        Color::Black => row,
    };
    let mut value = advanced as i32 * config.advance_weight;
    if color.target_rows().contains(&row) {
        value += config.home_zone_bonus;
    }
    value
}

/// Scores the board from the point of view of `maximizing`.
pub fn evaluate(board: &Board, maximizing: Color, config: &Config) -> i32 {
    let mut score = 0;
    for color in [Color::White, Color::Black] {
        let sign = if color == maximizing { 1 } else { -1 };
        for sq in board.squares_of(color) {
            score += sign * piece_value(color, sq.row as usize, config);
        }
    }
    score
}
