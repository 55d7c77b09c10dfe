//! Legal move generation and the win check.

use crate::board::{Board, DARK_SQUARES, Square};
use crate::constants::{Color, DIAGONALS};
use crate::movelist::MoveList;
use crate::r#move::Move;

/// Generates the legal moves for the piece of `color` standing on `from`.
///
/// Jumps come first: only in the forward row direction, over any occupied
/// square, onto an empty one. Steps follow in all four diagonals unless
/// `jumps_only` is set, which is how a forced continuation is enumerated.
pub fn valid_moves(board: &Board, from: Square, color: Color, jumps_only: bool) -> MoveList {
    let mut moves = MoveList::new();
    if Square::checked(from.row as i32, from.col as i32).is_none() {
        return moves;
    }

    generate_jumps(board, from, color, &mut moves);
    if !jumps_only {
        generate_steps(board, from, &mut moves);
    }
    moves
}

fn generate_jumps(board: &Board, from: Square, color: Color, moves: &mut MoveList) {
    let forward = color.forward();
    for (dr, dc) in DIAGONALS {
        if dr != forward {
            continue;
        }
        let (Some(over), Some(to)) = (from.offset(dr, dc, 1), from.offset(dr, dc, 2)) else {
            continue;
        };
        // The owner of the hopped piece is not checked.
        if !board.is_empty(over) && board.is_empty(to) {
            moves.add(Move::jump(from, to, over));
        }
    }
}

fn generate_steps(board: &Board, from: Square, moves: &mut MoveList) {
    for (dr, dc) in DIAGONALS {
        if let Some(to) = from.offset(dr, dc, 1) {
            if board.is_empty(to) {
                moves.add(Move::step(from, to));
            }
        }
    }
}

/// Every legal move for every piece of `color`, scanning row by row.
pub fn all_moves(board: &Board, color: Color) -> MoveList {
    let mut moves = MoveList::new();
    for sq in board.squares_of(color) {
        moves.extend_from(&valid_moves(board, sq, color, false));
    }
    moves
}

/// Returns true if `color` has at least one legal move.
pub fn has_any_move(board: &Board, color: Color) -> bool {
    board
        .squares_of(color)
        .any(|sq| !valid_moves(board, sq, color, false).is_empty())
}

/// A side wins once its pieces occupy every dark square of its target zone.
/// White is checked first, so it wins if both zones are complete.
pub fn check_win(board: &Board) -> Option<Color> {
    [Color::White, Color::Black]
        .into_iter()
        .find(|&color| zone_filled_by(board, color))
}

fn zone_filled_by(board: &Board, color: Color) -> bool {
    let rows = color.target_rows();
    DARK_SQUARES
        .iter()
        .filter(|sq| rows.contains(&(sq.row as usize)))
        .all(|&sq| board.get(sq) == color.cell())
}
