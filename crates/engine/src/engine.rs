//! The AI move selector.

use crate::board::{Board, Square};
use crate::config::{Config, Difficulty};
use crate::constants::{Color, INFINITY};
use crate::evaluate;
use crate::move_gen;
use crate::movelist::MoveList;
use crate::r#move::Move;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use tracing::debug;

/// Picks moves for a computer-controlled side.
///
/// The engine never touches the caller's board: the search runs on its own
/// copy and walks the tree with `make_move`/`unmake_move` pairs.
pub struct Engine {
    pub nodes_searched: u64,
    pub config: Config,
    rng: StdRng,
}

impl Engine {
    /// Creates an engine with the default configuration and an entropy-seeded RNG.
    pub fn new() -> Self {
        Self::with_rng(Config::default(), StdRng::from_entropy())
    }

    /// Creates an engine whose random choices are reproducible.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(Config::default(), StdRng::seed_from_u64(seed))
    }

    pub fn with_config(config: Config) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }

    fn with_rng(config: Config, rng: StdRng) -> Self {
        Self {
            nodes_searched: 0,
            config,
            rng,
        }
    }

    /// Chooses a move for `color`, or `None` when it has nothing to play.
    ///
    /// With `forced` set, only jumps of the piece on that square are
    /// considered: `Hard` ranks them greedily, the other tiers pick at random.
    pub fn select_move(
        &mut self,
        board: &Board,
        color: Color,
        difficulty: Difficulty,
        forced: Option<Square>,
    ) -> Option<Move> {
        if let Some(from) = forced {
            let jumps = move_gen::valid_moves(board, from, color, true);
            return match difficulty {
                Difficulty::Hard => greedy_move(jumps.as_slice(), color),
                Difficulty::Easy | Difficulty::Medium => self.random_move(&jumps),
            };
        }

        match difficulty {
            Difficulty::Easy => {
                let moves = move_gen::all_moves(board, color);
                self.random_move(&moves)
            }
            Difficulty::Medium => {
                let moves = move_gen::all_moves(board, color);
                greedy_move(moves.as_slice(), color)
            }
            Difficulty::Hard => self.search(board, color).map(|(mv, _)| mv),
        }
    }

    fn random_move(&mut self, moves: &MoveList) -> Option<Move> {
        moves.as_slice().choose(&mut self.rng).copied()
    }

    /// Alpha-beta minimax from the point of view of `color`.
    /// Returns the best move and its score.
    pub fn search(&mut self, board: &Board, color: Color) -> Option<(Move, i32)> {
        self.nodes_searched = 0;
        let depth = self.config.search_depth.max(1);

        let moves = move_gen::all_moves(board, color);
        if moves.is_empty() {
            return None;
        }

        let mut work = *board;
        let mut alpha = -INFINITY;
        let beta = INFINITY;
        let mut best: Option<(Move, i32)> = None;

        for &mv in moves.iter() {
            work.make_move(mv, color);
            let score = self.minimax(&mut work, depth - 1, false, alpha, beta, color);
            work.unmake_move(mv);

            if best.is_none_or(|(_, best_score)| score > best_score) {
                best = Some((mv, score));
            }
            if score > alpha {
                alpha = score;
            }
        }

        if let Some((mv, score)) = best {
            debug!(
                "search depth {} nodes {} best {} score {}",
                depth, self.nodes_searched, mv, score
            );
        }
        best
    }

    fn minimax(
        &mut self,
        board: &mut Board,
        depth: i32,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        root: Color,
    ) -> i32 {
        self.nodes_searched += 1;

        if depth <= 0 {
            return evaluate::evaluate(board, root, &self.config);
        }

        let player = if maximizing { root } else { root.opponent() };
        let moves = move_gen::all_moves(board, player);

        // A side without moves is scored as it stands.
        if moves.is_empty() {
            return evaluate::evaluate(board, root, &self.config);
        }

        if maximizing {
            let mut max_eval = -INFINITY;
            for &mv in moves.iter() {
                board.make_move(mv, player);
                let eval = self.minimax(board, depth - 1, false, alpha, beta, root);
                board.unmake_move(mv);

                max_eval = max_eval.max(eval);
                alpha = alpha.max(eval);
                if beta <= alpha {
                    break;
                }
            }
            max_eval
        } else {
            let mut min_eval = INFINITY;
            for &mv in moves.iter() {
                board.make_move(mv, player);
                let eval = self.minimax(board, depth - 1, true, alpha, beta, root);
                board.unmake_move(mv);

                min_eval = min_eval.min(eval);
                beta = beta.min(eval);
                if beta <= alpha {
                    break;
                }
            }
            min_eval
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the move landing closest to `color`'s target row, preferring jumps
/// on equal distance and the earliest listed move after that.
pub fn greedy_move(moves: &[Move], color: Color) -> Option<Move> {
    let target = color.target_row() as i32;
    moves
        .iter()
        .min_by_key(|mv| ((mv.to.row as i32 - target).abs(), !mv.is_jump()))
        .copied()
}
