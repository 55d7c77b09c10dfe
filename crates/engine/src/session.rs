//! The turn and selection state machine for one game.
//!
//! A `Session` is owned by whatever front end drives the game. Input
//! arrives as cell clicks, AI turns or moves received from the relay, and
//! all three go through the same `apply` path.

use crate::board::{Board, Square};
use crate::config::Difficulty;
use crate::constants::Color;
use crate::engine::Engine;
use crate::move_gen;
use crate::movelist::MoveList;
use crate::protocol::WireMove;
use crate::r#move::Move;
use tracing::{debug, info};

/// How the two sides are controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Both sides play from the same terminal.
    LocalPvp,
    /// The local player against the engine.
    VsAi,
    /// The local player against a peer reached through the relay.
    Online,
}

/// Where the session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingSelection,
    AwaitingDestination,
    ForcedContinuation,
    GameOver,
}

/// What happened after a move was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnResult {
    /// The mover jumped and must jump again from this square.
    ContinueJumping(Square),
    /// The turn is over and this color moves next.
    TurnPassed(Color),
    /// The mover completed its target zone.
    Won(Color),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub mv: Move,
    pub mover: Color,
    pub result: TurnResult,
}

/// Result of a cell click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Ignored,
    Selected(Square),
    Moved(Transition),
}

#[derive(Debug, Clone)]
pub struct Session {
    board: Board,
    turn: Color,
    selected: Option<Square>,
    legal: MoveList,
    forced: Option<Square>,
    mode: GameMode,
    local_color: Color,
    difficulty: Difficulty,
    active: bool,
    winner: Option<Color>,
    room_id: Option<String>,
}

impl Session {
    /// Starts an active game on the initial board with White to move.
    pub fn new(mode: GameMode, local_color: Color, difficulty: Difficulty) -> Self {
        Self {
            board: Board::initial(),
            turn: Color::White,
            selected: None,
            legal: MoveList::new(),
            forced: None,
            mode,
            local_color,
            difficulty,
            active: true,
            winner: None,
            room_id: None,
        }
    }

    /// Starts an online game in the given relay room.
    pub fn online(local_color: Color, room_id: impl Into<String>) -> Self {
        let mut session = Self::new(GameMode::Online, local_color, Difficulty::default());
        session.room_id = Some(room_id.into());
        session
    }

    /// Replaces the board and side to move, clearing any selection.
    pub fn set_position(&mut self, board: Board, turn: Color) {
        self.board = board;
        self.turn = turn;
        self.clear_selection();
        self.winner = None;
        self.active = true;
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn turn(&self) -> Color {
        self.turn
    }

    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    /// Destinations currently offered for the selected piece.
    pub fn legal_moves(&self) -> &[Move] {
        self.legal.as_slice()
    }

    pub fn forced(&self) -> Option<Square> {
        self.forced
    }

    pub fn mode(&self) -> GameMode {
        self.mode
    }

    pub fn local_color(&self) -> Color {
        self.local_color
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn winner(&self) -> Option<Color> {
        self.winner
    }

    pub fn room_id(&self) -> Option<&str> {
        self.room_id.as_deref()
    }

    /// An inactive session, won or abandoned, is always over.
    pub fn phase(&self) -> Phase {
        if !self.active || self.winner.is_some() {
            Phase::GameOver
        } else if self.forced.is_some() {
            Phase::ForcedContinuation
        } else if self.selected.is_some() {
            Phase::AwaitingDestination
        } else {
            Phase::AwaitingSelection
        }
    }

    /// Whether the side to move is driven by input from this terminal.
    pub fn is_local_turn(&self) -> bool {
        match self.mode {
            GameMode::LocalPvp => true,
            GameMode::VsAi | GameMode::Online => self.turn == self.local_color,
        }
    }

    /// Whether the engine should play the side to move.
    pub fn is_ai_turn(&self) -> bool {
        self.active && self.mode == GameMode::VsAi && self.turn != self.local_color
    }

    /// Whether the side to move has any legal move. Running out of moves is
    /// not a loss in these rules; front ends use this to stop a stuck game.
    pub fn has_moves(&self) -> bool {
        match self.forced {
            Some(from) => !move_gen::valid_moves(&self.board, from, self.turn, true).is_empty(),
            None => move_gen::has_any_move(&self.board, self.turn),
        }
    }

    /// Ends the game without a winner, e.g. when returning to the menu.
    pub fn deactivate(&mut self) {
        self.active = false;
        self.clear_selection();
    }

    /// Handles a click on `sq` by the local player. Off-board squares are
    /// never legal and are ignored.
    pub fn click(&mut self, sq: Square) -> Outcome {
        if !self.active || !self.is_local_turn() || !sq.is_on_board() {
            return Outcome::Ignored;
        }

        if let Some(forced) = self.forced {
            if sq == forced {
                return Outcome::Ignored;
            }
            return match self.find_legal(sq) {
                Some(mv) => Outcome::Moved(self.apply(mv)),
                None => Outcome::Ignored,
            };
        }

        if self.board.get(sq) == self.turn.cell() {
            if self.selected == Some(sq) {
                return Outcome::Ignored;
            }
            self.selected = Some(sq);
            self.legal = move_gen::valid_moves(&self.board, sq, self.turn, false);
            return Outcome::Selected(sq);
        }

        if self.selected.is_some() && self.board.is_empty(sq) {
            if let Some(mv) = self.find_legal(sq) {
                return Outcome::Moved(self.apply(mv));
            }
        }
        Outcome::Ignored
    }

    /// Lets the engine play one move for the side to move.
    /// Returns `None` when the engine has no move to offer.
    pub fn play_ai(&mut self, engine: &mut Engine) -> Option<Transition> {
        if !self.active {
            return None;
        }
        let mv = engine.select_move(&self.board, self.turn, self.difficulty, self.forced)?;
        self.apply_checked(mv.from, mv.to)
    }

    /// Applies a move received from the remote peer.
    /// Moves that are not legal on this board are dropped.
    pub fn apply_remote(&mut self, wire: WireMove) -> Option<Transition> {
        if !self.active || self.is_local_turn() {
            return None;
        }
        let (from, to) = wire.squares()?;
        self.apply_checked(from, to)
    }

    /// Re-derives the move from the rules before applying it, so only
    /// moves the engine itself would generate ever reach the board.
    fn apply_checked(&mut self, from: Square, to: Square) -> Option<Transition> {
        if !from.is_on_board() || self.board.get(from) != self.turn.cell() {
            return None;
        }
        if self.forced.is_some_and(|forced| forced != from) {
            return None;
        }
        let moves = move_gen::valid_moves(&self.board, from, self.turn, self.forced.is_some());
        let mv = moves.iter().copied().find(|m| m.to == to)?;
        self.selected = Some(from);
        self.legal = moves;
        Some(self.apply(mv))
    }

    fn find_legal(&self, to: Square) -> Option<Move> {
        self.legal.iter().copied().find(|m| m.to == to)
    }

    fn apply(&mut self, mv: Move) -> Transition {
        let mover = self.turn;
        self.board.make_move(mv, mover);
        debug!("{} plays {}", mover, mv);

        if mv.is_jump() {
            let further = move_gen::valid_moves(&self.board, mv.to, mover, true);
            if !further.is_empty() {
                self.forced = Some(mv.to);
                self.selected = Some(mv.to);
                self.legal = further;
                return Transition {
                    mv,
                    mover,
                    result: TurnResult::ContinueJumping(mv.to),
                };
            }
        }

        Transition {
            mv,
            mover,
            result: self.end_turn(),
        }
    }

    fn end_turn(&mut self) -> TurnResult {
        self.clear_selection();
        if let Some(winner) = move_gen::check_win(&self.board) {
            info!("{} wins", winner);
            self.winner = Some(winner);
            self.active = false;
            return TurnResult::Won(winner);
        }
        self.turn = self.turn.opponent();
        TurnResult::TurnPassed(self.turn)
    }

    fn clear_selection(&mut self) {
        self.selected = None;
        self.legal.clear();
        self.forced = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DARK_SQUARES;
    use crate::constants::Cell;

    fn sq(row: u8, col: u8) -> Square {
        Square::new(row, col)
    }

    fn local() -> Session {
        Session::new(GameMode::LocalPvp, Color::White, Difficulty::Easy)
    }

    fn session_with(pieces: &[(u8, u8, Cell)], turn: Color) -> Session {
        let mut board = Board::empty();
        for &(r, c, cell) in pieces {
            board.set(sq(r, c), cell);
        }
        let mut session = local();
        session.set_position(board, turn);
        session
    }

    #[test]
    fn new_session_awaits_white_selection() {
        let session = local();
        assert!(session.is_active());
        assert_eq!(session.turn(), Color::White);
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.board(), &Board::initial());
    }

    #[test]
    fn selecting_an_own_piece_computes_destinations() {
        let mut session = local();
        assert_eq!(session.click(sq(6, 1)), Outcome::Selected(sq(6, 1)));
        assert_eq!(session.phase(), Phase::AwaitingDestination);
        assert_eq!(session.legal_moves().len(), 2);
    }

    #[test]
    fn selecting_the_selected_piece_again_is_a_no_op() {
        let mut session = local();
        session.click(sq(6, 1));
        assert_eq!(session.click(sq(6, 1)), Outcome::Ignored);
        assert_eq!(session.selected(), Some(sq(6, 1)));
    }

    #[test]
    fn clicking_an_opponent_piece_is_ignored() {
        let mut session = local();
        assert_eq!(session.click(sq(1, 0)), Outcome::Ignored);
        assert_eq!(session.phase(), Phase::AwaitingSelection);
    }

    #[test]
    fn a_step_passes_the_turn() {
        let mut session = local();
        session.click(sq(6, 1));
        let outcome = session.click(sq(5, 2));

        let Outcome::Moved(transition) = outcome else {
            panic!("expected a move, got {:?}", outcome);
        };
        assert_eq!(transition.mover, Color::White);
        assert_eq!(transition.result, TurnResult::TurnPassed(Color::Black));
        assert_eq!(session.turn(), Color::Black);
        assert_eq!(session.phase(), Phase::AwaitingSelection);
        assert_eq!(session.board().get(sq(5, 2)), Cell::White);
    }

    #[test]
    fn an_illegal_destination_keeps_the_selection() {
        let mut session = local();
        session.click(sq(6, 1));
        assert_eq!(session.click(sq(3, 2)), Outcome::Ignored);
        assert_eq!(session.phase(), Phase::AwaitingDestination);
        assert_eq!(session.turn(), Color::White);
    }

    #[test]
    fn chained_jump_forces_continuation_without_flipping_turn() {
        let mut session = session_with(
            &[
                (6, 1, Cell::White),
                (5, 2, Cell::Black),
                (3, 4, Cell::Black),
                (0, 7, Cell::Black),
            ],
            Color::White,
        );
        session.click(sq(6, 1));
        let Outcome::Moved(first) = session.click(sq(4, 3)) else {
            panic!("jump should apply");
        };

        assert_eq!(first.result, TurnResult::ContinueJumping(sq(4, 3)));
        assert_eq!(session.phase(), Phase::ForcedContinuation);
        assert_eq!(session.forced(), Some(sq(4, 3)));
        assert_eq!(session.turn(), Color::White);
        assert!(session.legal_moves().iter().all(|m| m.is_jump()));

        // The forced piece itself and non-jump squares are refused.
        assert_eq!(session.click(sq(4, 3)), Outcome::Ignored);
        assert_eq!(session.click(sq(3, 2)), Outcome::Ignored);

        let Outcome::Moved(second) = session.click(sq(2, 5)) else {
            panic!("continuation jump should apply");
        };
        assert_eq!(second.result, TurnResult::TurnPassed(Color::Black));
        assert_eq!(session.forced(), None);
    }

    #[test]
    fn completing_the_target_zone_ends_the_game() {
        let mut pieces: Vec<(u8, u8, Cell)> = DARK_SQUARES
            .iter()
            .filter(|s| s.row < 2 && *s != &sq(1, 0))
            .map(|s| (s.row, s.col, Cell::White))
            .collect();
        pieces.push((2, 1, Cell::White));
        pieces.push((7, 6, Cell::Black));
        let mut session = session_with(&pieces, Color::White);

        session.click(sq(2, 1));
        let Outcome::Moved(transition) = session.click(sq(1, 0)) else {
            panic!("winning step should apply");
        };

        assert_eq!(transition.result, TurnResult::Won(Color::White));
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.winner(), Some(Color::White));
        assert!(!session.is_active());
        assert_eq!(session.click(sq(7, 6)), Outcome::Ignored);
    }

    #[test]
    fn inactive_session_ignores_input() {
        let mut session = local();
        session.deactivate();
        assert_eq!(session.click(sq(6, 1)), Outcome::Ignored);
    }

    #[test]
    fn deactivated_session_is_over_without_a_winner() {
        let mut session = local();
        session.click(sq(6, 1));
        session.deactivate();
        assert_eq!(session.phase(), Phase::GameOver);
        assert_eq!(session.winner(), None);
    }

    #[test]
    fn off_board_clicks_are_ignored() {
        let mut session = local();
        assert_eq!(session.click(sq(8, 0)), Outcome::Ignored);
        assert_eq!(session.click(sq(9, 9)), Outcome::Ignored);
        assert_eq!(session.phase(), Phase::AwaitingSelection);

        session.click(sq(6, 1));
        assert_eq!(session.click(sq(0, 8)), Outcome::Ignored);
        assert_eq!(session.selected(), Some(sq(6, 1)));
        assert_eq!(session.turn(), Color::White);
    }

    #[test]
    fn vs_ai_refuses_clicks_on_the_ai_turn() {
        let mut session = Session::new(GameMode::VsAi, Color::Black, Difficulty::Medium);
        assert!(session.is_ai_turn());
        assert_eq!(session.click(sq(6, 1)), Outcome::Ignored);

        let mut engine = Engine::with_seed(11);
        let transition = session.play_ai(&mut engine).expect("white can move");
        assert_eq!(transition.mover, Color::White);
        assert_eq!(session.turn(), Color::Black);
        assert!(!session.is_ai_turn());
    }

    #[test]
    fn ai_finishes_its_forced_jumps_before_the_turn_passes() {
        let mut session = Session::new(GameMode::VsAi, Color::Black, Difficulty::Hard);
        let mut board = Board::empty();
        board.set(sq(6, 1), Cell::White);
        board.set(sq(5, 2), Cell::Black);
        board.set(sq(3, 4), Cell::Black);
        board.set(sq(0, 7), Cell::Black);
        session.set_position(board, Color::White);
        session.forced = Some(sq(6, 1));
        let mut engine = Engine::with_seed(2);

        let first = session.play_ai(&mut engine).unwrap();
        assert_eq!(first.result, TurnResult::ContinueJumping(sq(4, 3)));
        assert!(session.is_ai_turn());

        let second = session.play_ai(&mut engine).unwrap();
        assert_eq!(second.mv.from, sq(4, 3));
        assert_eq!(second.result, TurnResult::TurnPassed(Color::Black));
    }

    #[test]
    fn remote_moves_apply_only_on_the_peer_turn() {
        let mut session = Session::online(Color::Black, "a#b");
        let wire = WireMove {
            from_row: 6,
            from_col: 1,
            to_row: 5,
            to_col: 2,
        };

        let transition = session.apply_remote(wire).expect("white's opening step");
        assert_eq!(transition.result, TurnResult::TurnPassed(Color::Black));

        // Now it is the local player's turn; a second remote move is dropped.
        assert_eq!(session.apply_remote(wire), None);
    }

    #[test]
    fn illegal_remote_moves_are_dropped() {
        let mut session = Session::online(Color::Black, "a#b");
        let wire = WireMove {
            from_row: 6,
            from_col: 1,
            to_row: 3,
            to_col: 4,
        };
        assert_eq!(session.apply_remote(wire), None);
        assert_eq!(session.turn(), Color::White);
        assert_eq!(session.board(), &Board::initial());
    }

    #[test]
    fn stuck_side_reports_no_moves() {
        let session = session_with(
            &[(7, 0, Cell::White), (6, 1, Cell::Black), (5, 2, Cell::Black)],
            Color::White,
        );
        assert!(!session.has_moves());
        assert!(local().has_moves());
    }
}
