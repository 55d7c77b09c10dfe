//! Defines the representation of a move in the engine.

use crate::board::Square;
use std::fmt;

/// What kind of transition a move is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// One diagonal step onto an empty square.
    Step,
    /// A two-square forward hop over the occupied square `over`.
    Jump { over: Square },
}

/// Represents a single move of one piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    /// Placeholder used to fill unused slots of a `MoveList`.
    pub const NULL: Move = Move {
        from: Square::new(0, 0),
        to: Square::new(0, 0),
        kind: MoveKind::Step,
    };

    pub fn step(from: Square, to: Square) -> Self {
        Move { from, to, kind: MoveKind::Step }
    }

    pub fn jump(from: Square, to: Square, over: Square) -> Self {
        Move { from, to, kind: MoveKind::Jump { over } }
    }

    /// Checks if the move is a jump.
    pub fn is_jump(&self) -> bool {
        matches!(self.kind, MoveKind::Jump { .. })
    }

    /// The square hopped over, for jumps.
    pub fn jumped(&self) -> Option<Square> {
        match self.kind {
            MoveKind::Jump { over } => Some(over),
            MoveKind::Step => None,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sep = if self.is_jump() { 'x' } else { '-' };
        write!(f, "{}{}{}", self.from, sep, self.to)
    }
}
