//! A move list implementation that avoids heap allocations.

use crate::r#move::Move;
use std::ops::{Index, IndexMut};

// Every move lands on an empty dark square, and each such square is reached
// by at most 4 steps and 2 jumps. With p pieces of the mover on the 32 dark
// squares that is at most 6 * min(p, 32 - p) moves.
pub const MAX_MOVES: usize = 96;

#[derive(Debug, Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    count: usize,
}

impl MoveList {
    pub fn new() -> Self {
        Self {
            moves: [Move::NULL; MAX_MOVES],
            count: 0,
        }
    }

    pub fn add(&mut self, mv: Move) {
        debug_assert!(self.count < MAX_MOVES, "move list overflow");
        if self.count < MAX_MOVES {
            self.moves[self.count] = mv;
            self.count += 1;
        }
    }

    /// Appends every move of `other`.
    pub fn extend_from(&mut self, other: &MoveList) {
        for &mv in other.as_slice() {
            self.add(mv);
        }
    }

    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves[0..self.count]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    pub fn clear(&mut self) {
        self.count = 0;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<usize> for MoveList {
    type Output = Move;

    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl IndexMut<usize> for MoveList {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.moves[0..self.count][index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
