//! Game state for a two-player match: the board plus the side to move.

use crate::board::{Board, MoveError, Point, Stone};

/// Result of a game at a given moment.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Win(Stone),
    Draw,
}

/// A match in progress.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    to_move: Stone,
}

impl Game {
    /// Start a game on an empty `size` x `size` board with `first` to move.
    pub fn new(size: usize, first: Stone) -> Self {
        assert!(first.is_player(), "first player must be Black or White");
        Self {
            board: Board::new(size),
            to_move: first,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn to_move(&self) -> Stone {
        self.to_move
    }

    /// Place a stone for the side to move. The turn passes only on success.
    pub fn play(&mut self, (row, col): Point) -> Result<(), MoveError> {
        self.board.try_play(row, col, self.to_move)?;
        self.to_move = self.to_move.opponent();
        Ok(())
    }

    pub fn outcome(&self) -> Outcome {
        match self.board.winner() {
            Stone::Empty if self.board.is_full() => Outcome::Draw,
            Stone::Empty => Outcome::InProgress,
            winner => Outcome::Win(winner),
        }
    }

    pub fn is_over(&self) -> bool {
        self.outcome() != Outcome::InProgress
    }
}
