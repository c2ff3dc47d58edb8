//! Five-in-a-row board: grid state, move legality and win detection.
//!
//! Cells are stored row-major in a flat `Vec`. Stones are never removed once
//! placed, so a board only ever fills up.

use std::fmt;

use thiserror::Error;

use crate::constants::{AXES, BOARD_SIZE, NEIGHBORS, WIN_LENGTH};

/// Content of a single cell. `Black` and `White` are the two players.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Stone {
    #[default]
    Empty,
    /// First player (+1), drawn as `X`.
    Black,
    /// Second player (-1), drawn as `O`.
    White,
}

impl Stone {
    /// The other player. `Empty` maps to itself.
    pub fn opponent(self) -> Stone {
        match self {
            Stone::Empty => Stone::Empty,
            Stone::Black => Stone::White,
            Stone::White => Stone::Black,
        }
    }

    pub fn is_player(self) -> bool {
        self != Stone::Empty
    }

    fn symbol(self) -> char {
        match self {
            Stone::Empty => '.',
            Stone::Black => 'X',
            Stone::White => 'O',
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A cell coordinate as (row, col).
pub type Point = (usize, usize);

/// Reason a placement was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    #[error("({row}, {col}) is off the board")]
    OutOfBounds { row: usize, col: usize },
    #[error("({row}, {col}) is already occupied")]
    Occupied { row: usize, col: usize },
    #[error("cannot place an empty stone")]
    EmptyStone,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Stone>,
    last_move: Option<Point>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new(BOARD_SIZE)
    }
}

impl Board {
    /// Create an empty `size` x `size` board.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "board size must be positive");
        Self {
            size,
            cells: vec![Stone::Empty; size * size],
            last_move: None,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// The most recent placement, if any.
    pub fn last_move(&self) -> Option<Point> {
        self.last_move
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> usize {
        row * self.size + col
    }

    /// Stone at (row, col), or `None` when off the board.
    pub fn get(&self, row: usize, col: usize) -> Option<Stone> {
        if row >= self.size || col >= self.size {
            return None;
        }
        Some(self.cells[self.idx(row, col)])
    }

    /// Signed lookup used when walking away from a cell.
    fn stone_at(&self, row: isize, col: isize) -> Option<Stone> {
        if row < 0 || col < 0 {
            return None;
        }
        self.get(row as usize, col as usize)
    }

    /// True iff (row, col) is on the board and empty.
    pub fn is_valid_move(&self, row: usize, col: usize) -> bool {
        self.get(row, col) == Some(Stone::Empty)
    }

    /// Every empty cell with at least one occupied king-move neighbour, in
    /// row-major order.
    ///
    /// An empty board yields no moves; callers must handle the opening move
    /// themselves (see [`Board::center`]).
    pub fn legal_moves(&self) -> Vec<Point> {
        let mut moves = Vec::new();
        for row in 0..self.size {
            for col in 0..self.size {
                if self.cells[self.idx(row, col)] == Stone::Empty && self.has_neighbor(row, col) {
                    moves.push((row, col));
                }
            }
        }
        moves
    }

    fn has_neighbor(&self, row: usize, col: usize) -> bool {
        NEIGHBORS.iter().any(|&(dr, dc)| {
            matches!(
                self.stone_at(row as isize + dr, col as isize + dc),
                Some(s) if s.is_player()
            )
        })
    }

    /// Place `stone` at (row, col), reporting why the placement was refused.
    pub fn try_play(&mut self, row: usize, col: usize, stone: Stone) -> Result<(), MoveError> {
        if !stone.is_player() {
            return Err(MoveError::EmptyStone);
        }
        match self.get(row, col) {
            None => Err(MoveError::OutOfBounds { row, col }),
            Some(Stone::Empty) => {
                let i = self.idx(row, col);
                self.cells[i] = stone;
                self.last_move = Some((row, col));
                Ok(())
            }
            Some(_) => Err(MoveError::Occupied { row, col }),
        }
    }

    /// Place `stone` at (row, col). Invalid placements are silently ignored.
    pub fn perform_move(&mut self, row: usize, col: usize, stone: Stone) {
        let _ = self.try_play(row, col, stone);
    }

    /// True when someone has five in a row or no empty cell is left.
    pub fn is_terminal(&self) -> bool {
        self.winner() != Stone::Empty || self.is_full()
    }

    /// Owner of the first (row-major) stone anchoring a winning line, or
    /// `Stone::Empty` if there is none.
    pub fn winner(&self) -> Stone {
        for row in 0..self.size {
            for col in 0..self.size {
                let stone = self.cells[self.idx(row, col)];
                if stone.is_player() && self.check_winner(row, col) {
                    return stone;
                }
            }
        }
        Stone::Empty
    }

    /// Does the stone at (row, col) sit on a line of at least `WIN_LENGTH`?
    fn check_winner(&self, row: usize, col: usize) -> bool {
        let player = self.cells[self.idx(row, col)];
        let (r, c) = (row as isize, col as isize);

        AXES.iter().any(|&(dr, dc)| {
            let forward = (1..WIN_LENGTH as isize)
                .take_while(|&i| self.stone_at(r + i * dr, c + i * dc) == Some(player))
                .count();
            let backward = (1..WIN_LENGTH as isize)
                .take_while(|&i| self.stone_at(r - i * dr, c - i * dc) == Some(player))
                .count();
            1 + forward + backward >= WIN_LENGTH
        })
    }

    /// Independent deep copy of the board.
    pub fn copy(&self) -> Board {
        self.clone()
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|s| s.is_player()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.stone_count() == 0
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|s| s.is_player())
    }

    /// Centre cell, used for the opening move on an empty board.
    pub fn center(&self) -> Point {
        (self.size / 2, self.size / 2)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Width of the widest index, so every column lines up.
        let w = (self.size - 1).to_string().len();
        write!(f, "{:w$}", "")?;
        for col in 0..self.size {
            write!(f, " {col:>w$}")?;
        }
        writeln!(f)?;
        for row in 0..self.size {
            write!(f, "{row:>w$}")?;
            for col in 0..self.size {
                write!(f, " {:>w$}", self.cells[self.idx(row, col)].symbol())?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
