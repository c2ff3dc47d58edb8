//! Random playouts (game simulation) used to evaluate search leaves.
//!
//! Every stone placed during a playout belongs to the searching player: the
//! engine only ever simulates its own continuation, and the result is scored
//! against that same side in backpropagation.

use fastrand::Rng;

use crate::board::{Board, Point, Stone};

/// Pick a uniformly random move from `moves`.
#[inline]
pub fn random_move(moves: &[Point], rng: &mut Rng) -> Option<Point> {
    if moves.is_empty() {
        return None;
    }
    Some(moves[rng.usize(..moves.len())])
}

/// Play random legal moves for `player` on a copy of `board` until the game
/// ends, and return the winner (`Stone::Empty` on a draw).
///
/// A board with stones left to place but no adjacent candidate (only
/// possible when it is empty) ends the playout as it stands.
pub fn simulate(board: &Board, player: Stone, rng: &mut Rng) -> Stone {
    let mut state = board.copy();

    while !state.is_terminal() {
        let Some((row, col)) = random_move(&state.legal_moves(), rng) else {
            break;
        };
        state.perform_move(row, col, player);
    }

    state.winner()
}
