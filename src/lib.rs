//! Gomoku-MCTS: five-in-a-row with a Monte Carlo Tree Search opponent.
//!
//! ## Modules
//!
//! - [`constants`] - Board defaults and search parameters
//! - [`board`] - Grid state, move legality and win detection
//! - [`playout`] - Random game simulation for leaf evaluation
//! - [`mcts`] - Search tree and UCT-based tree search
//! - [`game`] - Board plus side to move
//! - [`driver`] - Text-prompt game loop
//!
//! ## Example
//!
//! ```
//! use gomoku_mcts::board::{Board, Stone};
//! use gomoku_mcts::mcts::Mcts;
//!
//! let mut board = Board::default();
//! board.perform_move(4, 4, Stone::Black);
//!
//! let mut engine = Mcts::with_seed(Stone::White, 7);
//! let (row, col) = engine.choose_move(&board, 100).unwrap();
//! assert!(board.legal_moves().contains(&(row, col)));
//! ```

pub mod board;
pub mod constants;
pub mod driver;
pub mod game;
pub mod mcts;
pub mod playout;
