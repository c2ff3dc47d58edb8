//! Text-prompt game loop between a human and the engine.
//!
//! The human types moves as `row, column` (a space works too). Each turn the
//! board is printed, then either the human is prompted or the engine searches.
//! `quit` or end of input stops the game early.
//!
//! ## Example
//!
//! ```no_run
//! use gomoku_mcts::board::Stone;
//! use gomoku_mcts::driver::Driver;
//! use gomoku_mcts::game::Game;
//! use gomoku_mcts::mcts::Mcts;
//!
//! let game = Game::new(10, Stone::Black);
//! let mut driver = Driver::new(game, Mcts::new(Stone::White), 10_000);
//! driver.run(std::io::stdin().lock(), std::io::stdout()).unwrap();
//! ```

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use log::{info, warn};
use thiserror::Error;

use crate::board::{Point, Stone};
use crate::game::{Game, Outcome};
use crate::mcts::Mcts;

/// Why a line of input is not a move.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoveError {
    #[error("expected two coordinates, got {0}")]
    WrongArity(usize),
    #[error("invalid coordinate {0:?}")]
    InvalidNumber(String),
}

/// Parse `"row, col"` (comma and/or whitespace separated) into a point.
pub fn parse_move(line: &str) -> Result<Point, ParseMoveError> {
    let parts: Vec<&str> = line
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() != 2 {
        return Err(ParseMoveError::WrongArity(parts.len()));
    }

    let coord = |s: &str| {
        s.parse::<usize>()
            .map_err(|_| ParseMoveError::InvalidNumber(s.to_string()))
    };
    Ok((coord(parts[0])?, coord(parts[1])?))
}

/// Drives one game: human on one side, [`Mcts`] on the other.
pub struct Driver {
    game: Game,
    engine: Mcts,
    /// Number of search iterations per engine move
    iterations: usize,
}

impl Driver {
    pub fn new(game: Game, engine: Mcts, iterations: usize) -> Self {
        Self {
            game,
            engine,
            iterations,
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Play until the game ends or the human quits.
    ///
    /// Returns the final outcome, `Outcome::InProgress` if stopped early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<Outcome> {
        let mut lines = input.lines();

        while !self.game.is_over() {
            write!(output, "{}", self.game.board())?;

            if self.game.to_move() == self.engine.player() {
                let Some((row, col)) = self.engine.choose_move(self.game.board(), self.iterations)
                else {
                    break;
                };
                self.game
                    .play((row, col))
                    .context("engine chose an illegal move")?;
                writeln!(output, "Computer plays {row}, {col}")?;
                continue;
            }

            write!(output, "Enter your move (row, column): ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                info!("input closed, stopping game");
                return Ok(Outcome::InProgress);
            };
            let line = line.context("failed to read move")?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.eq_ignore_ascii_case("quit") {
                return Ok(Outcome::InProgress);
            }

            match parse_move(line) {
                Ok(pt) => {
                    if let Err(e) = self.game.play(pt) {
                        warn!("rejected move {line:?}: {e}");
                        writeln!(output, "Illegal move: {e}")?;
                    }
                }
                Err(e) => writeln!(output, "Invalid input: {e}")?,
            }
        }

        write!(output, "{}", self.game.board())?;
        let outcome = self.game.outcome();
        match outcome {
            Outcome::Win(stone) => writeln!(output, "Player {stone} wins!")?,
            Outcome::Draw => writeln!(output, "It's a draw!")?,
            Outcome::InProgress => {}
        }
        output.flush()?;
        info!("game finished: {outcome:?}");
        Ok(outcome)
    }
}
