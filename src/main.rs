//! Gomoku-MCTS: play five-in-a-row against a Monte Carlo Tree Search engine.
//!
//! ## Usage
//!
//! - `gomoku-mcts` - Play a game (human is X and moves first)
//! - `gomoku-mcts play --engine-first` - Let the engine open
//! - `gomoku-mcts demo` - Run one search on a fixed position

use std::io;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use flexi_logger::{Logger, opt_format};

use gomoku_mcts::board::{Board, Stone};
use gomoku_mcts::constants::{BOARD_SIZE, EXPLORATION_WEIGHT, N_ITERATIONS};
use gomoku_mcts::driver::Driver;
use gomoku_mcts::game::Game;
use gomoku_mcts::mcts::Mcts;

/// Gomoku-MCTS: five-in-a-row against an MCTS engine
#[derive(Parser)]
#[command(name = "gomoku-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a game against the engine on the terminal
    Play(EngineArgs),
    /// Run a single search on a sample position and print the chosen move
    Demo(EngineArgs),
}

#[derive(Args, Clone)]
struct EngineArgs {
    /// Board size (NxN)
    #[arg(long, default_value_t = BOARD_SIZE)]
    size: usize,
    /// Search iterations per engine move
    #[arg(long, default_value_t = N_ITERATIONS)]
    iterations: usize,
    /// Seed for the engine's random playouts
    #[arg(long)]
    seed: Option<u64>,
    /// UCT exploration constant
    #[arg(long, default_value_t = EXPLORATION_WEIGHT)]
    exploration: f64,
    /// Let the engine make the first move
    #[arg(long)]
    engine_first: bool,
}

impl Default for EngineArgs {
    fn default() -> Self {
        Self {
            size: BOARD_SIZE,
            iterations: N_ITERATIONS,
            seed: None,
            exploration: EXPLORATION_WEIGHT,
            engine_first: false,
        }
    }
}

impl EngineArgs {
    fn engine(&self) -> Mcts {
        let engine = match self.seed {
            Some(seed) => Mcts::with_seed(Stone::White, seed),
            None => Mcts::new(Stone::White),
        };
        engine.with_exploration(self.exploration)
    }
}

fn main() -> Result<()> {
    let _logger = Logger::try_with_env_or_str("info")?
        .format(opt_format)
        .start()?;

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Play(args)) => run_game(&args),
        Some(Commands::Demo(args)) => run_demo(&args),
        None => run_game(&EngineArgs::default()),
    }
}

fn run_game(args: &EngineArgs) -> Result<()> {
    anyhow::ensure!(args.size > 0, "board size must be positive");

    let first = if args.engine_first {
        Stone::White
    } else {
        Stone::Black
    };
    let game = Game::new(args.size, first);
    let mut driver = Driver::new(game, args.engine(), args.iterations);
    driver.run(io::stdin().lock(), io::stdout())?;
    Ok(())
}

fn run_demo(args: &EngineArgs) -> Result<()> {
    anyhow::ensure!(args.size >= 5, "demo needs a board of at least 5x5");

    println!("Gomoku-MCTS: five-in-a-row MCTS engine\n");

    let mut board = Board::new(args.size);
    let c = args.size / 2;
    board.perform_move(c, c, Stone::Black);
    board.perform_move(c, c - 1, Stone::White);
    board.perform_move(c - 1, c, Stone::Black);
    println!("{board}");

    let mut engine = args.engine();
    println!("Running {} MCTS iterations...", args.iterations);
    match engine.choose_move(&board, args.iterations) {
        Some((row, col)) => {
            board.perform_move(row, col, engine.player());
            println!("Best move: {row}, {col}\n");
            println!("{board}");
        }
        None => println!("Game is already over"),
    }
    Ok(())
}
