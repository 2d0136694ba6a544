//! Command-line interface for alith.

use alith::{Board, Difficulty, LlmProvider, Mark};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Alith - tic-tac-toe against a perfect solver with an LLM personality
#[derive(Parser, Debug)]
#[command(name = "alith")]
#[command(about = "Play tic-tac-toe against Alith", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Settings shared by commands that pick moves.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Path to config file (defaults to alith.toml if present)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Difficulty tier: easy, medium or hard
    #[arg(short, long)]
    pub difficulty: Option<Difficulty>,

    /// Seed for the random tiers
    #[arg(long)]
    pub seed: Option<u64>,

    /// Never consult the LLM oracle
    #[arg(long)]
    pub no_oracle: bool,

    /// LLM provider: openai, anthropic or xai
    #[arg(long)]
    pub provider: Option<LlmProvider>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play an interactive game in the terminal
    Play {
        #[command(flatten)]
        engine: EngineArgs,

        /// Mark you play (X moves first)
        #[arg(long)]
        human: Option<Mark>,
    },

    /// Print Alith's move for a board
    Move {
        #[command(flatten)]
        engine: EngineArgs,

        /// Board as nine cells, e.g. "XX./.O./..." (X, O, and . _ - for empty)
        #[arg(short, long)]
        board: Board,

        /// Side to move
        #[arg(short, long)]
        side: Mark,
    },

    /// Print the minimax score of every legal move
    Analyze {
        /// Board as nine cells, e.g. "X../.O./..X"
        #[arg(short, long)]
        board: Board,

        /// Side to move
        #[arg(short, long)]
        side: Mark,
    },
}
