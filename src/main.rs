//! Alith - unified CLI
//!
//! Interactive play, single-move queries and position analysis.

#![warn(missing_docs)]

mod cli;

use alith::{AlithConfig, AlithPlayer, Board, Game, Mark, Outcome, best_move, evaluate, move_scores};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command, EngineArgs};
use std::io::Write;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, instrument};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "alith.toml";

/// Log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Play { engine, human } => run_play(engine, human).await,
        Command::Move {
            engine,
            board,
            side,
        } => run_move(engine, board, side).await,
        Command::Analyze { board, side } => run_analyze(board, side),
    }
}

/// Loads the config file and applies command-line overrides.
#[instrument]
fn load_config(args: &EngineArgs) -> Result<AlithConfig> {
    let mut config = match &args.config {
        Some(path) => AlithConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).exists() => AlithConfig::from_file(DEFAULT_CONFIG)?,
        None => {
            debug!("No config file, using defaults");
            AlithConfig::default()
        }
    };

    if let Some(difficulty) = args.difficulty {
        config = config.with_difficulty(difficulty);
    }
    if let Some(seed) = args.seed {
        config = config.with_seed(Some(seed));
    }
    if let Some(provider) = args.provider {
        config = config.with_llm_provider(provider);
    }
    if args.no_oracle {
        config = config.with_oracle_enabled(false);
    }

    Ok(config)
}

/// Run an interactive game on stdin/stdout
async fn run_play(args: EngineArgs, human: Option<Mark>) -> Result<()> {
    let mut config = load_config(&args)?;
    if let Some(human) = human {
        config = config.with_human_mark(human);
    }

    let human = *config.human_mark();
    let mut alith = AlithPlayer::from_config(&config, config.engine_mark());
    let mut game = Game::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    info!(difficulty = %alith.difficulty(), %human, oracle = alith.has_oracle(), "Starting game");
    println!(
        "Tic Tac Toe with Alith ({}). You are {}, X moves first.",
        alith.difficulty(),
        human
    );

    loop {
        println!("\n{}\n", game.board());

        if game.is_over() {
            match game.status() {
                Outcome::Win(mark) if mark == human => println!("You win!"),
                Outcome::Win(_) => println!("Alith wins!"),
                _ => println!("It's a draw!"),
            }
            return Ok(());
        }

        if game.to_move() == human {
            print!("Your move (0-8, q to quit): ");
            std::io::stdout().flush()?;

            let Some(line) = lines.next_line().await? else {
                return Ok(());
            };
            let input = line.trim();
            if input.eq_ignore_ascii_case("q") {
                return Ok(());
            }

            let Ok(pos) = input.parse::<usize>() else {
                println!("Enter a cell number between 0 and 8.");
                continue;
            };
            if let Err(e) = game.make_move(pos) {
                println!("Illegal move: {}", e.kind());
            }
        } else {
            let Some(mv) = alith.choose(game.board()).await else {
                return Ok(());
            };
            game.make_move(mv.cell)
                .context("Alith produced an illegal move")?;
            println!("Alith plays {}.", mv.cell);
            if let Some(commentary) = mv.commentary {
                println!("Alith: {}", commentary);
            }
        }
    }
}

/// Print one move for the given board
async fn run_move(args: EngineArgs, board: Board, side: Mark) -> Result<()> {
    let config = load_config(&args)?;
    let mut alith = AlithPlayer::from_config(&config, side);

    match alith.choose(&board).await {
        Some(mv) => {
            println!("{}", mv.cell);
            if let Some(commentary) = mv.commentary {
                eprintln!("{} ({})", commentary, mv.source);
            }
        }
        None => eprintln!("No legal move: {:?}", evaluate(&board)),
    }
    Ok(())
}

/// Print per-move minimax scores
fn run_analyze(board: Board, side: Mark) -> Result<()> {
    println!("{}\n", board);
    println!("Outcome: {:?}", evaluate(&board));

    for (cell, score) in move_scores(&board, side) {
        println!("  cell {}: {:+}", cell, score);
    }

    match best_move(&board, side) {
        Some(cell) => println!("Best move for {}: {}", side, cell),
        None => println!("No legal move for {}", side),
    }
    Ok(())
}
