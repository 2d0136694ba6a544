//! Alith - a tic-tac-toe opponent with an untrusted LLM sidekick.
//!
//! The move-selection core lives in [`alith_engine`]: outcome evaluation,
//! exhaustive minimax and the difficulty tiers. This crate adds the parts
//! that talk to the outside world.
//!
//! # Architecture
//!
//! - **Oracle**: [`MoveOracle`] is the seam to an external suggestion source;
//!   [`LlmClient`] implements it for OpenAI, Anthropic and xAI.
//! - **Reconciliation**: [`consult`] and [`reconcile`] merge the oracle's reply
//!   with the optimal move. Illegal, malformed, failed or late replies fall
//!   back to the optimal move.
//! - **Player**: [`AlithPlayer`] routes Hard through the oracle and the other
//!   tiers through the policy.
//! - **Config**: [`AlithConfig`] loads `alith.toml`.
//!
//! # Example
//!
//! ```no_run
//! use alith::{AlithConfig, AlithPlayer, Board};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = AlithConfig::default();
//! let mut alith = AlithPlayer::from_config(&config, config.engine_mark());
//!
//! let board: Board = "XX./.O./...".parse()?;
//! if let Some(mv) = alith.choose(&board).await {
//!     println!("Alith plays {}", mv.cell);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
pub mod llm_client;
mod oracle;
mod player;
mod prompt;
mod reconcile;

// Crate-level exports - Configuration
pub use config::{AlithConfig, ConfigError};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Oracle
pub use oracle::{MoveOracle, OracleError, OracleErrorKind};
pub use prompt::{SYSTEM_PROMPT, user_prompt};

// Crate-level exports - Reconciliation
pub use reconcile::{
    FALLBACK_COMMENTARY, MoveSource, Reconciled, Suggestion, SuggestionError,
    SuggestionErrorKind, consult, parse_suggestion, reconcile, strip_formatting,
};

// Crate-level exports - Player
pub use player::{AlithPlayer, EngineMove};

// Crate-level exports - Game types
pub use alith_engine::{
    Board, BoardError, BoardErrorKind, Difficulty, Game, Mark, MovePolicy, Outcome, Square,
    best_move, choose_move, evaluate, is_legal, legal_moves, move_scores, score,
};
