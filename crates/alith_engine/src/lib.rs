//! Pure tic-tac-toe move selection.
//!
//! Leaves first:
//!
//! - [`evaluate`] classifies a board as ongoing, won or drawn.
//! - [`score`] and [`best_move`] run an exhaustive minimax with
//!   depth-adjusted scores (fastest win, slowest loss).
//! - [`choose_move`] and [`MovePolicy`] pick a move for a [`Difficulty`].
//! - [`Game`] tracks turns and status for one match.
//!
//! Nothing here performs I/O or holds global state. Every call works on
//! its own copy of the board and can run in parallel with any other.

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod game;
mod policy;
pub mod rules;
mod search;
mod types;

pub use error::{BoardError, BoardErrorKind};
pub use game::Game;
pub use policy::{MEDIUM_OPTIMAL_RATE, MovePolicy, choose_move, random_move, select_move};
pub use rules::{evaluate, is_legal, legal_moves};
pub use search::{WIN_SCORE, best_move, move_scores, score};
pub use types::{Board, CELLS, CENTER, Difficulty, Mark, Outcome, Square};
