//! Turn bookkeeping for a single match.

use crate::error::{BoardError, BoardErrorKind};
use crate::rules::{evaluate, legal_moves};
use crate::types::{Board, CELLS, Mark, Outcome, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// One game of tic-tac-toe. X always moves first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Mark,
    status: Outcome,
    history: Vec<usize>,
}

impl Game {
    /// Creates a new game with X to move.
    #[instrument]
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            status: Outcome::Ongoing,
            history: Vec::new(),
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the side to move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the game status.
    pub fn status(&self) -> Outcome {
        self.status
    }

    /// Returns the move history (positions played).
    pub fn history(&self) -> &[usize] {
        &self.history
    }

    /// Returns true once the game is won or drawn.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<usize> {
        legal_moves(&self.board)
    }

    /// Makes a move for the side to move at the given position (0-8).
    #[instrument(skip(self), fields(player = %self.to_move))]
    pub fn make_move(&mut self, pos: usize) -> Result<Outcome, BoardError> {
        if self.is_over() {
            return Err(BoardError::new(BoardErrorKind::GameOver));
        }

        if pos >= CELLS {
            return Err(BoardError::new(BoardErrorKind::OutOfBounds(pos)));
        }

        if !self.board.is_empty(pos) {
            return Err(BoardError::new(BoardErrorKind::Occupied(pos)));
        }

        let player = self.to_move;
        self.board.set(pos, Square::Occupied(player))?;
        self.history.push(pos);
        self.to_move = player.opponent();
        self.status = evaluate(&self.board);

        debug!(position = pos, status = ?self.status, "Move applied");
        if self.is_over() {
            info!(status = ?self.status, moves = self.history.len(), "Game over");
        }

        Ok(self.status)
    }

    /// Clears the board and gives the move back to X.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
