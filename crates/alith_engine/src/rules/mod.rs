//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. They make no legality assumptions
//! and can be called on any arrangement of marks, reachable or not.

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::{LINES, check_winner};

use crate::types::{Board, Outcome};

/// Classifies a board as ongoing, won or drawn.
///
/// A completed line takes precedence over a full board.
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(mark) = check_winner(board) {
        Outcome::Win(mark)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    }
}

/// Legal moves in ascending index order.
///
/// Empty on a terminal board, even if some cells are still free.
pub fn legal_moves(board: &Board) -> Vec<usize> {
    if evaluate(board).is_terminal() {
        return Vec::new();
    }
    board.empty_cells()
}

/// Returns true if `pos` is a legal move on `board`.
pub fn is_legal(board: &Board, pos: usize) -> bool {
    board.is_empty(pos) && !evaluate(board).is_terminal()
}
