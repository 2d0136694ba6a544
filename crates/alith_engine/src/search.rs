//! Exhaustive minimax search.
//!
//! Full-width, full-depth, no pruning and no transposition table. The
//! 3x3 game tree is small enough that correctness is the only concern.
//!
//! Scores are from the maximizer's point of view and depth-adjusted:
//! a win found `d` plies below the root scores `10 - d`, a loss
//! `d - 10`, so the best line is the fastest win or the slowest loss.

use crate::rules::{evaluate, legal_moves};
use crate::types::{Board, CELLS, CENTER, Mark, Outcome};
use tracing::{debug, instrument, trace};

/// Score of an immediate win.
pub const WIN_SCORE: i32 = 10;

/// Recursive searcher. Owns the maximizer and a node counter.
struct Minimax {
    maximizer: Mark,
    nodes: u64,
}

impl Minimax {
    fn new(maximizer: Mark) -> Self {
        Self {
            maximizer,
            nodes: 0,
        }
    }

    /// Scores `board` with `to_move` to play, restoring every trial placement.
    fn score(&mut self, board: &mut Board, depth: i32, to_move: Mark) -> i32 {
        self.nodes += 1;

        match evaluate(board) {
            Outcome::Win(mark) if mark == self.maximizer => return WIN_SCORE - depth,
            Outcome::Win(_) => return depth - WIN_SCORE,
            Outcome::Draw => return 0,
            Outcome::Ongoing => {}
        }

        let maximizing = to_move == self.maximizer;
        let mut best = if maximizing { i32::MIN } else { i32::MAX };

        for pos in 0..CELLS {
            if !board.is_empty(pos) {
                continue;
            }
            board.place(pos, to_move);
            let child = self.score(board, depth + 1, to_move.opponent());
            board.clear(pos);

            best = if maximizing {
                best.max(child)
            } else {
                best.min(child)
            };
        }

        best
    }
}

/// Game-theoretic value of `board` for `maximizer` with `to_move` to play.
///
/// The minimizing side is `maximizer.opponent()`. The caller's board is
/// not touched; the search backtracks over a private copy.
#[instrument(level = "debug", skip(board), fields(marks = board.mark_count()))]
pub fn score(board: &Board, depth: i32, to_move: Mark, maximizer: Mark) -> i32 {
    let mut work = *board;
    let mut search = Minimax::new(maximizer);
    let value = search.score(&mut work, depth, to_move);
    trace!(value, nodes = search.nodes, "Scored position");
    value
}

/// Score of every legal move for `side`, in ascending cell order.
///
/// Each move is placed and the resulting position scored at depth 0 with
/// the opponent to play.
#[instrument(level = "debug", skip(board), fields(marks = board.mark_count()))]
pub fn move_scores(board: &Board, side: Mark) -> Vec<(usize, i32)> {
    let mut work = *board;
    let mut search = Minimax::new(side);

    let scores: Vec<(usize, i32)> = legal_moves(board)
        .into_iter()
        .map(|pos| {
            work.place(pos, side);
            let value = search.score(&mut work, 0, side.opponent());
            work.clear(pos);
            (pos, value)
        })
        .collect();

    debug!(moves = scores.len(), nodes = search.nodes, "Scored legal moves");
    scores
}

/// Optimal move for `side`, or `None` when the board is terminal or full.
///
/// Ties go to the lowest index. The center is taken without searching
/// only on the first two plies, where it is always optimal.
#[instrument(level = "debug", skip(board), fields(marks = board.mark_count()))]
pub fn best_move(board: &Board, side: Mark) -> Option<usize> {
    if board.mark_count() <= 1 && board.is_empty(CENTER) {
        debug!("Opening: taking the center");
        return Some(CENTER);
    }

    let mut best: Option<(usize, i32)> = None;
    for (pos, value) in move_scores(board, side) {
        if best.is_none_or(|(_, top)| value > top) {
            best = Some((pos, value));
        }
    }

    match best {
        Some((pos, value)) => {
            debug!(position = pos, score = value, "Selected optimal move");
            Some(pos)
        }
        None => {
            debug!("No legal move");
            None
        }
    }
}
