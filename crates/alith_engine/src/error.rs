//! Error types for board construction and move application.

use derive_more::{Display, Error};
use tracing::instrument;

/// What went wrong with a board or a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum BoardErrorKind {
    /// The input did not describe exactly nine cells.
    #[display("board must have 9 cells, got {_0}")]
    InvalidLength(usize),
    /// A board string contained a character that is not a mark or an empty cell.
    #[display("invalid cell symbol '{_0}'")]
    InvalidSymbol(char),
    /// Cell index outside 0-8.
    #[display("cell {_0} is out of bounds (must be 0-8)")]
    OutOfBounds(usize),
    /// Cell already holds a mark.
    #[display("cell {_0} is already occupied")]
    Occupied(usize),
    /// The game has already been won or drawn.
    #[display("game is already over")]
    GameOver,
}

/// Board error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", kind, file, line)]
pub struct BoardError {
    /// Error kind.
    pub kind: BoardErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: BoardErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns the error kind.
    pub fn kind(&self) -> BoardErrorKind {
        self.kind
    }
}

impl From<BoardErrorKind> for BoardError {
    #[track_caller]
    fn from(kind: BoardErrorKind) -> Self {
        Self::new(kind)
    }
}
