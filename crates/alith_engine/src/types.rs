//! Core domain types for tic-tac-toe.

use crate::error::{BoardError, BoardErrorKind};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of cells on the board.
pub const CELLS: usize = 9;

/// Index of the center cell.
pub const CENTER: usize = 4;

/// A player's symbol.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Mark {
    /// X (moves first).
    X,
    /// O (moves second).
    O,
}

impl Mark {
    /// Returns the opponent's mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Square {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell holding a mark.
    Occupied(Mark),
}

impl Square {
    /// Returns the mark in this cell, if any.
    pub fn mark(self) -> Option<Mark> {
        match self {
            Square::Empty => None,
            Square::Occupied(mark) => Some(mark),
        }
    }
}

impl From<Option<Mark>> for Square {
    fn from(cell: Option<Mark>) -> Self {
        cell.map_or(Square::Empty, Square::Occupied)
    }
}

/// 3x3 board in row-major order (0-8).
///
/// The board does not know whose turn it is. Callers pass the side to
/// move explicitly; nothing here infers it from mark counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Board {
    squares: [Square; CELLS],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Square::Empty; CELLS],
        }
    }

    /// Gets the square at the given position (0-8).
    pub fn get(&self, pos: usize) -> Option<Square> {
        self.squares.get(pos).copied()
    }

    /// Sets the square at the given position.
    pub fn set(&mut self, pos: usize, square: Square) -> Result<(), BoardError> {
        let slot = self
            .squares
            .get_mut(pos)
            .ok_or(BoardErrorKind::OutOfBounds(pos))?;
        *slot = square;
        Ok(())
    }

    /// Checks if a square is empty. Out-of-range positions are never empty.
    pub fn is_empty(&self, pos: usize) -> bool {
        matches!(self.get(pos), Some(Square::Empty))
    }

    /// Returns all squares.
    pub fn squares(&self) -> &[Square; CELLS] {
        &self.squares
    }

    /// Indices of the empty cells in ascending order.
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELLS).filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Number of marks on the board.
    pub fn mark_count(&self) -> usize {
        self.squares.iter().filter(|s| **s != Square::Empty).count()
    }

    /// The board as optional marks, `None` for empty cells.
    pub fn cells(&self) -> [Option<Mark>; CELLS] {
        self.squares.map(Square::mark)
    }

    /// Places a mark without checking occupancy. Used by search backtracking.
    pub(crate) fn place(&mut self, pos: usize, mark: Mark) {
        self.squares[pos] = Square::Occupied(mark);
    }

    /// Clears a cell. Used by search backtracking.
    pub(crate) fn clear(&mut self, pos: usize) {
        self.squares[pos] = Square::Empty;
    }
}

impl TryFrom<&[Square]> for Board {
    type Error = BoardError;

    fn try_from(cells: &[Square]) -> Result<Self, Self::Error> {
        let squares: [Square; CELLS] = cells
            .try_into()
            .map_err(|_| BoardError::new(BoardErrorKind::InvalidLength(cells.len())))?;
        Ok(Self { squares })
    }
}

impl TryFrom<&[Option<Mark>]> for Board {
    type Error = BoardError;

    fn try_from(cells: &[Option<Mark>]) -> Result<Self, Self::Error> {
        let squares: Vec<Square> = cells.iter().copied().map(Square::from).collect();
        Self::try_from(squares.as_slice())
    }
}

impl From<[Option<Mark>; CELLS]> for Board {
    fn from(cells: [Option<Mark>; CELLS]) -> Self {
        Self {
            squares: cells.map(Square::from),
        }
    }
}

/// Parses compact boards such as `"XX..O...."` or `"XX_/_O_/___"`.
///
/// `X`/`O` (any case) are marks, `.`, `_` and `-` are empty cells,
/// `/`, `|` and `,` are ignored as row separators.
impl FromStr for Board {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut squares = Vec::with_capacity(CELLS);
        for ch in s.trim().chars() {
            let square = match ch {
                'X' | 'x' => Square::Occupied(Mark::X),
                'O' | 'o' => Square::Occupied(Mark::O),
                '.' | '_' | '-' => Square::Empty,
                '/' | '|' | ',' => continue,
                other => return Err(BoardError::new(BoardErrorKind::InvalidSymbol(other))),
            };
            squares.push(square);
        }
        Self::try_from(squares.as_slice())
    }
}

/// Renders the grid with empty cells shown as their index.
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..3 {
            for col in 0..3 {
                let pos = row * 3 + col;
                match self.squares[pos] {
                    Square::Empty => write!(f, "{}", pos)?,
                    Square::Occupied(mark) => write!(f, "{}", mark)?,
                }
                if col < 2 {
                    write!(f, "|")?;
                }
            }
            if row < 2 {
                write!(f, "\n-+-+-\n")?;
            }
        }
        Ok(())
    }
}

/// Terminal classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// No line completed and at least one empty cell.
    Ongoing,
    /// The mark completed a line.
    Win(Mark),
    /// Board full with no completed line.
    Draw,
}

impl Outcome {
    /// Returns true for wins and draws.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Skill tier governing how far move selection deviates from optimal play.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Difficulty {
    /// Uniformly random legal moves.
    Easy,
    /// Optimal most of the time, random otherwise.
    Medium,
    /// Always optimal.
    #[default]
    Hard,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_compact_board() {
        let board: Board = "XX_/_O_/___".parse().unwrap();
        assert_eq!(board.get(0), Some(Square::Occupied(Mark::X)));
        assert_eq!(board.get(1), Some(Square::Occupied(Mark::X)));
        assert_eq!(board.get(4), Some(Square::Occupied(Mark::O)));
        assert_eq!(board.mark_count(), 3);
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        let err = "XX..O...".parse::<Board>().unwrap_err();
        assert_eq!(err.kind(), BoardErrorKind::InvalidLength(8));
    }

    #[test]
    fn test_parse_rejects_unknown_symbol() {
        let err = "XX..Q....".parse::<Board>().unwrap_err();
        assert_eq!(err.kind(), BoardErrorKind::InvalidSymbol('Q'));
    }

    #[test]
    fn test_try_from_slice_length() {
        let short = [Square::Empty; 8];
        let err = Board::try_from(&short[..]).unwrap_err();
        assert_eq!(err.kind(), BoardErrorKind::InvalidLength(8));

        let cells = [None; 10];
        let err = Board::try_from(&cells[..]).unwrap_err();
        assert_eq!(err.kind(), BoardErrorKind::InvalidLength(10));
    }

    #[test]
    fn test_set_out_of_bounds() {
        let mut board = Board::new();
        let err = board.set(9, Square::Occupied(Mark::X)).unwrap_err();
        assert_eq!(err.kind(), BoardErrorKind::OutOfBounds(9));
    }

    #[test]
    fn test_display_shows_indices_for_empty_cells() {
        let board: Board = "X.......O".parse().unwrap();
        assert_eq!(board.to_string(), "X|1|2\n-+-+-\n3|4|5\n-+-+-\n6|7|O");
    }

    #[test]
    fn test_opponent_is_an_involution() {
        use strum::IntoEnumIterator;

        let marks: Vec<Mark> = Mark::iter().collect();
        assert_eq!(marks, vec![Mark::X, Mark::O]);
        for mark in marks {
            assert_ne!(mark.opponent(), mark);
            assert_eq!(mark.opponent().opponent(), mark);
            assert_eq!(mark.to_string().parse::<Mark>().unwrap(), mark);
        }
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("HARD".parse::<Difficulty>().unwrap(), Difficulty::Hard);
        assert_eq!("medium".parse::<Difficulty>().unwrap(), Difficulty::Medium);
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert!("expert".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_mark_serializes_as_symbol() {
        let cells = Board::from([Some(Mark::X), None, None, None, Some(Mark::O), None, None, None, None]).cells();
        let json = serde_json::to_string(&cells).unwrap();
        assert_eq!(json, r#"["X",null,null,null,"O",null,null,null,null]"#);
    }
}
