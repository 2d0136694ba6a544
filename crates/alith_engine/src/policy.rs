//! Difficulty-tiered move selection on top of the search.
//!
//! Randomness is always injected, so a seeded generator makes every
//! tier reproducible.

use crate::error::BoardError;
use crate::rules::legal_moves;
use crate::search::best_move;
use crate::types::{Board, Difficulty, Mark, Square};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, instrument};

/// Probability that the medium tier plays the optimal move.
pub const MEDIUM_OPTIMAL_RATE: f64 = 0.7;

/// Uniformly random legal move, or `None` if there is none.
pub fn random_move<R: Rng>(board: &Board, rng: &mut R) -> Option<usize> {
    legal_moves(board).choose(rng).copied()
}

/// Picks a move for `side` according to `difficulty`.
///
/// Each call is independent: the medium tier draws a fresh coin every
/// time and keeps no running tally.
#[instrument(level = "debug", skip(board, rng))]
pub fn select_move<R: Rng>(
    board: &Board,
    side: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Option<usize> {
    match difficulty {
        Difficulty::Easy => random_move(board, rng),
        Difficulty::Medium => {
            if rng.gen_bool(MEDIUM_OPTIMAL_RATE) {
                best_move(board, side)
            } else {
                debug!("Medium tier playing a random move");
                random_move(board, rng)
            }
        }
        Difficulty::Hard => best_move(board, side),
    }
}

/// Picks a move from raw cells.
///
/// Fails with [`BoardErrorKind::InvalidLength`](crate::BoardErrorKind::InvalidLength)
/// before any search if `cells` is not exactly nine long. `Ok(None)`
/// means there is no legal move.
#[instrument(level = "debug", skip(cells, rng), fields(cells = cells.len()))]
pub fn choose_move<R: Rng>(
    cells: &[Square],
    side: Mark,
    difficulty: Difficulty,
    rng: &mut R,
) -> Result<Option<usize>, BoardError> {
    let board = Board::try_from(cells)?;
    Ok(select_move(&board, side, difficulty, rng))
}

/// A difficulty tier bound to its own random source.
#[derive(Debug, Clone)]
pub struct MovePolicy<R> {
    difficulty: Difficulty,
    rng: R,
}

impl MovePolicy<StdRng> {
    /// Policy backed by `StdRng`, seeded when `seed` is given and from
    /// system entropy otherwise.
    #[instrument]
    pub fn seeded(difficulty: Difficulty, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::new(difficulty, rng)
    }
}

impl<R: Rng> MovePolicy<R> {
    /// Creates a policy with the given random source.
    pub fn new(difficulty: Difficulty, rng: R) -> Self {
        Self { difficulty, rng }
    }

    /// The configured tier.
    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    /// Changes the tier. The random source is kept.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
    }

    /// Picks a move for `side`.
    pub fn choose(&mut self, board: &Board, side: Mark) -> Option<usize> {
        select_move(board, side, self.difficulty, &mut self.rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardErrorKind;
    use strum::IntoEnumIterator;

    fn rng(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_wrong_length_rejected_before_search() {
        let cells = [Square::Empty; 7];
        let err = choose_move(&cells, Mark::X, Difficulty::Hard, &mut rng(1)).unwrap_err();
        assert_eq!(err.kind(), BoardErrorKind::InvalidLength(7));
    }

    #[test]
    fn test_every_tier_returns_none_when_no_move() {
        let board: Board = "XXX/OO./...".parse().unwrap();
        let mut r = rng(2);
        for difficulty in Difficulty::iter() {
            for _ in 0..20 {
                assert_eq!(select_move(&board, Mark::O, difficulty, &mut r), None);
            }
        }
    }

    #[test]
    fn test_easy_only_picks_empty_cells() {
        let board: Board = "XO./.X./O..".parse().unwrap();
        let mut r = rng(3);
        for _ in 0..200 {
            let mv = select_move(&board, Mark::O, Difficulty::Easy, &mut r).unwrap();
            assert!(board.is_empty(mv));
        }
    }

    #[test]
    fn test_hard_is_deterministic() {
        let board: Board = "XX./.O./...".parse().unwrap();
        let mut r = rng(4);
        for _ in 0..10 {
            assert_eq!(select_move(&board, Mark::O, Difficulty::Hard, &mut r), Some(2));
        }
    }

    #[test]
    fn test_same_seed_same_moves() {
        let board = Board::new();
        let mut a = MovePolicy::seeded(Difficulty::Easy, Some(42));
        let mut b = MovePolicy::seeded(Difficulty::Easy, Some(42));
        let left: Vec<_> = (0..30).map(|_| a.choose(&board, Mark::X)).collect();
        let right: Vec<_> = (0..30).map(|_| b.choose(&board, Mark::X)).collect();
        assert_eq!(left, right);
    }

    #[test]
    fn test_set_difficulty_switches_tier() {
        let board: Board = "XX./.O./...".parse().unwrap();
        let mut policy = MovePolicy::seeded(Difficulty::Easy, Some(7));

        policy.set_difficulty(Difficulty::Hard);
        assert_eq!(policy.difficulty(), Difficulty::Hard);
        for _ in 0..10 {
            assert_eq!(policy.choose(&board, Mark::O), Some(2));
        }
    }
}
