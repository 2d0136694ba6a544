//! Tests for tier routing in the Alith player.

use alith::{
    AlithPlayer, Board, Difficulty, Game, Mark, MoveOracle, MovePolicy, MoveSource, OracleError,
    Outcome,
};
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Oracle that always suggests the same cell and counts calls.
struct CountingOracle {
    cell: usize,
    calls: AtomicUsize,
}

impl CountingOracle {
    fn new(cell: usize) -> Arc<Self> {
        Arc::new(Self {
            cell,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl MoveOracle for CountingOracle {
    async fn suggest(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!(r#"{{"move": {}, "commentary": "As planned."}}"#, self.cell))
    }
}

fn player(mark: Mark, difficulty: Difficulty, seed: u64) -> AlithPlayer {
    AlithPlayer::new(mark, MovePolicy::seeded(difficulty, Some(seed)))
}

#[tokio::test]
async fn test_hard_consults_oracle() {
    let oracle = CountingOracle::new(7);
    let mut alith = player(Mark::O, Difficulty::Hard, 1)
        .with_oracle(oracle.clone(), Duration::from_secs(5));
    let board: Board = "XX./.O./...".parse().expect("valid board");

    let mv = alith.choose(&board).await.expect("a move");
    assert_eq!(mv.cell, 7);
    assert_eq!(mv.commentary.as_deref(), Some("As planned."));
    assert_eq!(mv.source, MoveSource::Oracle);
    assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_lower_tiers_ignore_oracle() {
    let board: Board = "XX./.O./...".parse().expect("valid board");
    for difficulty in [Difficulty::Easy, Difficulty::Medium] {
        let oracle = CountingOracle::new(7);
        let mut alith = player(Mark::O, difficulty, 2).with_oracle(oracle.clone(), Duration::from_secs(5));

        for _ in 0..20 {
            let mv = alith.choose(&board).await.expect("a move");
            assert_eq!(mv.source, MoveSource::Engine);
            assert_eq!(mv.commentary, None);
            assert!(board.is_empty(mv.cell));
        }
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }
}

#[tokio::test]
async fn test_hard_without_oracle_uses_search() {
    let mut alith = player(Mark::O, Difficulty::Hard, 3);
    let board: Board = "XX./.O./...".parse().expect("valid board");

    let mv = alith.choose(&board).await.expect("a move");
    assert_eq!(mv.cell, 2);
    assert_eq!(mv.source, MoveSource::Engine);
    assert!(!alith.has_oracle());
}

#[tokio::test]
async fn test_no_move_on_finished_board() {
    let mut alith = player(Mark::O, Difficulty::Easy, 4);
    let board: Board = "XXX/OO./...".parse().expect("valid board");
    assert!(alith.choose(&board).await.is_none());
}

#[tokio::test]
async fn test_hard_never_loses_to_random_play() {
    for (seed, engine_mark) in (0..40).zip([Mark::X, Mark::O].into_iter().cycle()) {
        let mut alith = player(engine_mark, Difficulty::Hard, seed);
        let mut opponent = StdRng::seed_from_u64(1000 + seed);
        let mut game = Game::new();

        while !game.is_over() {
            let cell = if game.to_move() == engine_mark {
                alith.choose(game.board()).await.expect("a move").cell
            } else {
                *game.legal_moves().choose(&mut opponent).expect("a move")
            };
            game.make_move(cell).expect("legal move");
        }

        assert_ne!(
            game.status(),
            Outcome::Win(engine_mark.opponent()),
            "seed {} lost: {:?}",
            seed,
            game.history()
        );
    }
}
