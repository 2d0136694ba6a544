//! Alith, the engine-side player.

use crate::config::AlithConfig;
use crate::llm_client::LlmClient;
use crate::oracle::MoveOracle;
use crate::reconcile::{MoveSource, consult};
use alith_engine::{Board, Difficulty, Mark, MovePolicy};
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// A move chosen by Alith.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineMove {
    /// Cell to play (0-8).
    pub cell: usize,
    /// Commentary to show, present for oracle-backed moves.
    pub commentary: Option<String>,
    /// Origin of the move.
    pub source: MoveSource,
}

/// Engine-side player: a difficulty policy plus an optional oracle.
///
/// The oracle is only consulted at [`Difficulty::Hard`]. The lower tiers
/// are purely algorithmic.
pub struct AlithPlayer {
    mark: Mark,
    policy: MovePolicy<StdRng>,
    oracle: Option<Arc<dyn MoveOracle>>,
    oracle_timeout: Duration,
}

impl std::fmt::Debug for AlithPlayer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlithPlayer")
            .field("mark", &self.mark)
            .field("difficulty", &self.policy.difficulty())
            .field("oracle", &self.oracle.is_some())
            .field("oracle_timeout", &self.oracle_timeout)
            .finish()
    }
}

impl AlithPlayer {
    /// Creates a player without an oracle.
    #[instrument(skip(policy), fields(difficulty = %policy.difficulty()))]
    pub fn new(mark: Mark, policy: MovePolicy<StdRng>) -> Self {
        Self {
            mark,
            policy,
            oracle: None,
            oracle_timeout: Duration::from_secs(10),
        }
    }

    /// Attaches an oracle with the timeout applied to each call.
    #[instrument(skip(self, oracle))]
    pub fn with_oracle(mut self, oracle: Arc<dyn MoveOracle>, timeout: Duration) -> Self {
        self.oracle = Some(oracle);
        self.oracle_timeout = timeout;
        self
    }

    /// Builds a player for `mark` from configuration.
    ///
    /// A missing API key is not fatal: the player logs a warning and plays
    /// with the search alone.
    #[instrument(skip(config))]
    pub fn from_config(config: &AlithConfig, mark: Mark) -> Self {
        let policy = MovePolicy::seeded(*config.difficulty(), *config.seed());
        let player = Self::new(mark, policy);

        if !config.uses_oracle() {
            debug!("Oracle disabled for this tier");
            return player;
        }

        match config.create_llm_config() {
            Ok(llm) => {
                info!(provider = %llm.provider(), model = %llm.model(), "Oracle enabled");
                player.with_oracle(Arc::new(LlmClient::new(llm)), config.oracle_timeout())
            }
            Err(e) => {
                warn!(error = %e, "Oracle unavailable, playing with search only");
                player
            }
        }
    }

    /// Alith's mark.
    pub fn mark(&self) -> Mark {
        self.mark
    }

    /// Configured tier.
    pub fn difficulty(&self) -> Difficulty {
        self.policy.difficulty()
    }

    /// True if an oracle is attached.
    pub fn has_oracle(&self) -> bool {
        self.oracle.is_some()
    }

    /// Picks a move on `board`, or `None` when there is no legal move.
    #[instrument(skip(self, board), fields(mark = %self.mark, difficulty = %self.policy.difficulty()))]
    pub async fn choose(&mut self, board: &Board) -> Option<EngineMove> {
        if self.policy.difficulty() == Difficulty::Hard
            && let Some(oracle) = &self.oracle
        {
            let reconciled = consult(oracle.as_ref(), board, self.mark, self.oracle_timeout).await?;
            return Some(EngineMove {
                cell: reconciled.cell,
                commentary: Some(reconciled.commentary),
                source: reconciled.source,
            });
        }

        let cell = self.policy.choose(board, self.mark)?;
        debug!(cell, "Policy chose move");
        Some(EngineMove {
            cell,
            commentary: None,
            source: MoveSource::Engine,
        })
    }
}
