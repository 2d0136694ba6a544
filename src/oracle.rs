//! The move-suggestion oracle seam.

use crate::llm_client::LlmClient;
use async_trait::async_trait;
use derive_more::{Display, Error};
use tracing::{instrument, warn};

/// An external, untrusted source of move suggestions.
///
/// Implementations send one prompt and return the raw reply text. The
/// reply is never trusted; see [`reconcile`](crate::reconcile).
#[async_trait]
pub trait MoveOracle: Send + Sync {
    /// Sends a prompt and returns the raw reply.
    async fn suggest(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError>;
}

#[async_trait]
impl MoveOracle for LlmClient {
    async fn suggest(&self, system_prompt: &str, user_prompt: &str) -> Result<String, OracleError> {
        self.generate(system_prompt, user_prompt)
            .await
            .map_err(|e| OracleError::new(OracleErrorKind::Unavailable(e.message)))
    }
}

/// Why the oracle produced no reply.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum OracleErrorKind {
    /// Transport failure or non-success response.
    #[display("oracle unavailable: {_0}")]
    Unavailable(String),
    /// No reply within the allotted time.
    #[display("oracle timed out after {_0} ms")]
    Timeout(u64),
}

/// Oracle error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Oracle error: {} at {}:{}", kind, file, line)]
pub struct OracleError {
    /// Error kind.
    pub kind: OracleErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl OracleError {
    /// Creates a new oracle error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: OracleErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        warn!(kind = %kind, "Oracle error created");
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
