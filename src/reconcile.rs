//! Oracle reconciliation.
//!
//! Merges an untrusted oracle reply with the engine's optimal move. A
//! legal suggestion is passed through untouched, even when it is not
//! optimal. Anything else, including a failed or late call, becomes the
//! fallback move with a neutral comment. No error escapes.

use crate::oracle::{MoveOracle, OracleError, OracleErrorKind};
use crate::prompt::{SYSTEM_PROMPT, user_prompt};
use alith_engine::{Board, CELLS, Mark, best_move, evaluate};
use derive_more::{Display, Error};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Commentary used whenever the oracle's move is replaced.
pub const FALLBACK_COMMENTARY: &str = "I'm having trouble thinking... let's try this.";

/// A validated oracle suggestion: in range, on an empty cell, in a live game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Suggested cell (0-8).
    pub cell: usize,
    /// Free-text commentary, passed through as given.
    pub commentary: String,
}

/// The structured payload expected inside the oracle's reply.
#[derive(Debug, Deserialize)]
struct SuggestionPayload {
    #[serde(rename = "move")]
    cell: i64,
    #[serde(default, alias = "comment")]
    commentary: String,
}

/// Why a reply was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum SuggestionErrorKind {
    /// The reply did not decode to `{ "move": <int>, "commentary": <str> }`.
    #[display("could not decode suggestion: {_0}")]
    Decode(String),
    /// The move is outside 0-8.
    #[display("suggested cell {_0} is out of range")]
    OutOfRange(i64),
    /// The move names an occupied cell.
    #[display("suggested cell {_0} is occupied")]
    Occupied(usize),
    /// The board is already won or drawn.
    #[display("game is already over")]
    GameOver,
}

/// Suggestion error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Suggestion error: {} at {}:{}", kind, file, line)]
pub struct SuggestionError {
    /// Error kind.
    pub kind: SuggestionErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl SuggestionError {
    /// Creates a new suggestion error with caller location tracking.
    #[track_caller]
    #[instrument]
    pub fn new(kind: SuggestionErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Where a reconciled move came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
pub enum MoveSource {
    /// The oracle's own legal suggestion.
    Oracle,
    /// Fallback after the call failed or timed out.
    OracleUnavailable,
    /// Fallback after the reply was undecodable or illegal.
    OracleMalformed,
    /// The difficulty policy, without consulting the oracle.
    Engine,
}

/// Result of reconciliation. `cell` is always legal for the board it was computed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// Cell to play (0-8).
    pub cell: usize,
    /// Commentary to show the user.
    pub commentary: String,
    /// Origin of the move.
    pub source: MoveSource,
}

/// Removes markdown fences and prose around the outermost JSON object.
#[instrument(skip(raw), fields(raw_length = raw.len()))]
pub fn strip_formatting(raw: &str) -> String {
    let unfenced = raw
        .replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "");
    let trimmed = unfenced.trim();

    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if start < end => trimmed[start..=end].to_string(),
        _ => trimmed.to_string(),
    }
}

/// Decodes and validates a raw oracle reply against `board`.
#[instrument(skip(raw, board), fields(raw_length = raw.len()))]
pub fn parse_suggestion(raw: &str, board: &Board) -> Result<Suggestion, SuggestionError> {
    let cleaned = strip_formatting(raw);
    let payload = decode_payload(&cleaned)?;

    if evaluate(board).is_terminal() {
        return Err(SuggestionError::new(SuggestionErrorKind::GameOver));
    }

    let cell = usize::try_from(payload.cell)
        .ok()
        .filter(|&cell| cell < CELLS)
        .ok_or_else(|| SuggestionError::new(SuggestionErrorKind::OutOfRange(payload.cell)))?;

    if !board.is_empty(cell) {
        return Err(SuggestionError::new(SuggestionErrorKind::Occupied(cell)));
    }

    debug!(cell, "Suggestion is legal");
    Ok(Suggestion {
        cell,
        commentary: payload.commentary,
    })
}

/// Decodes the first well-formed payload object in `text`.
///
/// Each `{` is tried as a start position in turn. Text after the decoded
/// object is ignored, so stray braces in surrounding prose do not matter.
fn decode_payload(text: &str) -> Result<SuggestionPayload, SuggestionError> {
    let mut first_error = None;

    for (start, _) in text.match_indices('{') {
        let mut stream =
            serde_json::Deserializer::from_str(&text[start..]).into_iter::<SuggestionPayload>();
        match stream.next() {
            Some(Ok(payload)) => {
                debug!(start, "Decoded suggestion payload");
                return Ok(payload);
            }
            Some(Err(e)) => {
                first_error.get_or_insert_with(|| e.to_string());
            }
            None => {}
        }
    }

    let reason = first_error.unwrap_or_else(|| "no JSON object in reply".to_string());
    Err(SuggestionError::new(SuggestionErrorKind::Decode(reason)))
}

/// Merges an oracle reply with the engine's `fallback_move`.
///
/// `fallback_move` must be legal on `board`; it is the optimal move in
/// practice. Never fails.
#[instrument(skip(board, reply))]
pub fn reconcile(
    board: &Board,
    side: Mark,
    reply: Result<String, OracleError>,
    fallback_move: usize,
) -> Reconciled {
    let raw = match reply {
        Ok(raw) => raw,
        Err(e) => {
            warn!(error = %e, "Oracle call failed, using fallback move");
            return fallback(fallback_move, MoveSource::OracleUnavailable);
        }
    };

    match parse_suggestion(&raw, board) {
        Ok(suggestion) => {
            let optimal = suggestion.cell == fallback_move;
            info!(cell = suggestion.cell, optimal, "Accepted oracle suggestion");
            Reconciled {
                cell: suggestion.cell,
                commentary: suggestion.commentary,
                source: MoveSource::Oracle,
            }
        }
        Err(e) => {
            warn!(error = %e, "Rejected oracle suggestion, using fallback move");
            fallback(fallback_move, MoveSource::OracleMalformed)
        }
    }
}

fn fallback(cell: usize, source: MoveSource) -> Reconciled {
    Reconciled {
        cell,
        commentary: FALLBACK_COMMENTARY.to_string(),
        source,
    }
}

/// Runs one full oracle round for `side`.
///
/// Computes the optimal move, sends it to the oracle as a hint, waits at
/// most `timeout` for a single reply (no retries) and reconciles.
/// Returns `None` when there is no legal move; the oracle is not called.
#[instrument(skip(oracle, board))]
pub async fn consult<O>(oracle: &O, board: &Board, side: Mark, timeout: Duration) -> Option<Reconciled>
where
    O: MoveOracle + ?Sized,
{
    let Some(optimal) = best_move(board, side) else {
        debug!("No legal move, skipping oracle");
        return None;
    };

    let prompt = user_prompt(board, side, Some(optimal));
    let reply = match tokio::time::timeout(timeout, oracle.suggest(SYSTEM_PROMPT, &prompt)).await {
        Ok(reply) => reply,
        Err(_) => Err(OracleError::new(OracleErrorKind::Timeout(
            u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        ))),
    };

    Some(reconcile(board, side, reply, optimal))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(s: &str) -> Board {
        s.parse().unwrap()
    }

    #[test]
    fn test_strip_markdown_fence() {
        let raw = "```json\n{ \"move\": 2, \"commentary\": \"hi\" }\n```";
        assert_eq!(strip_formatting(raw), "{ \"move\": 2, \"commentary\": \"hi\" }");
    }

    #[test]
    fn test_strip_surrounding_prose() {
        let raw = "Sure! Here is my move: {\"move\": 5, \"comment\": \"ha\"} Good luck.";
        assert_eq!(strip_formatting(raw), "{\"move\": 5, \"comment\": \"ha\"}");
    }

    #[test]
    fn test_parse_skips_stray_braces() {
        let b = board("XX./.O./...");
        let s = parse_suggestion(r#"Ok {thinking}: {"move": 7, "commentary": "hi"}"#, &b).unwrap();
        assert_eq!(s.cell, 7);
        assert_eq!(s.commentary, "hi");

        let s = parse_suggestion(r#"{"move": 6, "commentary": "yo"} :-} {bye}"#, &b).unwrap();
        assert_eq!(s.cell, 6);
        assert_eq!(s.commentary, "yo");
    }

    #[test]
    fn test_parse_accepts_comment_alias() {
        let b = board("XX./.O./...");
        let s = parse_suggestion(r#"{"move": 2, "comment": "Not today."}"#, &b).unwrap();
        assert_eq!(s.cell, 2);
        assert_eq!(s.commentary, "Not today.");
    }

    #[test]
    fn test_parse_rejects_negative_and_large() {
        let b = Board::new();
        let err = parse_suggestion(r#"{"move": -1, "commentary": ""}"#, &b).unwrap_err();
        assert_eq!(err.kind, SuggestionErrorKind::OutOfRange(-1));
        let err = parse_suggestion(r#"{"move": 9, "commentary": ""}"#, &b).unwrap_err();
        assert_eq!(err.kind, SuggestionErrorKind::OutOfRange(9));
    }

    #[test]
    fn test_parse_rejects_occupied() {
        let b = board("XX./.O./...");
        let err = parse_suggestion(r#"{"move": 4, "commentary": "mine"}"#, &b).unwrap_err();
        assert_eq!(err.kind, SuggestionErrorKind::Occupied(4));
    }

    #[test]
    fn test_parse_rejects_non_integer_move() {
        let b = Board::new();
        for raw in [r#"{"move": "4"}"#, r#"{"move": 4.5}"#, "I pick the center", ""] {
            let err = parse_suggestion(raw, &b).unwrap_err();
            assert!(matches!(err.kind, SuggestionErrorKind::Decode(_)), "{raw}");
        }
    }

    #[test]
    fn test_parse_rejects_finished_game() {
        let b = board("XXX/OO./...");
        let err = parse_suggestion(r#"{"move": 5}"#, &b).unwrap_err();
        assert_eq!(err.kind, SuggestionErrorKind::GameOver);
    }

    #[test]
    fn test_reconcile_keeps_legal_suboptimal_move() {
        // Optimal is 2 (block), the oracle plays 8 and keeps its move.
        let b = board("XX./.O./...");
        let out = reconcile(&b, Mark::O, Ok(r#"{"move": 8, "commentary": "bold"}"#.into()), 2);
        assert_eq!(out.cell, 8);
        assert_eq!(out.commentary, "bold");
        assert_eq!(out.source, MoveSource::Oracle);
    }
}
