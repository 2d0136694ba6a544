//! Prompts sent to the move oracle.

use alith_engine::{Board, Mark, legal_moves};
use tracing::instrument;

/// Persona and output contract for the oracle.
pub const SYSTEM_PROMPT: &str = "You are a competitive Tic Tac Toe player named Alith.
You are playing against a human.
Your goal is to win, or at least draw.
You will receive the board state as an array of 9 elements (0-8), row by row.
'X' is the first player, 'O' is the second.
Null represents an empty space.

You must output ONLY a JSON object with the following format:
{ \"move\": <index_0_to_8>, \"commentary\": \"<short_witty_comment>\" }

Do not output markdown or any other text. Just the JSON.";

/// Builds the per-move prompt.
///
/// `hint` is the engine's optimal move. It steers the oracle toward
/// sound play without binding it.
#[instrument(skip(board))]
pub fn user_prompt(board: &Board, side: Mark, hint: Option<usize>) -> String {
    let cells = serde_json::json!(board.cells());
    let available = legal_moves(board)
        .iter()
        .map(usize::to_string)
        .collect::<Vec<_>>()
        .join(", ");

    let mut prompt = format!(
        "Current Board: {}\n\n{}\n\nYou are playing as: {}\nAvailable moves: {}\n",
        cells, board, side, available
    );
    if let Some(cell) = hint {
        prompt.push_str(&format!(
            "Strategic hint: a perfect solver recommends cell {}.\n",
            cell
        ));
    }
    prompt.push_str("\nChoose the best move to win or block the opponent.\n");
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_lists_board_side_and_moves() {
        let board: Board = "XX./.O./...".parse().unwrap();
        let prompt = user_prompt(&board, Mark::O, None);
        assert!(prompt.contains(r#"Current Board: ["X","X",null,null,"O",null,null,null,null]"#));
        assert!(prompt.contains("You are playing as: O"));
        assert!(prompt.contains("Available moves: 2, 3, 5, 6, 7, 8"));
        assert!(!prompt.contains("Strategic hint"));
    }

    #[test]
    fn test_prompt_carries_hint() {
        let board: Board = "XX./.O./...".parse().unwrap();
        let prompt = user_prompt(&board, Mark::O, Some(2));
        assert!(prompt.contains("recommends cell 2"));
    }
}
