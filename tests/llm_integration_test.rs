//! Live oracle round-trips. Run with `--features api`.

use alith::llm_client::{LlmClient, LlmConfig, LlmProvider};
use alith::{Board, Mark, MoveSource, consult, is_legal};
use std::time::Duration;
use tracing::instrument;

fn client(provider: LlmProvider) -> LlmClient {
    dotenvy::dotenv().ok();

    let var = provider.api_key_var();
    let api_key = std::env::var(var).unwrap_or_else(|_| panic!("{} not set", var));

    LlmClient::new(LlmConfig::new(
        provider,
        api_key,
        provider.default_model().to_string(),
        150,
    ))
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_xai_connectivity() {
    let response = client(LlmProvider::Xai)
        .generate("You are a helpful assistant.", "Say 'Hello, world!' and nothing else.")
        .await
        .expect("Failed to generate");

    assert!(!response.is_empty(), "Response should not be empty");
    eprintln!("Response: {}", response);
}

#[tokio::test]
#[cfg_attr(not(feature = "api"), ignore)]
#[instrument]
async fn test_live_oracle_move_is_legal() {
    let oracle = client(LlmProvider::Xai);
    let board: Board = "XX./.O./...".parse().expect("valid board");

    let out = consult(&oracle, &board, Mark::O, Duration::from_secs(20))
        .await
        .expect("a move");

    assert!(is_legal(&board, out.cell));
    eprintln!("{} ({}): {}", out.cell, out.source, out.commentary);
    assert!(matches!(
        out.source,
        MoveSource::Oracle | MoveSource::OracleMalformed | MoveSource::OracleUnavailable
    ));
}
