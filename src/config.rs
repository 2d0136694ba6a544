//! Configuration for the Alith opponent.

use crate::llm_client::{LlmConfig, LlmProvider};
use alith_engine::{Difficulty, Mark};
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for a match against Alith.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct AlithConfig {
    /// Skill tier.
    #[serde(default)]
    difficulty: Difficulty,

    /// Mark played by the human. Alith plays the other one.
    #[serde(default = "default_human_mark")]
    human_mark: Mark,

    /// Whether the hard tier consults the LLM oracle.
    #[serde(default = "default_oracle_enabled")]
    oracle_enabled: bool,

    /// LLM provider (openai, anthropic or xai).
    #[serde(default = "default_provider")]
    llm_provider: LlmProvider,

    /// LLM model name. Defaults to the provider's model.
    #[serde(default)]
    llm_model: Option<String>,

    /// Maximum tokens for LLM responses.
    #[serde(default = "default_max_tokens")]
    llm_max_tokens: u32,

    /// Seconds to wait for the oracle before falling back.
    #[serde(default = "default_oracle_timeout_secs")]
    oracle_timeout_secs: u64,

    /// Seed for the random tiers. Entropy when absent.
    #[serde(default)]
    seed: Option<u64>,
}

#[instrument]
fn default_human_mark() -> Mark {
    Mark::X
}

#[instrument]
fn default_oracle_enabled() -> bool {
    true
}

#[instrument]
fn default_provider() -> LlmProvider {
    LlmProvider::Xai
}

#[instrument]
fn default_max_tokens() -> u32 {
    150
}

#[instrument]
fn default_oracle_timeout_secs() -> u64 {
    10
}

impl Default for AlithConfig {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::default(),
            human_mark: default_human_mark(),
            oracle_enabled: default_oracle_enabled(),
            llm_provider: default_provider(),
            llm_model: None,
            llm_max_tokens: default_max_tokens(),
            oracle_timeout_secs: default_oracle_timeout_secs(),
            seed: None,
        }
    }
}

impl AlithConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(difficulty = %config.difficulty, human = %config.human_mark, "Config loaded successfully");
        Ok(config)
    }

    /// Mark played by Alith.
    #[instrument(skip(self))]
    pub fn engine_mark(&self) -> Mark {
        self.human_mark.opponent()
    }

    /// Oracle timeout as a duration.
    #[instrument(skip(self))]
    pub fn oracle_timeout(&self) -> Duration {
        Duration::from_secs(self.oracle_timeout_secs)
    }

    /// Configured model, or the provider's default.
    #[instrument(skip(self))]
    pub fn resolved_model(&self) -> String {
        self.llm_model
            .clone()
            .unwrap_or_else(|| self.llm_provider.default_model().to_string())
    }

    /// True when the oracle should be consulted at all.
    #[instrument(skip(self))]
    pub fn uses_oracle(&self) -> bool {
        self.oracle_enabled && self.difficulty == Difficulty::Hard
    }

    /// Creates LLM configuration from this config.
    ///
    /// Requires the provider's API key variable (`OPENAI_API_KEY`,
    /// `ANTHROPIC_API_KEY` or `XAI_API_KEY`).
    #[instrument(skip(self), fields(provider = ?self.llm_provider))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");

        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.resolved_model(),
            self.llm_max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
