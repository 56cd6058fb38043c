//! Rule variants and computer-player settings, loadable from TOML.

use crate::engine::WIN_THRESHOLD;
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Whether a player who can capture is forced to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CaptureRule {
    /// Simple moves stay legal even when a jump is available.
    #[default]
    Optional,
    /// A simple move is rejected whenever the side to move has any jump.
    Mandatory,
}

/// The rule set a game is played under.
///
/// The rule engine (`Rules::validate`, `Rules::apply`, `Rules::take_turn`,
/// `Rules::winner`) lives in [`crate::engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub capture_rule: CaptureRule,
    /// Captures needed to win. Defaults to the starting piece count per side.
    pub win_threshold: u32,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            capture_rule: CaptureRule::Optional,
            win_threshold: WIN_THRESHOLD,
        }
    }
}

/// How the computer player picks its move.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// Bounded-depth exploration of every continuation.
    #[default]
    Lookahead,
    /// Single-ply scoring with random tie-breaking.
    Greedy,
}

/// Default number of plies explored by [`Strategy::Lookahead`].
pub const DEFAULT_SEARCH_DEPTH: u32 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub strategy: Strategy,
    pub depth: u32,
    /// Seed for the greedy tie-breaker. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            strategy: Strategy::Lookahead,
            depth: DEFAULT_SEARCH_DEPTH,
            seed: None,
        }
    }
}

/// Top-level configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub rules: Rules,
    pub search: SearchConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path` if given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Validation(
                "search.depth must be >= 1".into(),
            ));
        }
        if self.rules.win_threshold == 0 || self.rules.win_threshold > WIN_THRESHOLD {
            return Err(ConfigError::Validation(format!(
                "rules.win_threshold must be in 1..={}",
                WIN_THRESHOLD
            )));
        }
        Ok(())
    }
}
