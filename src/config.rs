//! Runtime configuration for the viewer and the simulation runner.
//!
//! Every section is optional; a missing file section falls back to its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub game: GameConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct GameConfig {
    /// Die seed. `None` draws from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SimulationConfig {
    /// Games per run.
    #[serde(default = "default_games")]
    pub games: u32,
    /// A game still running after this many events is counted as unfinished.
    #[serde(default = "default_max_events")]
    pub max_events: u32,
}

fn default_games() -> u32 {
    1000
}

fn default_max_events() -> u32 {
    20_000
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: default_games(),
            max_events: default_max_events(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_filter")]
    pub filter: String,
}

fn default_filter() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_filter() }
    }
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Loads `path` if given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parses() {
        let config = Config::from_yaml_str(
            "game:\n  seed: 42\nsimulation:\n  games: 10\n  max_events: 500\nlogging:\n  filter: debug\n",
        )
        .unwrap();
        assert_eq!(config.game.seed, Some(42));
        assert_eq!(config.simulation.games, 10);
        assert_eq!(config.simulation.max_events, 500);
        assert_eq!(config.logging.filter, "debug");
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::from_yaml_str("simulation:\n  games: 3\n").unwrap();
        assert_eq!(config.game.seed, None);
        assert_eq!(config.simulation.games, 3);
        assert_eq!(config.simulation.max_events, default_max_events());
        assert_eq!(config.logging, LoggingConfig::default());

        assert_eq!(Config::from_yaml_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_input_is_reported() {
        assert!(matches!(Config::from_yaml_str("simulation: [1, 2]"), Err(ConfigError::Yaml(_))));
        assert!(matches!(Config::load("/nonexistent/ludo.yaml"), Err(ConfigError::Io(_))));
    }
}
