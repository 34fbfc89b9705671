//! Configuration file parsing and structures.
//!
//! The demo binary reads a TOML file naming the cards to mount. Card options
//! reuse the per-card configuration structs; the outer file only adds logging
//! and display settings.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing_subscriber::filter::{LevelFilter, Targets};

use crate::cards::config::{CardConfigError, CycleCardConfig, StatsCardConfig};

/// Top-level configuration structure
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub cards: Vec<CardDefinition>,
}

#[derive(Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,

    /// Per-target level overrides, keyed by module path prefix
    #[serde(default)]
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Build the subscriber filter: the global level as the default, plus
    /// one target directive per override.
    pub fn targets(&self) -> Targets {
        Targets::new()
            .with_default(LevelFilter::from(self.level))
            .with_targets(
                self.overrides
                    .iter()
                    .map(|(target, level)| (target.clone(), LevelFilter::from(*level))),
            )
    }
}

fn default_currency() -> String {
    "€".to_string()
}

#[derive(Debug, Deserialize)]
pub struct DisplayConfig {
    /// Currency symbol appended to cost values
    #[serde(default = "default_currency")]
    pub currency: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
        }
    }
}

/// One card to mount, dispatched on `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum CardDefinition {
    Cycle(CycleCardConfig),
    Stats(StatsCardConfig),
}

impl CardDefinition {
    pub fn entity(&self) -> &str {
        match self {
            Self::Cycle(c) => &c.entity,
            Self::Stats(c) => &c.entity,
        }
    }

    pub fn validate(&self) -> Result<(), CardConfigError> {
        match self {
            Self::Cycle(c) => c.validate(),
            Self::Stats(c) => c.validate(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        let config: Config = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every card definition before anything is mounted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for card in &self.cards {
            card.validate()
                .map_err(|e| ConfigError::Card(card.entity().to_string(), e))?;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid card for {0}: {1}")]
    Card(String, #[source] CardConfigError),
}
