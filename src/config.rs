//! Game configuration loaded from TOML.

use crate::games::quantum::{BotMode, BotTypeError, DEFAULT_MAX_COLLAPSE_ATTEMPTS};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument, warn};

/// Settings for a game session.
///
/// ```toml
/// bot = "hard"
/// seed = 42
/// max_collapse_attempts = 500
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Opponent mode token (none, easy or hard).
    #[serde(default = "default_bot")]
    bot: String,

    /// Seed for the bot's generator; random when absent.
    #[serde(default)]
    seed: Option<u64>,

    /// Samples the bot draws before giving up on a collapse.
    #[serde(default = "default_max_collapse_attempts")]
    max_collapse_attempts: u32,
}

#[instrument]
fn default_bot() -> String {
    "none".to_string()
}

#[instrument]
fn default_max_collapse_attempts() -> u32 {
    DEFAULT_MAX_COLLAPSE_ATTEMPTS
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            bot: default_bot(),
            seed: None,
            max_collapse_attempts: default_max_collapse_attempts(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| ConfigError::read(e))?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::parse(e))?;

        info!(bot = %config.bot, "Config loaded successfully");
        Ok(config)
    }

    /// Overrides the file values with command-line ones.
    #[instrument(skip(self))]
    pub fn with_overrides(mut self, bot: Option<String>, seed: Option<u64>) -> Self {
        if let Some(bot) = bot {
            self.bot = bot;
        }
        if seed.is_some() {
            self.seed = seed;
        }
        self
    }

    /// The opponent mode, validated.
    #[instrument(skip(self))]
    pub fn bot_mode(&self) -> Result<BotMode, BotTypeError> {
        self.bot.parse()
    }
}

/// Which step of loading the game config failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ConfigStage {
    /// The file could not be read.
    Read,
    /// The file is not valid game config TOML.
    Parse,
}

/// Failure to load the game config, tagged with where it was raised.
#[derive(Debug, Clone, Display, Error)]
#[display("Cannot {} game config: {} (raised at {}:{})", stage, message, file, line)]
pub struct ConfigError {
    /// Failed step.
    pub stage: ConfigStage,
    /// Underlying cause.
    pub message: String,
    /// Line that raised the error.
    pub line: u32,
    /// Source file that raised the error.
    pub file: &'static str,
}

impl ConfigError {
    /// The config file could not be read.
    #[track_caller]
    pub fn read(cause: impl std::fmt::Display) -> Self {
        Self::at(ConfigStage::Read, cause.to_string())
    }

    /// The config file did not parse.
    #[track_caller]
    pub fn parse(cause: impl std::fmt::Display) -> Self {
        Self::at(ConfigStage::Parse, cause.to_string())
    }

    #[track_caller]
    fn at(stage: ConfigStage, message: String) -> Self {
        let loc = std::panic::Location::caller();
        warn!(%stage, %message, "Game config rejected");
        Self {
            stage,
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
