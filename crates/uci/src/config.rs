//! Configuration file loading for the engine bridge.

use crate::GoOptions;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How to launch and drive an external UCI engine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Path to the engine executable. Defaults to "stockfish" on the PATH.
    #[serde(default = "default_engine_path")]
    pub engine_path: PathBuf,
    /// Extra command-line arguments for the engine.
    #[serde(default)]
    pub engine_args: Vec<String>,
    /// How long to wait for `uciok` and `readyok`.
    #[serde(default = "default_handshake_timeout_ms")]
    pub handshake_timeout_ms: u64,
    /// Thinking time requested per move with `go movetime`.
    #[serde(default = "default_move_time_ms")]
    pub move_time_ms: u64,
    /// Optional depth limit sent alongside the thinking time.
    #[serde(default)]
    pub search_depth: Option<u32>,
    /// Upper bound on plies played by [`EngineBridge::play_out`](crate::EngineBridge::play_out).
    #[serde(default = "default_max_plies")]
    pub max_plies: u32,
}

fn default_engine_path() -> PathBuf {
    PathBuf::from("stockfish")
}

fn default_handshake_timeout_ms() -> u64 {
    5000
}

fn default_move_time_ms() -> u64 {
    500
}

fn default_max_plies() -> u32 {
    300
}

impl Default for BridgeConfig {
    fn default() -> Self {
        BridgeConfig {
            engine_path: default_engine_path(),
            engine_args: Vec::new(),
            handshake_timeout_ms: default_handshake_timeout_ms(),
            move_time_ms: default_move_time_ms(),
            search_depth: None,
            max_plies: default_max_plies(),
        }
    }
}

impl BridgeConfig {
    /// Loads the configuration at `path`, or defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// or [`ConfigError::ParseError`] if it contains invalid TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// The `go` options sent for each engine move.
    pub fn go_options(&self) -> GoOptions {
        GoOptions {
            depth: self.search_depth,
            ..GoOptions::movetime(self.move_time_ms)
        }
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_millis(self.handshake_timeout_ms)
    }

    /// How long to wait for `bestmove`: the thinking time plus the
    /// handshake timeout as slack.
    pub fn move_timeout(&self) -> Duration {
        Duration::from_millis(self.move_time_ms + self.handshake_timeout_ms)
    }
}
