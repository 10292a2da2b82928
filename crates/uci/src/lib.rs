//! UCI (Universal Chess Interface) bridge to external engines.
//!
//! This crate lets an external engine supply moves for a
//! [`chess_rules::GameSession`]:
//! - [`GuiCommand`] and [`EngineMessage`] encode and decode the protocol lines
//! - [`EngineProcess`] spawns an engine and reads its replies with timeouts
//! - [`EngineBridge`] sends the session's position and applies `bestmove`
//! - [`BridgeConfig`] is loaded from a TOML file
//!
//! # Standard UCI Commands
//!
//! - `uci` / `uciok` - Initialize engine, get id and options
//! - `isready` / `readyok` - Synchronization
//! - `position fen <fen> [moves <move>...]` - Set position
//! - `go movetime <ms>` - Start search, answered by `bestmove`
//! - `quit` - Exit engine
//!
//! # Example
//!
//! ```no_run
//! use chess_rules::GameSession;
//! use uci::{BridgeConfig, EngineBridge};
//!
//! let config = BridgeConfig::load("bridge.toml")?;
//! let mut bridge = EngineBridge::start(config)?;
//! let mut session = GameSession::new();
//! bridge.play_move(&mut session)?;
//! println!("{}", session.to_fen());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod bridge;
mod command;
mod config;
mod message;
mod process;

pub use bridge::EngineBridge;
pub use command::{GoOptions, GuiCommand};
pub use config::{BridgeConfig, ConfigError};
pub use message::EngineMessage;
pub use process::EngineProcess;

use chess_rules::GameError;
use thiserror::Error;

/// Errors that can occur when communicating with a UCI engine.
#[derive(Error, Debug)]
pub enum UciError {
    /// The engine executable could not be started.
    #[error("failed to spawn engine {path}: {source}")]
    SpawnError {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Reading from or writing to the engine failed.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    /// The engine did not send the expected reply in time.
    #[error("engine did not send {expected} within {timeout_ms} ms")]
    Timeout {
        expected: &'static str,
        timeout_ms: u64,
    },
    /// The engine closed its output.
    #[error("engine process exited")]
    EngineExited,
    /// The engine's move was rejected by the rules engine.
    #[error("engine move rejected: {0}")]
    Rules(#[from] GameError),
}
