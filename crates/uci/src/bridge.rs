//! Drives a [`GameSession`] with moves from an external engine.

use crate::{BridgeConfig, EngineProcess, GuiCommand, UciError};
use chess_rules::{GameEvent, GameResult, GameSession};
use tracing::debug;

/// An engine that has completed its handshake, plus the settings used to
/// query it.
pub struct EngineBridge {
    engine: EngineProcess,
    config: BridgeConfig,
}

impl EngineBridge {
    /// Spawns the configured engine and runs the handshake.
    pub fn start(config: BridgeConfig) -> Result<Self, UciError> {
        let mut engine = EngineProcess::spawn(&config.engine_path, &config.engine_args)?;
        engine.handshake(config.handshake_timeout())?;
        Ok(EngineBridge { engine, config })
    }

    pub fn engine_name(&self) -> Option<&str> {
        self.engine.name()
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Asks the engine for its move in the session's current position.
    pub fn request_move(&mut self, session: &GameSession) -> Result<String, UciError> {
        self.engine.send(&GuiCommand::position(session))?;
        self.engine
            .best_move(self.config.go_options(), self.config.move_timeout())
    }

    /// Asks the engine for a move and applies it to `session`.
    pub fn play_move(&mut self, session: &mut GameSession) -> Result<Vec<GameEvent>, UciError> {
        let mv = self.request_move(session)?;
        debug!(%mv, side = %session.side_to_move(), "engine move");
        Ok(session.apply_uci_move(&mv)?)
    }

    /// Lets the engine play both sides until the game ends or the ply limit
    /// is reached. Returns the result, if the game finished.
    pub fn play_out(&mut self, session: &mut GameSession) -> Result<Option<GameResult>, UciError> {
        for _ in 0..self.config.max_plies {
            if session.is_over() {
                break;
            }
            self.play_move(session)?;
        }
        Ok(session.result())
    }

    /// Shuts the engine down.
    pub fn quit(mut self) -> Result<(), UciError> {
        self.engine.quit()
    }
}
