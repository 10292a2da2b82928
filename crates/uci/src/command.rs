//! Commands sent from the GUI side to an engine.

use chess_rules::GameSession;
use std::fmt;

/// Commands sent from GUI to engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuiCommand {
    /// Initialize UCI mode.
    Uci,
    /// Check if engine is ready.
    IsReady,
    /// Set up position. `fen: None` means the standard starting position.
    Position {
        fen: Option<String>,
        moves: Vec<String>,
    },
    /// Start calculating.
    Go(GoOptions),
    /// Quit the engine.
    Quit,
}

/// Options for the `go` command.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GoOptions {
    /// Search for exactly this time in milliseconds.
    pub movetime: Option<u64>,
    /// Search to this depth.
    pub depth: Option<u32>,
}

impl GoOptions {
    /// Search for a fixed time.
    pub fn movetime(ms: u64) -> Self {
        GoOptions {
            movetime: Some(ms),
            ..Default::default()
        }
    }
}

impl GuiCommand {
    /// The `position` command reproducing `session` from its starting FEN.
    pub fn position(session: &GameSession) -> Self {
        GuiCommand::Position {
            fen: Some(session.start_fen().to_string()),
            moves: session
                .game()
                .played_moves()
                .iter()
                .map(ToString::to_string)
                .collect(),
        }
    }
}

impl fmt::Display for GuiCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuiCommand::Uci => write!(f, "uci"),
            GuiCommand::IsReady => write!(f, "isready"),
            GuiCommand::Position { fen, moves } => {
                match fen {
                    Some(fen) => write!(f, "position fen {}", fen)?,
                    None => write!(f, "position startpos")?,
                }
                if !moves.is_empty() {
                    write!(f, " moves {}", moves.join(" "))?;
                }
                Ok(())
            }
            GuiCommand::Go(opts) => write!(f, "go{}", opts),
            GuiCommand::Quit => write!(f, "quit"),
        }
    }
}

impl fmt::Display for GoOptions {
    /// Writes each set option with a leading space.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(movetime) = self.movetime {
            write!(f, " movetime {}", movetime)?;
        }
        if let Some(depth) = self.depth {
            write!(f, " depth {}", depth)?;
        }
        Ok(())
    }
}
