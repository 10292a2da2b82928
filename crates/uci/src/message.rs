//! Messages sent from an engine back to the GUI.

/// Messages sent from engine to GUI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineMessage {
    /// Engine identification; one field per `id` line.
    Id {
        name: Option<String>,
        author: Option<String>,
    },
    /// UCI initialization complete.
    UciOk,
    /// Engine is ready.
    ReadyOk,
    /// Search information, kept as the raw text after `info`.
    Info(String),
    /// Best move found.
    BestMove { mv: String, ponder: Option<String> },
    /// Anything else, including `option` declarations.
    Unknown(String),
}

impl EngineMessage {
    /// Parses one line of engine output.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "uciok" => EngineMessage::UciOk,
            "readyok" => EngineMessage::ReadyOk,
            "info" => EngineMessage::Info(rest.to_string()),
            "id" => Self::parse_id(rest).unwrap_or_else(|| EngineMessage::Unknown(line.to_string())),
            "bestmove" => {
                let mut parts = rest.split_whitespace();
                match parts.next() {
                    Some(mv) => {
                        let ponder = match (parts.next(), parts.next()) {
                            (Some("ponder"), Some(p)) => Some(p.to_string()),
                            _ => None,
                        };
                        EngineMessage::BestMove {
                            mv: mv.to_string(),
                            ponder,
                        }
                    }
                    None => EngineMessage::Unknown(line.to_string()),
                }
            }
            _ => EngineMessage::Unknown(line.to_string()),
        }
    }

    fn parse_id(rest: &str) -> Option<Self> {
        let (key, value) = rest.split_once(char::is_whitespace)?;
        let value = Some(value.trim().to_string());
        match key {
            "name" => Some(EngineMessage::Id {
                name: value,
                author: None,
            }),
            "author" => Some(EngineMessage::Id {
                name: None,
                author: value,
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_replies() {
        assert_eq!(EngineMessage::parse("uciok"), EngineMessage::UciOk);
        assert_eq!(EngineMessage::parse("readyok\n"), EngineMessage::ReadyOk);
        assert_eq!(
            EngineMessage::parse("id name Stockfish 16"),
            EngineMessage::Id {
                name: Some("Stockfish 16".to_string()),
                author: None
            }
        );
        assert_eq!(
            EngineMessage::parse("id author the Stockfish developers"),
            EngineMessage::Id {
                name: None,
                author: Some("the Stockfish developers".to_string())
            }
        );
    }

    #[test]
    fn bestmove() {
        assert_eq!(
            EngineMessage::parse("bestmove e2e4"),
            EngineMessage::BestMove {
                mv: "e2e4".to_string(),
                ponder: None
            }
        );
        assert_eq!(
            EngineMessage::parse("bestmove e7e8q ponder d8e8"),
            EngineMessage::BestMove {
                mv: "e7e8q".to_string(),
                ponder: Some("d8e8".to_string())
            }
        );
        assert!(matches!(
            EngineMessage::parse("bestmove"),
            EngineMessage::Unknown(_)
        ));
    }

    #[test]
    fn info_and_unknown() {
        assert_eq!(
            EngineMessage::parse("info depth 5 score cp 20"),
            EngineMessage::Info("depth 5 score cp 20".to_string())
        );
        assert_eq!(
            EngineMessage::parse("option name Hash type spin"),
            EngineMessage::Unknown("option name Hash type spin".to_string())
        );
        assert_eq!(EngineMessage::parse(""), EngineMessage::Unknown(String::new()));
    }
}
