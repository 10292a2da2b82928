//! Chess rules engine.
//!
//! This crate provides:
//! - [`MoveData`] - legal move generation with checks, pins, castling and en passant
//! - [`Game`] - one position plus turn bookkeeping
//! - [`StateManager`] - snapshot history for undo and redo
//! - [`GameSession`] - the move executor and public API, emitting [`GameEvent`]s
//! - [`rules`] - checkmate, stalemate, repetition and draw rules
//! - [`perft`] - node counting for move generator validation
//!
//! # Architecture
//!
//! The board is a 64-cell mailbox. Move generation is a pure function of a
//! [`Game`]: it walks precomputed edge-distance tables to build attack sets,
//! then filters each piece's destinations by check and pin constraints.
//! A [`GameSession`] records a full snapshot before every move, so undo and
//! redo restore positions exactly.
//!
//! # Example
//!
//! ```
//! use chess_core::Square;
//! use chess_rules::GameSession;
//!
//! let mut session = GameSession::new();
//! let g1 = Square::G1;
//! assert_eq!(session.legal_moves(g1).len(), 2);
//!
//! session.apply_uci_move("g1f3").unwrap();
//! session.undo(false).unwrap();
//! assert_eq!(session.to_fen(), chess_core::Fen::STARTPOS);
//! ```

mod error;
mod game;
pub mod movegen;
pub mod perft;
pub mod rules;
mod session;
mod square_set;
pub mod state;

pub use error::GameError;
pub use game::{Game, MoveEffect};
pub use movegen::{is_king_attacked, is_square_attacked, MoveData};
pub use perft::{perft, perft_divide};
pub use rules::{DrawReason, GameResult};
pub use session::{GameEvent, GameSession};
pub use square_set::SquareSet;
pub use state::{GameState, StateManager};
