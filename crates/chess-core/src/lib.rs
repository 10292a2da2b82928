//! Core types for chess.
//!
//! This crate provides the value types shared by the rules engine and the
//! engine bridge:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for flat 0-63 board addressing (a1 = 0, h8 = 63)
//! - [`Board`] for a 64-cell position snapshot
//! - [`CastlingRights`] for the four castling privileges
//! - [`Move`] and [`UciMove`] for move representation
//! - [`Fen`] for Forsyth-Edwards Notation parsing and serialization

mod board;
mod castling;
mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use board::Board;
pub use castling::CastlingRights;
pub use color::Color;
pub use fen::{Fen, FenError};
pub use mov::{Move, UciMove};
pub use piece::{Piece, PieceKind};
pub use square::Square;
