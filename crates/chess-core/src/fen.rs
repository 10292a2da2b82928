//! FEN (Forsyth-Edwards Notation) parsing and serialization.
//!
//! Only the piece placement field is mandatory. Omitted trailing fields take
//! their usual defaults: White to move, all castling rights, no en passant
//! target, halfmove clock 0 and fullmove number 1.
//!
//! Validation is structural. A FEN that parses may still describe a position
//! that cannot arise in a game (for instance the side not to move in check).

use crate::{Board, CastlingRights, Color, Square};
use std::fmt;
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 1 to 6 fields, got {0}")]
    InvalidFieldCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// A fully decoded FEN record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fen {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl Fen {
    /// The standard starting position.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Halfmove clocks at or above this value are rejected.
    ///
    /// A game drawn by the seventy-five-move rule reaches exactly this clock,
    /// so the FEN written for that final position does not parse back. Undo
    /// one move to get a position that does.
    pub const HALFMOVE_LIMIT: u32 = 150;

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.is_empty() || fields.len() > 6 {
            return Err(FenError::InvalidFieldCount(fields.len()));
        }

        let board = Board::from_placement(fields[0])?;

        let side_to_move = match fields.get(1).copied() {
            None | Some("w") => Color::White,
            Some("b") => Color::Black,
            Some(other) => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = match fields.get(2) {
            None => CastlingRights::ALL,
            Some(field) => CastlingRights::from_fen(field)
                .ok_or_else(|| FenError::InvalidCastlingRights(field.to_string()))?,
        };

        let en_passant = match fields.get(3).copied() {
            None | Some("-") => None,
            Some(field) => Some(
                parse_en_passant(field, side_to_move)
                    .ok_or_else(|| FenError::InvalidEnPassantSquare(field.to_string()))?,
            ),
        };

        let halfmove_clock = match fields.get(4) {
            None => 0,
            Some(field) => field
                .parse::<u32>()
                .ok()
                .filter(|&n| n < Self::HALFMOVE_LIMIT)
                .ok_or_else(|| FenError::InvalidHalfmoveClock(field.to_string()))?,
        };

        let fullmove_number = match fields.get(5) {
            None => 1,
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| FenError::InvalidFullmoveNumber(field.to_string()))?,
        };

        Ok(Fen {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    /// Returns true if `fen` is structurally valid.
    pub fn is_valid(fen: &str) -> bool {
        Self::parse(fen).is_ok()
    }
}

/// An en passant target is the square a pawn of the side not to move just
/// passed over: rank 6 with White to move, rank 3 with Black to move.
fn parse_en_passant(field: &str, side_to_move: Color) -> Option<Square> {
    let expected_rank = match side_to_move {
        Color::White => b'6',
        Color::Black => b'3',
    };
    match field.as_bytes() {
        [b'a'..=b'h', rank] if *rank == expected_rank => Square::from_algebraic(field),
        _ => None,
    }
}

impl Default for Fen {
    fn default() -> Self {
        Fen {
            board: Board::from_placement(Board::START_PLACEMENT).unwrap_or_default(),
            side_to_move: Color::White,
            castling: CastlingRights::ALL,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }
}

impl fmt::Display for Fen {
    /// Writes all six fields.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} ",
            self.board.placement(),
            self.side_to_move.to_fen_char(),
            self.castling
        )?;
        match self.en_passant {
            Some(sq) => write!(f, "{}", sq)?,
            None => write!(f, "-")?,
        }
        write!(f, " {} {}", self.halfmove_clock, self.fullmove_number)
    }
}
