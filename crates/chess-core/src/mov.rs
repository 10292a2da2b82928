//! Move representation.

use crate::{Piece, PieceKind, Square};
use std::fmt;

/// A single ply: the moving piece and its origin and destination.
///
/// The promotion choice is not part of a `Move`; it is supplied separately
/// once the pawn has reached the last rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub piece: Piece,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, piece: Piece) -> Self {
        Move { from, to, piece }
    }

    /// Returns true if this is a king move of two files.
    #[inline]
    pub fn is_castle(self) -> bool {
        self.piece.kind == PieceKind::King && self.from.file().abs_diff(self.to.file()) == 2
    }

    /// Returns true if this is a pawn advancing two ranks.
    #[inline]
    pub fn is_double_push(self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.from.rank().abs_diff(self.to.rank()) == 2
    }

    /// Returns true if a pawn lands on its promotion rank.
    #[inline]
    pub fn reaches_last_rank(self) -> bool {
        self.piece.kind == PieceKind::Pawn && self.to.rank() == self.piece.color.promotion_rank()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}

/// A move in UCI long algebraic notation (e.g., "e2e4", "e7e8q").
///
/// Unlike [`Move`], it carries no piece and can be built from text alone,
/// which is how moves arrive from an external engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UciMove {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl UciMove {
    #[inline]
    pub const fn new(from: Square, to: Square, promotion: Option<PieceKind>) -> Self {
        UciMove {
            from,
            to,
            promotion,
        }
    }

    /// Parses UCI notation. The promotion letter may be either case.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if !s.is_ascii() || s.len() < 4 || s.len() > 5 {
            return None;
        }
        let from = Square::from_algebraic(&s[0..2])?;
        let to = Square::from_algebraic(&s[2..4])?;
        let promotion = match s[4..].chars().next() {
            Some(c) => Some(PieceKind::from_char(c).filter(|k| k.is_promotion_target())?),
            None => None,
        };
        Some(UciMove::new(from, to, promotion))
    }
}

impl From<Move> for UciMove {
    fn from(m: Move) -> Self {
        UciMove::new(m.from, m.to, None)
    }
}

impl fmt::Display for UciMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Color;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn move_classification() {
        let king = Piece::new(PieceKind::King, Color::White);
        let pawn = Piece::new(PieceKind::Pawn, Color::Black);

        assert!(Move::new(Square::E1, Square::G1, king).is_castle());
        assert!(Move::new(Square::E1, Square::C1, king).is_castle());
        assert!(!Move::new(Square::E1, Square::F1, king).is_castle());
        assert!(Move::new(sq("d7"), sq("d5"), pawn).is_double_push());
        assert!(!Move::new(sq("d7"), sq("d6"), pawn).is_double_push());
        assert!(Move::new(sq("a2"), sq("a1"), pawn).reaches_last_rank());
        assert!(!Move::new(sq("a3"), sq("a2"), pawn).reaches_last_rank());
    }

    #[test]
    fn uci_parse() {
        let m = UciMove::parse("e2e4").unwrap();
        assert_eq!(m.from, sq("e2"));
        assert_eq!(m.to, sq("e4"));
        assert_eq!(m.promotion, None);

        let promo = UciMove::parse("e7e8Q").unwrap();
        assert_eq!(promo.promotion, Some(PieceKind::Queen));
        assert_eq!(promo.to_string(), "e7e8q");
    }

    #[test]
    fn uci_parse_rejects_garbage() {
        assert!(UciMove::parse("e2").is_none());
        assert!(UciMove::parse("e2e9").is_none());
        assert!(UciMove::parse("e7e8k").is_none());
        assert!(UciMove::parse("e7e8x").is_none());
        assert!(UciMove::parse("e2e4qq").is_none());
        assert!(UciMove::parse("é2e4").is_none());
    }

    #[test]
    fn display() {
        let knight = Piece::new(PieceKind::Knight, Color::White);
        let m = Move::new(Square::G1, sq("f3"), knight);
        assert_eq!(m.to_string(), "g1f3");
        assert_eq!(UciMove::from(m).to_string(), "g1f3");
    }
}
