//! Mailbox board representation.

use crate::{Color, FenError, Piece, PieceKind, Square};
use std::fmt;
use std::ops::{Index, IndexMut};

/// A 64-cell board addressed by [`Square`].
///
/// Each cell holds at most one piece. The board is a plain value: copying it
/// is how callers take snapshots or probe hypothetical moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board([Option<Piece>; 64]);

impl Board {
    /// The piece placement field of the standard starting position.
    pub const START_PLACEMENT: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

    /// Creates an empty board.
    pub const fn empty() -> Self {
        Board([None; 64])
    }

    /// Returns the piece on `sq`, if any.
    #[inline]
    pub fn get(&self, sq: Square) -> Option<Piece> {
        self.0[sq.index() as usize]
    }

    /// Places `piece` on `sq`, returning whatever stood there.
    #[inline]
    pub fn set(&mut self, sq: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.0[sq.index() as usize], piece)
    }

    /// Removes and returns the piece on `sq`.
    #[inline]
    pub fn take(&mut self, sq: Square) -> Option<Piece> {
        self.0[sq.index() as usize].take()
    }

    /// Moves whatever stands on `from` to `to`, returning the captured piece.
    #[inline]
    pub fn relocate(&mut self, from: Square, to: Square) -> Option<Piece> {
        let moving = self.take(from);
        self.set(to, moving)
    }

    /// Returns true if `sq` holds no piece.
    #[inline]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.get(sq).is_none()
    }

    /// Iterates over occupied squares and their pieces, a1 to h8.
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.get(sq).map(|p| (sq, p)))
    }

    /// Iterates over the pieces of one color.
    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color == color)
    }

    /// Returns the square of `color`'s king, or `None` if it has none.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces()
            .find(|(_, p)| p.is(PieceKind::King, color))
            .map(|(sq, _)| sq)
    }

    /// Counts the pieces of a given kind and color.
    pub fn count(&self, kind: PieceKind, color: Color) -> usize {
        self.pieces().filter(|(_, p)| p.is(kind, color)).count()
    }

    /// Builds a board from a FEN piece placement field (rank 8 first).
    pub fn from_placement(placement: &str) -> Result<Self, FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = Board::empty();
        for (i, rank_str) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u8;
            for c in rank_str.chars() {
                if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += run as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::from_coords(file, rank) {
                        board.set(sq, Some(piece));
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} does not span exactly 8 files",
                    rank + 1
                )));
            }
        }

        Ok(board)
    }

    /// Returns the FEN piece placement field for this board.
    pub fn placement(&self) -> String {
        let mut out = String::with_capacity(72);
        for rank in (0..8).rev() {
            let mut empty = 0;
            for file in 0..8 {
                match Square::from_coords(file, rank).and_then(|sq| self.get(sq)) {
                    Some(piece) => {
                        if empty > 0 {
                            out.push_str(&empty.to_string());
                            empty = 0;
                        }
                        out.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                out.push_str(&empty.to_string());
            }
            if rank > 0 {
                out.push('/');
            }
        }
        out
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Index<Square> for Board {
    type Output = Option<Piece>;

    #[inline]
    fn index(&self, sq: Square) -> &Self::Output {
        &self.0[sq.index() as usize]
    }
}

impl IndexMut<Square> for Board {
    #[inline]
    fn index_mut(&mut self, sq: Square) -> &mut Self::Output {
        &mut self.0[sq.index() as usize]
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Board({})", self.placement())
    }
}

impl fmt::Display for Board {
    /// Renders the board as an 8x8 grid, rank 8 at the top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (0..8u8).rev() {
            write!(f, "{} ", rank + 1)?;
            for file in 0..8u8 {
                let c = Square::from_coords(file, rank)
                    .and_then(|sq| self.get(sq))
                    .map_or('.', Piece::to_fen_char);
                write!(f, " {}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "   a b c d e f g h")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn start_placement_roundtrip() {
        let board = Board::from_placement(Board::START_PLACEMENT).unwrap();
        assert_eq!(board.placement(), Board::START_PLACEMENT);
        assert_eq!(board.pieces().count(), 32);
    }

    #[test]
    fn start_position_layout() {
        let board = Board::from_placement(Board::START_PLACEMENT).unwrap();
        assert_eq!(
            board.get(Square::E1),
            Some(Piece::new(PieceKind::King, Color::White))
        );
        assert_eq!(
            board.get(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert!(board.is_empty(sq("e4")));
        assert_eq!(board.king_square(Color::Black), Some(Square::E8));
        assert_eq!(board.count(PieceKind::Pawn, Color::White), 8);
    }

    #[test]
    fn relocate_captures() {
        let mut board = Board::from_placement("4k3/8/8/3p4/4P3/8/8/4K3").unwrap();
        let captured = board.relocate(sq("e4"), sq("d5"));
        assert_eq!(captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert!(board.is_empty(sq("e4")));
        assert_eq!(board.placement(), "4k3/8/8/3P4/8/8/8/4K3");
    }

    #[test]
    fn rejects_bad_ranks() {
        assert!(matches!(
            Board::from_placement("8/8/8/8/8/8/8"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Board::from_placement("9/8/8/8/8/8/8/8"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Board::from_placement("rnbqkbnrr/8/8/8/8/8/8/8"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Board::from_placement("7/8/8/8/8/8/8/8"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
        assert!(matches!(
            Board::from_placement("8/8/8/8/8/8/PPPPXPPP/8"),
            Err(FenError::InvalidPiecePlacement(_))
        ));
    }

    #[test]
    fn display_grid() {
        let board = Board::from_placement("4k3/8/8/8/8/8/8/4K3").unwrap();
        let text = board.to_string();
        assert!(text.starts_with("8  . . . . k . . ."));
        assert!(text.ends_with("a b c d e f g h"));
    }
}
