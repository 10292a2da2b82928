//! Attack sets for every piece kind.
//!
//! An attack set includes squares occupied by the attacker's own pieces:
//! a protected piece cannot be captured by the enemy king.

use super::tables::{ray, DIAGONAL, KING_TARGETS, KNIGHT_TARGETS, ORTHOGONAL};
use crate::SquareSet;
use chess_core::{Board, Color, Piece, PieceKind, Square};
use std::ops::Range;

/// Direction ranges a sliding piece moves along.
pub fn slider_directions(kind: PieceKind) -> Range<usize> {
    match kind {
        PieceKind::Bishop => DIAGONAL,
        PieceKind::Rook => ORTHOGONAL,
        _ => ORTHOGONAL.start..DIAGONAL.end,
    }
}

/// Returns true if `kind` slides along direction index `dir`.
pub fn slides_along(kind: PieceKind, dir: usize) -> bool {
    kind.is_slider() && slider_directions(kind).contains(&dir)
}

/// Squares diagonally in front of a pawn.
pub fn pawn_attacks(sq: Square, color: Color) -> SquareSet {
    // Off-board coordinates wrap to large u8 values and are rejected.
    let forward = (sq.rank() as i8 + color.pawn_push().signum()) as u8;
    [-1i8, 1]
        .into_iter()
        .filter_map(|df| Square::from_coords((sq.file() as i8 + df) as u8, forward))
        .collect()
}

/// Squares a sliding piece reaches from `sq`, stopping on (and including)
/// the first occupied square in each direction.
///
/// `transparent` is treated as empty, which lets a king's own square be
/// seen through when computing where that king may not step.
pub fn sliding_attacks(
    board: &Board,
    sq: Square,
    kind: PieceKind,
    transparent: Option<Square>,
) -> SquareSet {
    let mut attacks = SquareSet::EMPTY;
    for dir in slider_directions(kind) {
        for target in ray(sq, dir) {
            attacks.insert(target);
            if Some(target) != transparent && !board.is_empty(target) {
                break;
            }
        }
    }
    attacks
}

/// Attack set of `piece` standing on `sq`.
pub fn piece_attacks(
    board: &Board,
    sq: Square,
    piece: Piece,
    transparent: Option<Square>,
) -> SquareSet {
    match piece.kind {
        PieceKind::Pawn => pawn_attacks(sq, piece.color),
        PieceKind::Knight => KNIGHT_TARGETS[sq.index() as usize],
        PieceKind::King => KING_TARGETS[sq.index() as usize],
        kind => sliding_attacks(board, sq, kind, transparent),
    }
}

/// Returns true if any piece of color `by` attacks `target`.
pub fn is_square_attacked(board: &Board, target: Square, by: Color) -> bool {
    board
        .pieces_of(by)
        .any(|(sq, piece)| piece_attacks(board, sq, piece, None).contains(target))
}

/// Returns true if `color`'s king is attacked. A board without that king
/// reports false.
pub fn is_king_attacked(board: &Board, color: Color) -> bool {
    board
        .king_square(color)
        .is_some_and(|king| is_square_attacked(board, king, color.opposite()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn board(placement: &str) -> Board {
        Board::from_placement(placement).unwrap()
    }

    #[test]
    fn pawn_attacks_diagonally() {
        let white = pawn_attacks(sq("e4"), Color::White);
        assert_eq!(white, [sq("d5"), sq("f5")].into_iter().collect());
        let edge = pawn_attacks(sq("a7"), Color::Black);
        assert_eq!(edge, SquareSet::single(sq("b6")));
        assert!(pawn_attacks(sq("h8"), Color::White).is_empty());
    }

    #[test]
    fn sliders_stop_at_first_blocker() {
        let b = board("8/8/8/3p4/8/8/3R4/8");
        let rook = sliding_attacks(&b, sq("d2"), PieceKind::Rook, None);
        assert!(rook.contains(sq("d5")));
        assert!(!rook.contains(sq("d6")));
        assert!(rook.contains(sq("d1")));
        assert!(rook.contains(sq("a2")));
        assert_eq!(rook.len(), 3 + 1 + 7);
    }

    #[test]
    fn transparent_square_is_seen_through() {
        let b = board("8/8/8/8/8/8/8/r3K3");
        let through = sliding_attacks(&b, Square::A1, PieceKind::Rook, Some(Square::E1));
        assert!(through.contains(Square::F1));
        let blocked = sliding_attacks(&b, Square::A1, PieceKind::Rook, None);
        assert!(!blocked.contains(Square::F1));
    }

    #[test]
    fn protected_squares_are_attacked() {
        let b = board("8/8/8/8/8/8/PP6/8");
        let white_pawn = Piece::new(PieceKind::Pawn, Color::White);
        assert!(piece_attacks(&b, sq("a2"), white_pawn, None).contains(sq("b3")));
        assert!(is_square_attacked(&b, sq("b3"), Color::White));
        assert!(!is_square_attacked(&b, sq("b4"), Color::White));
    }

    #[test]
    fn king_attacked() {
        let b = board("4k3/8/8/8/8/8/8/4RK2");
        assert!(is_king_attacked(&b, Color::Black));
        assert!(!is_king_attacked(&b, Color::White));
        assert!(!is_king_attacked(&board("8/8/8/8/8/8/8/8"), Color::White));
    }
}
