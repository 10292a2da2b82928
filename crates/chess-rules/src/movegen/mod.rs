//! Legal move generation.
//!
//! [`MoveData::compute`] derives everything the rest of the engine needs to
//! know about one position: which squares the opponent attacks, which of
//! its pieces give check, which of our pieces are pinned, and the complete
//! set of legal destinations for every piece of the side to move.
//!
//! The computation is a pure function of the position. Hypothetical moves
//! (en passant) are probed on a copy of the board, never by mutating shared
//! state.

mod attacks;
mod tables;

pub use attacks::{
    is_king_attacked, is_square_attacked, pawn_attacks, piece_attacks, sliding_attacks,
};
pub use tables::{between, DISTANCE_TO_EDGE};

use crate::{Game, SquareSet};
use attacks::slides_along;
use chess_core::{Board, CastlingRights, Color, Piece, PieceKind, Square};
use tables::{ray, KING_TARGETS, KNIGHT_TARGETS};

/// Legality data for one position.
#[derive(Clone, PartialEq, Eq)]
pub struct MoveData {
    /// Legal destinations, indexed by origin square.
    legal: [SquareSet; 64],
    /// Attack set of each opposing piece, indexed by its square.
    attacks_by_piece: [SquareSet; 64],
    /// Union of all opposing attacks.
    attacked: SquareSet,
    /// Opposing pieces that give check.
    checkers: SquareSet,
    king_squares: [Option<Square>; 2],
}

/// Per-position scratch state while filtering destinations.
struct Restrictions {
    /// For each pinned piece, the line it may still move along.
    pin_rays: [Option<SquareSet>; 64],
    /// When in single check, the squares that resolve it.
    check_mask: Option<SquareSet>,
}

impl MoveData {
    /// Data for a position with no pieces. Used before the first computation.
    pub fn empty() -> Self {
        MoveData {
            legal: [SquareSet::EMPTY; 64],
            attacks_by_piece: [SquareSet::EMPTY; 64],
            attacked: SquareSet::EMPTY,
            checkers: SquareSet::EMPTY,
            king_squares: [None; 2],
        }
    }

    /// Computes the legality data for `game`'s current position.
    ///
    /// The position is expected to hold exactly one king per side.
    pub fn compute(game: &Game) -> Self {
        let board = &game.board;
        let us = game.side_to_move;
        let them = us.opposite();
        let king = board.king_square(us);

        let mut data = MoveData::empty();
        data.king_squares = [
            board.king_square(Color::White),
            board.king_square(Color::Black),
        ];

        // Our king is transparent so it cannot retreat along a checking ray.
        for (sq, piece) in board.pieces_of(them) {
            let attacks = piece_attacks(board, sq, piece, king);
            data.attacks_by_piece[sq.index() as usize] = attacks;
            data.attacked |= attacks;
            if king.is_some_and(|k| attacks.contains(k)) {
                data.checkers.insert(sq);
            }
        }

        let Some(king) = king else {
            return data;
        };

        let restrictions = data.restrictions(board, king, us);
        for (sq, piece) in board.pieces_of(us) {
            let destinations = if piece.kind == PieceKind::King {
                data.king_destinations(game, sq, us)
            } else if data.checkers.len() >= 2 {
                SquareSet::EMPTY
            } else {
                data.piece_destinations(game, sq, piece, king, &restrictions)
            };
            data.legal[sq.index() as usize] = destinations;
        }

        data
    }

    fn restrictions(&self, board: &Board, king: Square, us: Color) -> Restrictions {
        let mut pin_rays = [None; 64];

        for dir in 0..8 {
            let mut line = SquareSet::EMPTY;
            let mut candidate: Option<Square> = None;
            for sq in ray(king, dir) {
                line.insert(sq);
                let Some(piece) = board.get(sq) else {
                    continue;
                };
                match candidate {
                    None if piece.color == us => candidate = Some(sq),
                    None => break,
                    Some(pinned) => {
                        if piece.color != us && slides_along(piece.kind, dir) {
                            pin_rays[pinned.index() as usize] = Some(line);
                        }
                        break;
                    }
                }
            }
        }

        let check_mask = match self.checkers.len() {
            1 => self.checkers.iter().next().map(|checker| {
                let mut mask = SquareSet::single(checker);
                if board.get(checker).is_some_and(|p| p.kind.is_slider()) {
                    mask |= between(king, checker);
                }
                mask
            }),
            _ => None,
        };

        Restrictions {
            pin_rays,
            check_mask,
        }
    }

    fn piece_destinations(
        &self,
        game: &Game,
        sq: Square,
        piece: Piece,
        king: Square,
        restrictions: &Restrictions,
    ) -> SquareSet {
        let board = &game.board;
        let own = occupied_by(board, piece.color);

        let mut targets = match piece.kind {
            PieceKind::Pawn => pawn_pushes(board, sq, piece.color) | pawn_captures(board, sq, piece.color),
            PieceKind::Knight => KNIGHT_TARGETS[sq.index() as usize] & !own,
            kind => sliding_attacks(board, sq, kind, None) & !own,
        };

        if let Some(line) = restrictions.pin_rays[sq.index() as usize] {
            targets &= line;
        }
        if let Some(mask) = restrictions.check_mask {
            targets &= mask;
        }

        if piece.kind == PieceKind::Pawn {
            if let Some(ep) = en_passant_capture(game, sq, piece.color, king) {
                targets.insert(ep);
            }
        }

        targets
    }

    fn king_destinations(&self, game: &Game, sq: Square, us: Color) -> SquareSet {
        let board = &game.board;
        let mut targets = KING_TARGETS[sq.index() as usize] & !occupied_by(board, us) & !self.attacked;

        if self.checkers.is_empty() {
            for kingside in [true, false] {
                if let Some(dest) = self.castle_destination(game, sq, us, kingside) {
                    targets.insert(dest);
                }
            }
        }

        targets
    }

    fn castle_destination(
        &self,
        game: &Game,
        king: Square,
        us: Color,
        kingside: bool,
    ) -> Option<Square> {
        let board = &game.board;
        let home = Square::from_coords(4, us.back_rank())?;
        let rook_home = CastlingRights::rook_home(us, kingside);

        if !game.castling.has(us, kingside)
            || king != home
            || board.get(rook_home) != Some(Piece::new(PieceKind::Rook, us))
        {
            return None;
        }
        if between(home, rook_home).iter().any(|sq| !board.is_empty(sq)) {
            return None;
        }

        let step: i8 = if kingside { 1 } else { -1 };
        let transit = home.offset(step)?;
        let dest = home.offset(2 * step)?;
        if self.attacked.contains(transit) || self.attacked.contains(dest) {
            return None;
        }
        Some(dest)
    }

    /// Legal destinations of the piece on `sq` (empty for anything not
    /// belonging to the side to move).
    #[inline]
    pub fn legal_moves(&self, sq: Square) -> SquareSet {
        self.legal[sq.index() as usize]
    }

    /// Returns true if `from` -> `to` is in the legal set.
    #[inline]
    pub fn is_legal(&self, from: Square, to: Square) -> bool {
        self.legal_moves(from).contains(to)
    }

    /// Iterates `(origin, destinations)` for every piece that can move.
    pub fn iter(&self) -> impl Iterator<Item = (Square, SquareSet)> + '_ {
        Square::all()
            .map(|sq| (sq, self.legal_moves(sq)))
            .filter(|(_, set)| !set.is_empty())
    }

    /// Number of (origin, destination) pairs. A promotion counts once.
    pub fn move_count(&self) -> usize {
        self.legal.iter().map(|set| set.len()).sum()
    }

    /// Returns true if the side to move has any legal move.
    pub fn has_moves(&self) -> bool {
        self.legal.iter().any(|set| !set.is_empty())
    }

    /// Attack set of the opposing piece on `sq`.
    #[inline]
    pub fn attacks_by_piece(&self, sq: Square) -> SquareSet {
        self.attacks_by_piece[sq.index() as usize]
    }

    /// Every square attacked by the side not to move.
    #[inline]
    pub fn attacked(&self) -> SquareSet {
        self.attacked
    }

    /// Opposing pieces giving check (zero, one or two squares).
    #[inline]
    pub fn checkers(&self) -> SquareSet {
        self.checkers
    }

    #[inline]
    pub fn in_check(&self) -> bool {
        !self.checkers.is_empty()
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.king_squares[color.index()]
    }
}

impl Default for MoveData {
    fn default() -> Self {
        Self::empty()
    }
}

impl std::fmt::Debug for MoveData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoveData")
            .field("legal", &self.iter().collect::<Vec<_>>())
            .field("checkers", &self.checkers)
            .field("king_squares", &self.king_squares)
            .finish()
    }
}

fn occupied_by(board: &Board, color: Color) -> SquareSet {
    board.pieces_of(color).map(|(sq, _)| sq).collect()
}

fn pawn_pushes(board: &Board, sq: Square, color: Color) -> SquareSet {
    let mut pushes = SquareSet::EMPTY;
    let Some(one) = sq.offset(color.pawn_push()).filter(|&t| board.is_empty(t)) else {
        return pushes;
    };
    pushes.insert(one);
    if sq.rank() == color.pawn_rank() {
        if let Some(two) = one.offset(color.pawn_push()).filter(|&t| board.is_empty(t)) {
            pushes.insert(two);
        }
    }
    pushes
}

fn pawn_captures(board: &Board, sq: Square, color: Color) -> SquareSet {
    pawn_attacks(sq, color)
        .iter()
        .filter(|&t| board.get(t).is_some_and(|p| p.color != color))
        .collect()
}

/// Returns the en passant target if the pawn on `sq` may legally capture
/// onto it. The capture is tried on a copy of the board because it removes
/// two pieces from a rank at once, which ordinary pin detection misses.
fn en_passant_capture(game: &Game, sq: Square, color: Color, king: Square) -> Option<Square> {
    let ep = game.en_passant?;
    if !pawn_attacks(sq, color).contains(ep) || !game.board.is_empty(ep) {
        return None;
    }
    let captured = ep.offset(-color.pawn_push())?;
    if game.board.get(captured) != Some(Piece::new(PieceKind::Pawn, color.opposite())) {
        return None;
    }

    let mut trial = game.board;
    trial.relocate(sq, ep);
    trial.take(captured);
    (!is_square_attacked(&trial, king, color.opposite())).then_some(ep)
}
