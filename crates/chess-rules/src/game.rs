//! Game state and turn bookkeeping.
//!
//! [`Game`] is a plain value: the board plus everything FEN records, the
//! last move, the human player's color and the result once decided. It is
//! cloned into the history stack before every move, so restoring a snapshot
//! restores all of it at once.

use crate::{GameError, GameResult};
use chess_core::{
    Board, CastlingRights, Color, Fen, FenError, Move, Piece, PieceKind, Square, UciMove,
};

/// What a move did on the board besides relocating the moving piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveEffect {
    /// Nothing was captured.
    Quiet,
    /// A piece on the destination square was captured.
    Capture(Piece),
    /// The king castled and the rook moved alongside it.
    Castle { rook_from: Square, rook_to: Square },
    /// A pawn was captured en passant from `captured`.
    EnPassant { captured: Square },
    /// A pawn reached its last rank and waits for a promotion choice.
    Promotion {
        square: Square,
        captured: Option<Piece>,
    },
}

impl MoveEffect {
    /// Returns true if the move removed an opposing piece.
    pub fn is_capture(self) -> bool {
        matches!(
            self,
            MoveEffect::Capture(_)
                | MoveEffect::EnPassant { .. }
                | MoveEffect::Promotion {
                    captured: Some(_),
                    ..
                }
        )
    }
}

/// A chess game at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub board: Board,
    pub side_to_move: Color,
    pub castling: CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
    /// The most recent move, if any.
    pub prev_move: Option<Move>,
    /// The side controlled by the local player.
    pub player_color: Color,
    pub result: Option<GameResult>,
    /// Moves played since the starting position, in UCI form.
    played: Vec<UciMove>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Fen> for Game {
    fn from(fen: Fen) -> Self {
        Game {
            board: fen.board,
            side_to_move: fen.side_to_move,
            castling: fen.castling,
            en_passant: fen.en_passant,
            halfmove_clock: fen.halfmove_clock,
            fullmove_number: fen.fullmove_number,
            prev_move: None,
            player_color: fen.side_to_move,
            result: None,
            played: Vec::new(),
        }
    }
}

impl Game {
    /// Creates a game at the standard starting position.
    pub fn new() -> Self {
        Fen::default().into()
    }

    /// Creates a game from a FEN string. Only structure is checked.
    pub fn from_fen(fen: &str) -> Result<Self, FenError> {
        Fen::parse(fen).map(Game::from)
    }

    /// Returns an error unless each side has exactly one king.
    pub fn validate_kings(&self) -> Result<(), GameError> {
        for color in Color::BOTH {
            if self.board.count(PieceKind::King, color) != 1 {
                return Err(GameError::MissingKing);
            }
        }
        Ok(())
    }

    /// Returns the position as a FEN record.
    pub fn fen(&self) -> Fen {
        Fen {
            board: self.board,
            side_to_move: self.side_to_move,
            castling: self.castling,
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
    }

    /// Returns the position as a FEN string.
    pub fn to_fen(&self) -> String {
        self.fen().to_string()
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.result.is_some()
    }

    /// Moves played since the starting position.
    pub fn played_moves(&self) -> &[UciMove] {
        &self.played
    }

    /// Moves the piece on `from` to `to`, including the rook of a castle and
    /// the pawn taken en passant.
    ///
    /// Legality is not checked. Turn state is left untouched; call
    /// [`advance_turn`](Self::advance_turn) once the move is complete.
    pub fn make_move(&mut self, from: Square, to: Square) -> Result<MoveEffect, GameError> {
        let piece = self.board.get(from).ok_or(GameError::EmptySquare(from))?;
        let mv = Move::new(from, to, piece);
        let captured = self.board.relocate(from, to);

        let effect = if mv.is_castle() {
            let kingside = to.file() > from.file();
            let rook_from = CastlingRights::rook_home(piece.color, kingside);
            let rook_to = if kingside {
                Square::from_coords(5, from.rank())
            } else {
                Square::from_coords(3, from.rank())
            }
            .ok_or_else(|| GameError::IllegalMove(mv.to_string()))?;
            self.board.relocate(rook_from, rook_to);
            MoveEffect::Castle { rook_from, rook_to }
        } else if piece.kind == PieceKind::Pawn
            && captured.is_none()
            && from.file() != to.file()
            && self.en_passant == Some(to)
        {
            let captured = to
                .offset(-piece.color.pawn_push())
                .ok_or_else(|| GameError::IllegalMove(mv.to_string()))?;
            self.board.take(captured);
            MoveEffect::EnPassant { captured }
        } else if mv.reaches_last_rank() {
            MoveEffect::Promotion {
                square: to,
                captured,
            }
        } else {
            captured.map_or(MoveEffect::Quiet, MoveEffect::Capture)
        };

        self.prev_move = Some(mv);
        self.played.push(mv.into());
        Ok(effect)
    }

    /// Replaces the pawn on `square` with a piece of `kind`.
    pub fn promote(&mut self, square: Square, kind: PieceKind) -> Result<(), GameError> {
        let pawn = self.board.get(square).ok_or(GameError::EmptySquare(square))?;
        if pawn.kind != PieceKind::Pawn {
            return Err(GameError::InvalidPromotion(format!("no pawn on {square}")));
        }
        if square.rank() != pawn.color.promotion_rank() {
            return Err(GameError::InvalidPromotion(format!(
                "pawn on {square} has not reached the last rank"
            )));
        }
        if !kind.is_promotion_target() {
            return Err(GameError::InvalidPromotion(format!(
                "cannot promote to {kind}"
            )));
        }

        self.board.set(square, Some(Piece::new(kind, pawn.color)));
        if let Some(last) = self.played.last_mut().filter(|m| m.to == square) {
            last.promotion = Some(kind);
        }
        Ok(())
    }

    /// Hands the move to the other side after `prev_move` completed.
    ///
    /// Updates the halfmove clock (`capture` resets it, as does any pawn
    /// move), the fullmove number, castling rights and the en passant target.
    pub fn advance_turn(&mut self, capture: bool) {
        let mover = self.side_to_move;
        let mv = self.prev_move;

        let pawn_move = mv.is_some_and(|m| m.piece.kind == PieceKind::Pawn);
        if pawn_move || capture {
            self.halfmove_clock = 0;
        } else {
            self.halfmove_clock += 1;
        }
        if mover == Color::Black {
            self.fullmove_number += 1;
        }

        if mv.is_some_and(|m| m.piece.kind == PieceKind::King) {
            self.castling.remove_color(mover);
        }
        self.update_castling_rights();

        self.en_passant = mv
            .filter(|m| m.is_double_push())
            .and_then(|m| Square::from_index((m.from.index() + m.to.index()) / 2));

        self.side_to_move = mover.opposite();
    }

    /// Drops every right whose rook no longer stands on its home square.
    fn update_castling_rights(&mut self) {
        for color in Color::BOTH {
            for kingside in [true, false] {
                let home = CastlingRights::rook_home(color, kingside);
                if self.board.get(home) != Some(Piece::new(PieceKind::Rook, color)) {
                    self.castling.remove(color, kingside);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(game: &mut Game, from: &str, to: &str) -> MoveEffect {
        let effect = game.make_move(sq(from), sq(to)).unwrap();
        game.advance_turn(effect.is_capture());
        effect
    }

    #[test]
    fn new_game() {
        let game = Game::new();
        assert_eq!(game.to_fen(), Fen::STARTPOS);
        assert_eq!(game.player_color, Color::White);
        assert!(!game.is_over());
        assert!(game.played_moves().is_empty());
        assert!(game.validate_kings().is_ok());
    }

    #[test]
    fn player_color_follows_side_to_move() {
        let game = Game::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").unwrap();
        assert_eq!(game.player_color, Color::Black);
    }

    #[test]
    fn missing_king() {
        let game = Game::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(game.validate_kings(), Err(GameError::MissingKing));
        let game = Game::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").unwrap();
        assert_eq!(game.validate_kings(), Err(GameError::MissingKing));
    }

    #[test]
    fn double_push_sets_en_passant() {
        let mut game = Game::new();
        play(&mut game, "e2", "e4");
        assert_eq!(game.en_passant, Some(sq("e3")));
        assert_eq!(game.side_to_move, Color::Black);
        assert_eq!(game.fullmove_number, 1);
        play(&mut game, "g8", "f6");
        assert_eq!(game.en_passant, None);
        assert_eq!(game.fullmove_number, 2);
        assert_eq!(game.halfmove_clock, 1);
    }

    #[test]
    fn halfmove_clock_resets_on_capture_and_pawn_move() {
        let mut game = Game::from_fen("4k3/8/8/3p4/8/2N5/8/4K3 w - - 10 30").unwrap();
        play(&mut game, "c3", "b5");
        assert_eq!(game.halfmove_clock, 11);
        play(&mut game, "e8", "d7");
        assert_eq!(game.halfmove_clock, 12);
        let effect = play(&mut game, "b5", "c7");
        assert_eq!(effect, MoveEffect::Quiet);
        assert_eq!(game.halfmove_clock, 13);
        play(&mut game, "d5", "d4");
        assert_eq!(game.halfmove_clock, 0);
    }

    #[test]
    fn capture_effect() {
        let mut game = Game::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 5 1").unwrap();
        let effect = play(&mut game, "e4", "d5");
        assert_eq!(
            effect,
            MoveEffect::Capture(Piece::new(PieceKind::Pawn, Color::Black))
        );
        assert_eq!(game.halfmove_clock, 0);
    }

    #[test]
    fn castling_moves_rook() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let effect = play(&mut game, "e1", "g1");
        assert_eq!(
            effect,
            MoveEffect::Castle {
                rook_from: Square::H1,
                rook_to: Square::F1
            }
        );
        assert_eq!(
            game.board.get(Square::F1),
            Some(Piece::new(PieceKind::Rook, Color::White))
        );
        assert!(game.board.is_empty(Square::H1));
        assert!(!game.castling.has(Color::White, true));
        assert!(!game.castling.has(Color::White, false));
        assert!(game.castling.has(Color::Black, false));

        let effect = play(&mut game, "e8", "c8");
        assert_eq!(
            effect,
            MoveEffect::Castle {
                rook_from: Square::A8,
                rook_to: Square::D8
            }
        );
        assert!(game.castling.is_empty());
    }

    #[test]
    fn rook_capture_clears_opponent_right() {
        let mut game = Game::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        play(&mut game, "a1", "a8");
        assert!(!game.castling.has(Color::White, false));
        assert!(!game.castling.has(Color::Black, false));
        assert!(game.castling.has(Color::White, true));
        assert!(game.castling.has(Color::Black, true));
    }

    #[test]
    fn en_passant_removes_pawn() {
        let mut game = Game::from_fen("4k3/8/8/4pP2/8/8/8/4K3 w - e6 0 1").unwrap();
        let effect = play(&mut game, "f5", "e6");
        assert_eq!(effect, MoveEffect::EnPassant { captured: sq("e5") });
        assert!(game.board.is_empty(sq("e5")));
        assert_eq!(game.halfmove_clock, 0);
    }

    #[test]
    fn promotion_waits_for_choice() {
        let mut game = Game::from_fen("1n2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let effect = game.make_move(sq("a7"), sq("b8")).unwrap();
        assert_eq!(
            effect,
            MoveEffect::Promotion {
                square: sq("b8"),
                captured: Some(Piece::new(PieceKind::Knight, Color::Black))
            }
        );
        assert!(effect.is_capture());

        assert!(matches!(
            game.promote(sq("b8"), PieceKind::King),
            Err(GameError::InvalidPromotion(_))
        ));
        game.promote(sq("b8"), PieceKind::Queen).unwrap();
        assert_eq!(
            game.board.get(sq("b8")),
            Some(Piece::new(PieceKind::Queen, Color::White))
        );
        assert_eq!(game.played_moves()[0].to_string(), "a7b8q");
    }

    #[test]
    fn promote_rejects_wrong_piece() {
        let mut game = Game::new();
        assert!(matches!(
            game.promote(Square::E1, PieceKind::Queen),
            Err(GameError::InvalidPromotion(_))
        ));
        assert!(matches!(
            game.promote(sq("e2"), PieceKind::Queen),
            Err(GameError::InvalidPromotion(_))
        ));
        assert_eq!(
            game.promote(sq("e4"), PieceKind::Queen),
            Err(GameError::EmptySquare(sq("e4")))
        );
    }

    #[test]
    fn make_move_from_empty_square() {
        let mut game = Game::new();
        assert_eq!(
            game.make_move(sq("e4"), sq("e5")),
            Err(GameError::EmptySquare(sq("e4")))
        );
    }
}
