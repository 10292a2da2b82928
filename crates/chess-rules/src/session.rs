//! The move executor and public game API.
//!
//! A [`GameSession`] owns one game: the current [`Game`], its [`MoveData`]
//! and the undo/redo history. Every mutating call records a snapshot first,
//! so any move can be taken back exactly.
//!
//! # Example
//!
//! ```
//! use chess_core::Square;
//! use chess_rules::{GameEvent, GameSession};
//!
//! let mut session = GameSession::new();
//! let e2 = Square::from_algebraic("e2").unwrap();
//! let e4 = Square::from_algebraic("e4").unwrap();
//! let events = session.try_move(e2, e4).unwrap();
//! assert!(matches!(events.last(), Some(GameEvent::MoveCompleted(_))));
//!
//! session.apply_uci_move("e7e5").unwrap();
//! assert_eq!(
//!     session.uci_position(),
//!     "position fen rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1 moves e2e4 e7e5"
//! );
//! ```

use crate::rules::{self, DrawReason, GameResult, FIFTY_MOVE_PLIES};
use crate::state::{GameState, StateManager};
use crate::{Game, GameError, MoveData, MoveEffect, SquareSet};
use chess_core::{Board, CastlingRights, Color, Fen, Move, PieceKind, Square, UciMove};
use tracing::debug;

/// Something observable that happened while executing a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// The move is complete and the other side is to move.
    MoveCompleted(Move),
    /// The king castled; the rook went from `rook_from` to `rook_to`.
    Castled { rook_from: Square, rook_to: Square },
    /// A pawn was captured en passant on `captured`.
    EnPassant { captured: Square },
    /// A pawn waits on `square` for [`GameSession::promote_pawn`].
    PromotionPending { square: Square },
    /// The move ended the game.
    GameEnded(GameResult),
}

/// A pawn on its last rank waiting for a promotion choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingPromotion {
    square: Square,
    capture: bool,
}

/// One game in progress.
#[derive(Debug, Clone)]
pub struct GameSession {
    game: Game,
    moves: MoveData,
    history: StateManager,
    start_fen: String,
    pending: Option<PendingPromotion>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

impl GameSession {
    /// Starts a session at the standard starting position.
    pub fn new() -> Self {
        let game = Game::new();
        GameSession {
            moves: MoveData::compute(&game),
            start_fen: game.to_fen(),
            game,
            history: StateManager::new(),
            pending: None,
        }
    }

    /// Starts a session from a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, GameError> {
        let mut session = Self::new();
        session.start_new_game(Some(fen), None)?;
        Ok(session)
    }

    /// Replaces the current game with a new one.
    ///
    /// `fen` defaults to the starting position and `player_color` to the
    /// side to move in it. On error the current game is left untouched.
    pub fn start_new_game(
        &mut self,
        fen: Option<&str>,
        player_color: Option<Color>,
    ) -> Result<(), GameError> {
        let fen = match fen {
            Some(text) => Fen::parse(text)?,
            None => Fen::default(),
        };
        let mut game = Game::from(fen);
        game.validate_kings()?;
        if let Some(color) = player_color {
            game.player_color = color;
        }

        self.history.reset();
        self.moves = MoveData::compute(&game);
        game.result = rules::evaluate(&game, &self.moves, &self.history);
        self.start_fen = game.to_fen();
        self.game = game;
        self.pending = None;

        debug!(fen = %self.start_fen, player = %self.game.player_color, "new game");
        Ok(())
    }

    /// Moves the piece on `from` to `to` without checking legality.
    ///
    /// Callers are expected to pick `to` from [`legal_moves`](Self::legal_moves);
    /// use [`try_move`](Self::try_move) for untrusted input.
    ///
    /// A pawn reaching its last rank stops at
    /// [`GameEvent::PromotionPending`]: the turn does not pass until
    /// [`promote_pawn`](Self::promote_pawn) is called.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_no_pending()?;
        if self.game.board.is_empty(from) {
            return Err(GameError::EmptySquare(from));
        }

        self.history.record(self.snapshot());
        let effect = self.game.make_move(from, to)?;

        let mut events = Vec::with_capacity(3);
        match effect {
            MoveEffect::Castle { rook_from, rook_to } => {
                events.push(GameEvent::Castled { rook_from, rook_to });
            }
            MoveEffect::EnPassant { captured } => {
                events.push(GameEvent::EnPassant { captured });
            }
            MoveEffect::Promotion { square, captured } => {
                self.pending = Some(PendingPromotion {
                    square,
                    capture: captured.is_some(),
                });
                events.push(GameEvent::PromotionPending { square });
                return Ok(events);
            }
            MoveEffect::Quiet | MoveEffect::Capture(_) => {}
        }

        self.finish_move(effect.is_capture(), &mut events);
        Ok(events)
    }

    /// Completes a pending promotion on `square` with a piece of `kind`.
    pub fn promote_pawn(
        &mut self,
        square: Square,
        kind: PieceKind,
    ) -> Result<Vec<GameEvent>, GameError> {
        let pending = self.pending.ok_or(GameError::NoPendingPromotion)?;
        if pending.square != square {
            return Err(GameError::InvalidPromotion(format!(
                "the pending promotion is on {}, not {square}",
                pending.square
            )));
        }
        self.game.promote(square, kind)?;
        self.pending = None;

        let mut events = Vec::with_capacity(2);
        self.finish_move(pending.capture, &mut events);
        Ok(events)
    }

    /// Takes back a move left waiting for its promotion choice.
    ///
    /// Unlike [`undo`](Self::undo) this leaves no redo entry behind.
    pub fn cancel_promotion(&mut self) -> Result<(), GameError> {
        self.pending.ok_or(GameError::NoPendingPromotion)?;
        let state = self.history.pop().ok_or(GameError::NothingToUndo)?;
        self.restore(state);
        Ok(())
    }

    /// Validates `from`-`to` against the legal moves, then plays it.
    pub fn try_move(&mut self, from: Square, to: Square) -> Result<Vec<GameEvent>, GameError> {
        self.ensure_no_pending()?;
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        if self.game.board.is_empty(from) {
            return Err(GameError::EmptySquare(from));
        }
        if !self.moves.is_legal(from, to) {
            return Err(GameError::IllegalMove(format!("{from}{to}")));
        }
        self.move_piece(from, to)
    }

    /// Plays a move given in UCI long algebraic notation, such as `e2e4` or
    /// `e7e8q`. A promotion is completed in the same call.
    pub fn apply_uci_move(&mut self, text: &str) -> Result<Vec<GameEvent>, GameError> {
        let uci = UciMove::parse(text).ok_or_else(|| GameError::InvalidUciMove(text.to_string()))?;
        let piece = self
            .game
            .board
            .get(uci.from)
            .ok_or(GameError::EmptySquare(uci.from))?;

        let promotes = Move::new(uci.from, uci.to, piece).reaches_last_rank();
        if promotes != uci.promotion.is_some() {
            return Err(GameError::InvalidUciMove(text.to_string()));
        }

        let mut events = self.try_move(uci.from, uci.to)?;
        if let Some(kind) = uci.promotion {
            events.extend(self.promote_pawn(uci.to, kind)?);
        }
        Ok(events)
    }

    /// Restores the position before the last move. With `fullmove`, keeps
    /// going back while the restored side to move is not
    /// [`player_color`](Self::player_color) and older positions remain, so a
    /// single call takes back both the player's move and the reply.
    pub fn undo(&mut self, fullmove: bool) -> Result<(), GameError> {
        self.ensure_no_pending()?;
        let state = self.history.undo(self.snapshot(), fullmove)?;
        self.restore(state);
        Ok(())
    }

    /// Replays a move taken back by [`undo`](Self::undo).
    pub fn redo(&mut self, fullmove: bool) -> Result<(), GameError> {
        self.ensure_no_pending()?;
        let state = self.history.redo(self.snapshot(), fullmove)?;
        self.restore(state);
        Ok(())
    }

    /// Returns true if the side to move may claim a fifty-move draw.
    pub fn can_claim_draw(&self) -> bool {
        !self.game.is_over() && self.game.halfmove_clock >= FIFTY_MOVE_PLIES
    }

    /// Ends the game as a draw under the fifty-move rule.
    pub fn claim_draw(&mut self) -> Result<GameResult, GameError> {
        self.ensure_no_pending()?;
        if self.game.is_over() {
            return Err(GameError::GameOver);
        }
        if !self.can_claim_draw() {
            return Err(GameError::CannotClaimDraw);
        }
        let result = GameResult::Draw(DrawReason::FiftyMoveRule);
        self.game.result = Some(result);
        debug!(%result, "draw claimed");
        Ok(result)
    }

    /// Returns true if the last move captured a piece.
    pub fn was_capture(&self) -> Result<bool, GameError> {
        let (mv, before) = self.last_move()?;
        Ok(before.get(mv.to).is_some() || self.was_en_passant()?)
    }

    /// Returns true if the last move was a castle.
    pub fn was_castle(&self) -> Result<bool, GameError> {
        let (mv, _) = self.last_move()?;
        Ok(mv.is_castle())
    }

    /// Returns true if the last move captured en passant.
    pub fn was_en_passant(&self) -> Result<bool, GameError> {
        let (mv, before) = self.last_move()?;
        Ok(mv.piece.kind == PieceKind::Pawn
            && mv.from.file() != mv.to.file()
            && before.is_empty(mv.to))
    }

    /// Returns true if the last move took a pawn to its last rank.
    pub fn was_promotion(&self) -> Result<bool, GameError> {
        let (mv, _) = self.last_move()?;
        Ok(mv.reaches_last_rank())
    }

    /// The last move and the board it was played on.
    fn last_move(&self) -> Result<(Move, &Board), GameError> {
        let mv = self.game.prev_move.ok_or(GameError::NoMoveMade)?;
        let before = self.history.last().ok_or(GameError::NoMoveMade)?;
        Ok((mv, &before.game.board))
    }

    /// The current position in FEN.
    pub fn to_fen(&self) -> String {
        self.game.to_fen()
    }

    /// The UCI `position` command reproducing this game.
    pub fn uci_position(&self) -> String {
        let moves = self.game.played_moves();
        if moves.is_empty() {
            return format!("position fen {}", self.start_fen);
        }
        let list: Vec<String> = moves.iter().map(|m| m.to_string()).collect();
        format!("position fen {} moves {}", self.start_fen, list.join(" "))
    }

    #[inline]
    pub fn game(&self) -> &Game {
        &self.game
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.game.board
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.game.side_to_move
    }

    #[inline]
    pub fn player_color(&self) -> Color {
        self.game.player_color
    }

    #[inline]
    pub fn castling_rights(&self) -> CastlingRights {
        self.game.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.game.en_passant
    }

    /// Returns true if the side to move is in check.
    #[inline]
    pub fn in_check(&self) -> bool {
        self.moves.in_check()
    }

    /// Legal destinations for the piece on `sq`.
    #[inline]
    pub fn legal_moves(&self, sq: Square) -> SquareSet {
        self.moves.legal_moves(sq)
    }

    #[inline]
    pub fn move_data(&self) -> &MoveData {
        &self.moves
    }

    #[inline]
    pub fn result(&self) -> Option<GameResult> {
        self.game.result
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.game.is_over()
    }

    /// The square of a pawn waiting for its promotion choice.
    #[inline]
    pub fn pending_promotion(&self) -> Option<Square> {
        self.pending.map(|p| p.square)
    }

    #[inline]
    pub fn history(&self) -> &StateManager {
        &self.history
    }

    /// FEN of the position the game started from.
    #[inline]
    pub fn start_fen(&self) -> &str {
        &self.start_fen
    }

    fn ensure_no_pending(&self) -> Result<(), GameError> {
        match self.pending {
            Some(p) => Err(GameError::PromotionPending(p.square)),
            None => Ok(()),
        }
    }

    fn snapshot(&self) -> GameState {
        GameState {
            game: self.game.clone(),
            moves: self.moves.clone(),
        }
    }

    fn restore(&mut self, state: GameState) {
        self.game = state.game;
        self.moves = state.moves;
        self.pending = None;
    }

    /// Passes the turn and decides whether the game is over.
    fn finish_move(&mut self, capture: bool, events: &mut Vec<GameEvent>) {
        self.game.advance_turn(capture);
        self.moves = MoveData::compute(&self.game);
        self.game.result = rules::evaluate(&self.game, &self.moves, &self.history);

        if let Some(mv) = self.game.prev_move {
            events.push(GameEvent::MoveCompleted(mv));
        }
        if let Some(result) = self.game.result {
            debug!(%result, fen = %self.game.to_fen(), "game over");
            events.push(GameEvent::GameEnded(result));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    fn play(session: &mut GameSession, moves: &[&str]) {
        for m in moves {
            session.apply_uci_move(m).unwrap();
        }
    }

    #[test]
    fn new_session() {
        let session = GameSession::new();
        assert_eq!(session.to_fen(), Fen::STARTPOS);
        assert_eq!(session.start_fen(), Fen::STARTPOS);
        assert_eq!(session.side_to_move(), Color::White);
        assert!(!session.in_check());
        assert!(session.result().is_none());
        assert_eq!(session.uci_position(), format!("position fen {}", Fen::STARTPOS));
    }

    #[test]
    fn start_new_game_rejects_bad_input() {
        let mut session = GameSession::new();
        play(&mut session, &["e2e4"]);
        let before = session.to_fen();

        assert!(matches!(
            session.start_new_game(Some("not a fen"), None),
            Err(GameError::InvalidFen(_))
        ));
        assert_eq!(
            session.start_new_game(Some("8/8/8/8/8/8/8/4K3 w - - 0 1"), None),
            Err(GameError::MissingKing)
        );
        assert_eq!(session.to_fen(), before);
        assert!(session.history().can_undo());
    }

    #[test]
    fn start_new_game_sets_player_color() {
        let mut session = GameSession::new();
        session
            .start_new_game(Some("4k3/8/8/8/8/8/8/4K2R b K - 0 1"), None)
            .unwrap();
        assert_eq!(session.player_color(), Color::Black);
        session.start_new_game(None, Some(Color::Black)).unwrap();
        assert_eq!(session.player_color(), Color::Black);
        assert_eq!(session.side_to_move(), Color::White);
        assert!(!session.history().can_undo());
    }

    #[test]
    fn start_from_finished_position() {
        let session = GameSession::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert_eq!(session.result(), Some(GameResult::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn try_move_rejects_illegal() {
        let mut session = GameSession::new();
        assert_eq!(
            session.try_move(sq("e2"), sq("e5")),
            Err(GameError::IllegalMove("e2e5".to_string()))
        );
        assert_eq!(
            session.try_move(sq("e4"), sq("e5")),
            Err(GameError::EmptySquare(sq("e4")))
        );
        // Black pieces cannot move on White's turn.
        assert!(session.try_move(sq("e7"), sq("e5")).is_err());
    }

    #[test]
    fn predicates_before_any_move() {
        let session = GameSession::new();
        assert_eq!(session.was_capture(), Err(GameError::NoMoveMade));
        assert_eq!(session.was_castle(), Err(GameError::NoMoveMade));
        assert_eq!(session.was_en_passant(), Err(GameError::NoMoveMade));
        assert_eq!(session.was_promotion(), Err(GameError::NoMoveMade));
    }

    #[test]
    fn fools_mate() {
        let mut session = GameSession::new();
        play(&mut session, &["f2f3", "e7e5", "g2g4"]);
        let events = session.apply_uci_move("d8h4").unwrap();
        assert_eq!(events.last(), Some(&GameEvent::GameEnded(GameResult::BlackWins)));
        assert!(session.in_check());
        assert!(session.is_over());
        assert_eq!(session.try_move(sq("a2"), sq("a3")), Err(GameError::GameOver));
    }

    #[test]
    fn claim_fifty_move_draw() {
        let mut session = GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 99 80").unwrap();
        assert!(!session.can_claim_draw());
        assert_eq!(session.claim_draw(), Err(GameError::CannotClaimDraw));

        play(&mut session, &["a1a2"]);
        assert!(session.can_claim_draw());
        assert_eq!(
            session.claim_draw(),
            Ok(GameResult::Draw(DrawReason::FiftyMoveRule))
        );
        assert_eq!(session.claim_draw(), Err(GameError::GameOver));
    }

    #[test]
    fn seventy_five_move_rule() {
        let mut session = GameSession::from_fen("4k3/8/8/8/8/8/8/R3K3 w - - 149 80").unwrap();
        let events = session.apply_uci_move("a1a2").unwrap();
        assert_eq!(
            events.last(),
            Some(&GameEvent::GameEnded(GameResult::Draw(
                DrawReason::SeventyFiveMoveRule
            )))
        );

        let drawn = session.to_fen();
        assert_eq!(drawn, "4k3/8/8/8/8/8/R7/4K3 b - - 150 80");
        assert!(!Fen::is_valid(&drawn));

        session.undo(false).unwrap();
        assert!(GameSession::from_fen(&session.to_fen()).is_ok());
    }

    #[test]
    fn apply_uci_move_requires_promotion_piece() {
        let mut session = GameSession::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert!(matches!(
            session.apply_uci_move("a7a8"),
            Err(GameError::InvalidUciMove(_))
        ));
        assert!(matches!(
            session.apply_uci_move("e1e2q"),
            Err(GameError::InvalidUciMove(_))
        ));
        assert!(matches!(
            session.apply_uci_move("zz"),
            Err(GameError::InvalidUciMove(_))
        ));
        assert_eq!(session.pending_promotion(), None);

        let events = session.apply_uci_move("a7a8r").unwrap();
        assert_eq!(events[0], GameEvent::PromotionPending { square: sq("a8") });
        assert!(matches!(events[1], GameEvent::MoveCompleted(_)));
        assert_eq!(session.pending_promotion(), None);
        assert_eq!(session.side_to_move(), Color::Black);
        assert!(session.was_promotion().unwrap());
        assert!(session.uci_position().ends_with("moves a7a8r"));
    }
}
