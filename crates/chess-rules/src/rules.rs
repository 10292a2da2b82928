//! End-of-game rules.
//!
//! [`evaluate`] is run once after every completed move. Conditions are
//! checked in a fixed order and the first match wins: checkmate, stalemate,
//! threefold repetition, insufficient material, the seventy-five-move rule.
//! The fifty-move rule only ends the game when a player claims it.

use crate::{Game, MoveData, StateManager};
use chess_core::{Board, Color, PieceKind};
use std::fmt;

/// Halfmove clock at which a draw may be claimed.
pub const FIFTY_MOVE_PLIES: u32 = 100;

/// Halfmove clock at which the game is drawn automatically.
pub const SEVENTY_FIVE_MOVE_PLIES: u32 = 150;

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// White wins by checkmate.
    WhiteWins,
    /// Black wins by checkmate.
    BlackWins,
    /// Draw with a specific reason.
    Draw(DrawReason),
}

/// Reason for a draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DrawReason {
    /// No legal moves and not in check.
    Stalemate,
    /// The same placement appeared for the third time.
    ThreefoldRepetition,
    /// Neither side can deliver mate.
    InsufficientMaterial,
    /// 150 half-moves without a pawn move or capture.
    SeventyFiveMoveRule,
    /// 100 half-moves without a pawn move or capture, claimed by a player.
    FiftyMoveRule,
}

impl GameResult {
    /// The side that won, if any.
    pub fn winner(self) -> Option<Color> {
        match self {
            GameResult::WhiteWins => Some(Color::White),
            GameResult::BlackWins => Some(Color::Black),
            GameResult::Draw(_) => None,
        }
    }

    /// A checkmate delivered against `loser`.
    pub fn checkmate(loser: Color) -> Self {
        match loser {
            Color::White => GameResult::BlackWins,
            Color::Black => GameResult::WhiteWins,
        }
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameResult::WhiteWins => write!(f, "1-0"),
            GameResult::BlackWins => write!(f, "0-1"),
            GameResult::Draw(_) => write!(f, "1/2-1/2"),
        }
    }
}

impl fmt::Display for DrawReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            DrawReason::Stalemate => "stalemate",
            DrawReason::ThreefoldRepetition => "threefold repetition",
            DrawReason::InsufficientMaterial => "insufficient material",
            DrawReason::SeventyFiveMoveRule => "seventy-five-move rule",
            DrawReason::FiftyMoveRule => "fifty-move rule",
        };
        f.write_str(text)
    }
}

/// Decides whether the position in `game` ends the game.
///
/// `moves` must be the move data of that position and `history` the
/// snapshots leading up to it.
pub fn evaluate(game: &Game, moves: &MoveData, history: &StateManager) -> Option<GameResult> {
    if !moves.has_moves() {
        return Some(if moves.in_check() {
            GameResult::checkmate(game.side_to_move)
        } else {
            GameResult::Draw(DrawReason::Stalemate)
        });
    }
    if is_threefold_repetition(&game.board, history) {
        return Some(GameResult::Draw(DrawReason::ThreefoldRepetition));
    }
    if is_insufficient_material(&game.board) {
        return Some(GameResult::Draw(DrawReason::InsufficientMaterial));
    }
    if game.halfmove_clock >= SEVENTY_FIVE_MOVE_PLIES {
        return Some(GameResult::Draw(DrawReason::SeventyFiveMoveRule));
    }
    None
}

/// Returns true if `board` also stood on the board four and eight plies ago.
///
/// Only the placement is compared. Positions in between are not searched,
/// which covers the usual back-and-forth shuffling that produces repetitions.
pub fn is_threefold_repetition(board: &Board, history: &StateManager) -> bool {
    [4, 8]
        .into_iter()
        .all(|plies| history.boards_back(plies).is_some_and(|earlier| earlier == board))
}

/// Returns true if neither side has mating material.
///
/// Recognised: bare kings, a king and a single minor piece against a bare
/// king, and a king and two knights against a bare king.
pub fn is_insufficient_material(board: &Board) -> bool {
    let mut extra = board.pieces().filter(|(_, p)| p.kind != PieceKind::King);

    match (extra.next(), extra.next(), extra.next()) {
        (None, _, _) => true,
        (Some((_, a)), None, _) => a.kind.is_minor(),
        (Some((_, a)), Some((_, b)), None) => {
            a.kind == PieceKind::Knight && b.kind == PieceKind::Knight && a.color == b.color
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(placement: &str) -> Board {
        Board::from_placement(placement).unwrap()
    }

    #[test]
    fn insufficient_material() {
        assert!(is_insufficient_material(&board("4k3/8/8/8/8/8/8/4K3")));
        assert!(is_insufficient_material(&board("4k3/8/8/8/8/8/8/4KB2")));
        assert!(is_insufficient_material(&board("4k3/8/8/8/8/8/8/4K1n1")));
        assert!(is_insufficient_material(&board("4k3/8/8/8/8/8/8/1N2KN2")));
    }

    #[test]
    fn sufficient_material() {
        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/8/4KR2")));
        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/4P3/4K3")));
        assert!(!is_insufficient_material(&board("4k3/8/8/8/8/8/8/1B2KB2")));
        // One knight each is left to the other rules.
        assert!(!is_insufficient_material(&board("4k1n1/8/8/8/8/8/8/4K1N1")));
        assert!(!is_insufficient_material(&board(Board::START_PLACEMENT)));
    }

    #[test]
    fn result_winner() {
        assert_eq!(GameResult::checkmate(Color::Black), GameResult::WhiteWins);
        assert_eq!(GameResult::WhiteWins.winner(), Some(Color::White));
        assert_eq!(GameResult::Draw(DrawReason::Stalemate).winner(), None);
        assert_eq!(GameResult::BlackWins.to_string(), "0-1");
        assert_eq!(DrawReason::FiftyMoveRule.to_string(), "fifty-move rule");
    }
}
