//! Error type for game operations.

use chess_core::{FenError, Square};
use thiserror::Error;

/// Errors returned by [`GameSession`](crate::GameSession) and the history stack.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    InvalidFen(#[from] FenError),

    /// The position does not hold exactly one king per side.
    #[error("position must contain exactly one king per side")]
    MissingKing,

    #[error("no move has been made yet")]
    NoMoveMade,

    #[error("invalid promotion: {0}")]
    InvalidPromotion(String),

    /// A pawn is waiting on its last rank for a promotion choice.
    #[error("a promotion on {0} must be completed first")]
    PromotionPending(Square),

    #[error("no promotion is pending")]
    NoPendingPromotion,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("no piece on {0}")]
    EmptySquare(Square),

    #[error("illegal move: {0}")]
    IllegalMove(String),

    #[error("invalid UCI move: {0}")]
    InvalidUciMove(String),

    #[error("game has already ended")]
    GameOver,

    #[error("cannot claim draw: conditions not met")]
    CannotClaimDraw,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(GameError::NothingToUndo.to_string(), "nothing to undo");
        assert_eq!(
            GameError::PromotionPending(Square::A8).to_string(),
            "a promotion on a8 must be completed first"
        );
        let fen: GameError = FenError::InvalidFieldCount(0).into();
        assert!(fen.to_string().contains("expected 1 to 6 fields"));
    }
}
