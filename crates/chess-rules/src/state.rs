//! Snapshot history for undo and redo.

use crate::{Game, GameError, MoveData};
use chess_core::Board;
use tracing::debug;

/// A complete snapshot: the game plus the move data computed for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    pub game: Game,
    pub moves: MoveData,
}

impl GameState {
    /// Snapshots `game`, computing its move data.
    pub fn new(game: Game) -> Self {
        let moves = MoveData::compute(&game);
        GameState { game, moves }
    }
}

/// Undo and redo stacks of [`GameState`] snapshots.
///
/// A snapshot is recorded before every move, so the undo stack holds one
/// entry per ply played. Recording a new snapshot discards the redo stack.
#[derive(Debug, Clone, Default)]
pub struct StateManager {
    undo: Vec<GameState>,
    redo: Vec<GameState>,
}

impl StateManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a snapshot taken before a move and invalidates redo.
    pub fn record(&mut self, state: GameState) {
        self.undo.push(state);
        self.redo.clear();
    }

    /// Steps back one snapshot, saving `current` for redo.
    ///
    /// With `fullmove` set, keeps stepping back while the restored position
    /// has the opponent of the player to move and older snapshots remain, so
    /// the player gets the move back rather than the opponent's reply.
    pub fn undo(&mut self, current: GameState, fullmove: bool) -> Result<GameState, GameError> {
        let mut restored = self.undo.pop().ok_or(GameError::NothingToUndo)?;
        self.redo.push(current);

        while fullmove && restored.game.side_to_move != restored.game.player_color {
            let Some(previous) = self.undo.pop() else {
                break;
            };
            self.redo.push(std::mem::replace(&mut restored, previous));
        }

        debug!(
            undo = self.undo.len(),
            redo = self.redo.len(),
            "undo to {}",
            restored.game.to_fen()
        );
        Ok(restored)
    }

    /// Steps forward one snapshot, saving `current` for undo.
    ///
    /// With `fullmove` set, keeps stepping forward until the player is to
    /// move again or redo history runs out.
    pub fn redo(&mut self, current: GameState, fullmove: bool) -> Result<GameState, GameError> {
        let mut restored = self.redo.pop().ok_or(GameError::NothingToRedo)?;
        self.undo.push(current);

        while fullmove && restored.game.side_to_move != restored.game.player_color {
            let Some(next) = self.redo.pop() else {
                break;
            };
            self.undo.push(std::mem::replace(&mut restored, next));
        }

        debug!(
            undo = self.undo.len(),
            redo = self.redo.len(),
            "redo to {}",
            restored.game.to_fen()
        );
        Ok(restored)
    }

    /// Removes the newest snapshot without touching redo.
    pub fn pop(&mut self) -> Option<GameState> {
        self.undo.pop()
    }

    /// Clears both stacks.
    pub fn reset(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// The most recently recorded snapshot.
    pub fn last(&self) -> Option<&GameState> {
        self.undo.last()
    }

    /// The board as it stood `plies` moves before the current position.
    pub fn boards_back(&self, plies: usize) -> Option<&Board> {
        let index = self.undo.len().checked_sub(plies)?;
        self.undo.get(index).map(|state| &state.game.board)
    }

    #[inline]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    #[inline]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of recorded snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.undo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }
}
