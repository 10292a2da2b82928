//! Perft (performance test) for move generator validation.
//!
//! Perft counts the leaf nodes of the legal move tree to a given depth,
//! which can be compared against known-correct values. The tree is walked
//! through [`GameSession`] itself, so the count exercises move execution,
//! promotion handling and undo as well as generation.

use crate::{GameError, GameSession};
use chess_core::{PieceKind, Square};

/// Counts leaf nodes at `depth`. Each promotion counts once per piece kind.
pub fn perft(session: &mut GameSession, depth: u32) -> Result<u64, GameError> {
    if depth == 0 {
        return Ok(1);
    }
    if depth == 1 {
        return Ok(leaf_count(session));
    }

    let mut nodes = 0u64;
    for (from, to) in root_moves(session) {
        nodes += perft_move(session, from, to, depth)?;
    }
    Ok(nodes)
}

/// Perft with divide: the node count below each root move, sorted by move
/// text. Useful for locating which move has an incorrect count.
pub fn perft_divide(
    session: &mut GameSession,
    depth: u32,
) -> Result<Vec<(String, u64)>, GameError> {
    let mut results = Vec::new();
    if depth == 0 {
        return Ok(results);
    }

    for (from, to) in root_moves(session) {
        if is_promotion(session, from, to) {
            for kind in PieceKind::PROMOTIONS {
                session.move_piece(from, to)?;
                session.promote_pawn(to, kind)?;
                let nodes = perft(session, depth - 1)?;
                session.undo(false)?;
                results.push((format!("{from}{to}{}", kind.to_char()), nodes));
            }
        } else {
            session.move_piece(from, to)?;
            let nodes = perft(session, depth - 1)?;
            session.undo(false)?;
            results.push((format!("{from}{to}"), nodes));
        }
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(results)
}

fn perft_move(
    session: &mut GameSession,
    from: Square,
    to: Square,
    depth: u32,
) -> Result<u64, GameError> {
    let kinds: &[Option<PieceKind>] = if is_promotion(session, from, to) {
        &[
            Some(PieceKind::Queen),
            Some(PieceKind::Rook),
            Some(PieceKind::Bishop),
            Some(PieceKind::Knight),
        ]
    } else {
        &[None]
    };

    let mut nodes = 0;
    for kind in kinds {
        session.move_piece(from, to)?;
        if let Some(kind) = kind {
            session.promote_pawn(to, *kind)?;
        }
        nodes += perft(session, depth - 1)?;
        session.undo(false)?;
    }
    Ok(nodes)
}

fn root_moves(session: &GameSession) -> Vec<(Square, Square)> {
    session
        .move_data()
        .iter()
        .flat_map(|(from, targets)| targets.iter().map(move |to| (from, to)))
        .collect()
}

fn leaf_count(session: &GameSession) -> u64 {
    root_moves(session)
        .into_iter()
        .map(|(from, to)| if is_promotion(session, from, to) { 4 } else { 1 })
        .sum()
}

fn is_promotion(session: &GameSession, from: Square, to: Square) -> bool {
    session
        .board()
        .get(from)
        .is_some_and(|p| p.kind == PieceKind::Pawn && to.rank() == p.color.promotion_rank())
}
