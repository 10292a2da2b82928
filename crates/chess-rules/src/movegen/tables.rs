//! Static lookup tables computed at compile time.
//!
//! Everything here derives from one table: how many steps each square is
//! from the board edge in each of the eight ray directions.

use crate::SquareSet;
use chess_core::Square;

/// The eight ray directions as square-index offsets.
///
/// Indices 0-3 are orthogonal, 4-7 diagonal.
pub const DIRECTIONS: [i8; 8] = [8, -8, 1, -1, 9, 7, -7, -9];

pub const ORTHOGONAL: std::ops::Range<usize> = 0..4;
pub const DIAGONAL: std::ops::Range<usize> = 4..8;

/// `DISTANCE_TO_EDGE[square][direction]`: steps available before leaving the board.
pub const DISTANCE_TO_EDGE: [[u8; 8]; 64] = compute_distance_to_edge();

pub const KNIGHT_TARGETS: [SquareSet; 64] = compute_knight_targets();

pub const KING_TARGETS: [SquareSet; 64] = compute_king_targets();

const fn min(a: u8, b: u8) -> u8 {
    if a < b {
        a
    } else {
        b
    }
}

const fn compute_distance_to_edge() -> [[u8; 8]; 64] {
    let mut table = [[0u8; 8]; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let file = (sq % 8) as u8;
        let rank = (sq / 8) as u8;
        let up = 7 - rank;
        let down = rank;
        let right = 7 - file;
        let left = file;

        table[sq] = [
            up,
            down,
            right,
            left,
            min(up, right),
            min(up, left),
            min(down, right),
            min(down, left),
        ];
        sq += 1;
    }

    table
}

const fn compute_knight_targets() -> [SquareSet; 64] {
    // (offset, steps needed left, right, down, up)
    const JUMPS: [(i8, u8, u8, u8, u8); 8] = [
        (-17, 1, 0, 2, 0),
        (-15, 0, 1, 2, 0),
        (-10, 2, 0, 1, 0),
        (-6, 0, 2, 1, 0),
        (6, 2, 0, 0, 1),
        (10, 0, 2, 0, 1),
        (15, 1, 0, 0, 2),
        (17, 0, 1, 0, 2),
    ];

    let mut targets = [SquareSet::EMPTY; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let dist = DISTANCE_TO_EDGE[sq];
        let mut bits = 0u64;
        let mut i = 0;
        while i < JUMPS.len() {
            let (offset, left, right, down, up) = JUMPS[i];
            if dist[3] >= left && dist[2] >= right && dist[1] >= down && dist[0] >= up {
                bits |= 1u64 << (sq as i8 + offset) as u32;
            }
            i += 1;
        }
        targets[sq] = SquareSet(bits);
        sq += 1;
    }

    targets
}

const fn compute_king_targets() -> [SquareSet; 64] {
    let mut targets = [SquareSet::EMPTY; 64];
    let mut sq = 0usize;

    while sq < 64 {
        let mut bits = 0u64;
        let mut dir = 0;
        while dir < 8 {
            if DISTANCE_TO_EDGE[sq][dir] >= 1 {
                bits |= 1u64 << (sq as i8 + DIRECTIONS[dir]) as u32;
            }
            dir += 1;
        }
        targets[sq] = SquareSet(bits);
        sq += 1;
    }

    targets
}

/// Walks from `from` in direction `dir`, yielding squares until the edge.
pub fn ray(from: Square, dir: usize) -> impl Iterator<Item = Square> {
    let steps = DISTANCE_TO_EDGE[from.index() as usize][dir] as i8;
    let offset = DIRECTIONS[dir];
    (1..=steps).filter_map(move |n| from.offset(offset * n))
}

/// Returns the direction index leading from `from` to `to`, if they share a line.
pub fn direction_between(from: Square, to: Square) -> Option<usize> {
    (0..8).find(|&dir| ray(from, dir).any(|sq| sq == to))
}

/// Squares strictly between two squares on a shared line; empty otherwise.
pub fn between(from: Square, to: Square) -> SquareSet {
    match direction_between(from, to) {
        Some(dir) => ray(from, dir).take_while(|&sq| sq != to).collect(),
        None => SquareSet::EMPTY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn edge_distances() {
        let a1 = DISTANCE_TO_EDGE[0];
        assert_eq!(a1, [7, 0, 7, 0, 7, 0, 0, 0]);
        let e4 = DISTANCE_TO_EDGE[sq("e4").index() as usize];
        // up, down, right, left, up-right, up-left, down-right, down-left
        assert_eq!(e4, [4, 3, 3, 4, 3, 4, 3, 3]);
    }

    #[test]
    fn knight_targets() {
        assert_eq!(KNIGHT_TARGETS[0].len(), 2);
        assert_eq!(KNIGHT_TARGETS[sq("e4").index() as usize].len(), 8);
        assert_eq!(KNIGHT_TARGETS[sq("h8").index() as usize].len(), 2);
        assert!(KNIGHT_TARGETS[Square::G1.index() as usize].contains(sq("f3")));
        assert!(!KNIGHT_TARGETS[Square::H1.index() as usize].contains(sq("a2")));
    }

    #[test]
    fn king_targets() {
        assert_eq!(KING_TARGETS[0].len(), 3);
        assert_eq!(KING_TARGETS[sq("d5").index() as usize].len(), 8);
        assert!(!KING_TARGETS[Square::H1.index() as usize].contains(sq("a2")));
    }

    #[test]
    fn rays_stop_at_edge() {
        let squares: Vec<Square> = ray(sq("f6"), 4).collect();
        assert_eq!(squares, vec![sq("g7"), sq("h8")]);
        assert_eq!(ray(Square::H1, 2).count(), 0);
    }

    #[test]
    fn between_squares() {
        assert_eq!(between(Square::E1, Square::E8).len(), 6);
        assert_eq!(between(Square::A1, Square::H8).len(), 6);
        assert_eq!(between(Square::E1, sq("f3")), SquareSet::EMPTY);
        assert_eq!(between(Square::E1, Square::F1), SquareSet::EMPTY);
        assert_eq!(direction_between(Square::E1, sq("e4")), Some(0));
        assert_eq!(direction_between(Square::E1, sq("f3")), None);
    }
}
