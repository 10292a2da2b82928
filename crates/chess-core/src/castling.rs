//! Castling rights.

use crate::{Color, Square};
use std::fmt;

/// The four castling privileges as a bitset.
///
/// Rights only ever shrink during a game; undo is the one way back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Creates rights from raw flags; unknown bits are dropped.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn flag(color: Color, kingside: bool) -> u8 {
        match (color, kingside) {
            (Color::White, true) => Self::WHITE_KINGSIDE,
            (Color::White, false) => Self::WHITE_QUEENSIDE,
            (Color::Black, true) => Self::BLACK_KINGSIDE,
            (Color::Black, false) => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` may still castle on the given side.
    #[inline]
    pub const fn has(self, color: Color, kingside: bool) -> bool {
        self.0 & Self::flag(color, kingside) != 0
    }

    /// Removes one right.
    #[inline]
    pub fn remove(&mut self, color: Color, kingside: bool) {
        self.0 &= !Self::flag(color, kingside);
    }

    /// Removes both rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.remove(color, true);
        self.remove(color, false);
    }

    /// Returns the raw flags.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Returns true if no right remains.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Home square of the rook that serves a right.
    pub const fn rook_home(color: Color, kingside: bool) -> Square {
        match (color, kingside) {
            (Color::White, true) => Square::H1,
            (Color::White, false) => Square::A1,
            (Color::Black, true) => Square::H8,
            (Color::Black, false) => Square::A8,
        }
    }

    /// Parses the FEN castling field. Letters must come from `KQkq` and may
    /// not repeat; `-` means no rights.
    pub fn from_fen(field: &str) -> Option<Self> {
        if field == "-" {
            return Some(Self::NONE);
        }
        if field.is_empty() {
            return None;
        }
        let mut flags = 0u8;
        for c in field.chars() {
            let flag = match c {
                'K' => Self::WHITE_KINGSIDE,
                'Q' => Self::WHITE_QUEENSIDE,
                'k' => Self::BLACK_KINGSIDE,
                'q' => Self::BLACK_QUEENSIDE,
                _ => return None,
            };
            if flags & flag != 0 {
                return None;
            }
            flags |= flag;
        }
        Some(Self::new(flags))
    }
}

impl fmt::Display for CastlingRights {
    /// Formats the rights as a FEN castling field.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }
        for (color, kingside, c) in [
            (Color::White, true, 'K'),
            (Color::White, false, 'Q'),
            (Color::Black, true, 'k'),
            (Color::Black, false, 'q'),
        ] {
            if self.has(color, kingside) {
                write!(f, "{}", c)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_single_right() {
        let mut rights = CastlingRights::ALL;
        rights.remove(Color::White, true);
        assert!(!rights.has(Color::White, true));
        assert!(rights.has(Color::White, false));
        assert!(rights.has(Color::Black, true));
    }

    #[test]
    fn remove_color() {
        let mut rights = CastlingRights::ALL;
        rights.remove_color(Color::Black);
        assert!(!rights.has(Color::Black, true));
        assert!(!rights.has(Color::Black, false));
        assert_eq!(rights.to_string(), "KQ");
    }

    #[test]
    fn fen_field() {
        assert_eq!(CastlingRights::from_fen("KQkq"), Some(CastlingRights::ALL));
        assert_eq!(CastlingRights::from_fen("-"), Some(CastlingRights::NONE));
        assert_eq!(
            CastlingRights::from_fen("Kq").map(|r| r.raw()),
            Some(CastlingRights::WHITE_KINGSIDE | CastlingRights::BLACK_QUEENSIDE)
        );
        assert_eq!(CastlingRights::from_fen("KK"), None);
        assert_eq!(CastlingRights::from_fen("KX"), None);
        assert_eq!(CastlingRights::from_fen(""), None);
        assert_eq!(CastlingRights::NONE.to_string(), "-");
        assert_eq!(CastlingRights::ALL.to_string(), "KQkq");
    }

    #[test]
    fn rook_homes() {
        assert_eq!(CastlingRights::rook_home(Color::White, true), Square::H1);
        assert_eq!(CastlingRights::rook_home(Color::Black, false), Square::A8);
    }
}
