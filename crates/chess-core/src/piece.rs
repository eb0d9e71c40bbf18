//! Chess piece representation.

use std::fmt;
use std::str::FromStr;

use crate::{Color, IllegalArgument};

/// The six types of chess pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Piece {
    Pawn = 0,
    Knight = 1,
    Bishop = 2,
    Rook = 3,
    Queen = 4,
    King = 5,
}

impl Piece {
    /// All piece types in order.
    pub const ALL: [Piece; 6] = [
        Piece::Pawn,
        Piece::Knight,
        Piece::Bishop,
        Piece::Rook,
        Piece::Queen,
        Piece::King,
    ];

    /// Returns the index of this piece type (0-5).
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the lowercase letter for this piece ('p', 'n', ...).
    #[inline]
    pub const fn to_char(self) -> char {
        match self {
            Piece::Pawn => 'p',
            Piece::Knight => 'n',
            Piece::Bishop => 'b',
            Piece::Rook => 'r',
            Piece::Queen => 'q',
            Piece::King => 'k',
        }
    }

    /// Parses a piece letter, case-insensitively.
    #[inline]
    pub const fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Piece::Pawn),
            'n' => Some(Piece::Knight),
            'b' => Some(Piece::Bishop),
            'r' => Some(Piece::Rook),
            'q' => Some(Piece::Queen),
            'k' => Some(Piece::King),
            _ => None,
        }
    }

    /// Returns the FEN character for this piece with the given color.
    pub const fn to_fen_char(self, color: Color) -> char {
        let c = self.to_char();
        match color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    /// Parses a FEN character into a piece and color.
    pub const fn from_fen_char(c: char) -> Option<(Piece, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        match Piece::from_char(c) {
            Some(piece) => Some((piece, color)),
            None => None,
        }
    }

    /// Returns the uppercase letter used in SAN ('N', 'B', 'R', 'Q', 'K', 'P').
    #[inline]
    pub const fn to_san_char(self) -> char {
        self.to_char().to_ascii_uppercase()
    }

    /// Parses an uppercase SAN piece letter.
    #[inline]
    pub const fn from_san_char(c: char) -> Option<Self> {
        if c.is_ascii_uppercase() {
            Piece::from_char(c)
        } else {
            None
        }
    }

    /// Returns the unicode chess glyph for this piece in the given color.
    pub const fn figurine(self, color: Color) -> char {
        match (color, self) {
            (Color::White, Piece::King) => '\u{2654}',
            (Color::White, Piece::Queen) => '\u{2655}',
            (Color::White, Piece::Rook) => '\u{2656}',
            (Color::White, Piece::Bishop) => '\u{2657}',
            (Color::White, Piece::Knight) => '\u{2658}',
            (Color::White, Piece::Pawn) => '\u{2659}',
            (Color::Black, Piece::King) => '\u{265A}',
            (Color::Black, Piece::Queen) => '\u{265B}',
            (Color::Black, Piece::Rook) => '\u{265C}',
            (Color::Black, Piece::Bishop) => '\u{265D}',
            (Color::Black, Piece::Knight) => '\u{265E}',
            (Color::Black, Piece::Pawn) => '\u{265F}',
        }
    }

    /// Parses a unicode chess glyph into a piece and its color.
    pub const fn from_figurine(c: char) -> Option<(Piece, Color)> {
        match c {
            '\u{2654}' => Some((Piece::King, Color::White)),
            '\u{2655}' => Some((Piece::Queen, Color::White)),
            '\u{2656}' => Some((Piece::Rook, Color::White)),
            '\u{2657}' => Some((Piece::Bishop, Color::White)),
            '\u{2658}' => Some((Piece::Knight, Color::White)),
            '\u{2659}' => Some((Piece::Pawn, Color::White)),
            '\u{265A}' => Some((Piece::King, Color::Black)),
            '\u{265B}' => Some((Piece::Queen, Color::Black)),
            '\u{265C}' => Some((Piece::Rook, Color::Black)),
            '\u{265D}' => Some((Piece::Bishop, Color::Black)),
            '\u{265E}' => Some((Piece::Knight, Color::Black)),
            '\u{265F}' => Some((Piece::Pawn, Color::Black)),
            _ => None,
        }
    }

    /// Returns true if this piece is a sliding piece (bishop, rook, or queen).
    #[inline]
    pub const fn is_slider(self) -> bool {
        matches!(self, Piece::Bishop | Piece::Rook | Piece::Queen)
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Piece::Pawn => "Pawn",
            Piece::Knight => "Knight",
            Piece::Bishop => "Bishop",
            Piece::Rook => "Rook",
            Piece::Queen => "Queen",
            Piece::King => "King",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Piece {
    type Err = IllegalArgument;

    /// Parses a one-letter lowercase piece code ("p", "n", ..., "k").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => {
                Piece::from_char(c).ok_or_else(|| IllegalArgument::InvalidPiece(s.to_string()))
            }
            _ => Err(IllegalArgument::InvalidPiece(s.to_string())),
        }
    }
}

/// A piece together with its color, e.g. the white king.
///
/// The textual code is two letters: color then piece (`wk`, `bp`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ColoredPiece {
    pub color: Color,
    pub piece: Piece,
}

impl ColoredPiece {
    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        ColoredPiece { color, piece }
    }

    /// Index in 0..12, white pieces first.
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.piece.index()
    }

    #[inline]
    pub const fn to_fen_char(self) -> char {
        self.piece.to_fen_char(self.color)
    }

    pub const fn from_fen_char(c: char) -> Option<Self> {
        match Piece::from_fen_char(c) {
            Some((piece, color)) => Some(ColoredPiece { color, piece }),
            None => None,
        }
    }

    #[inline]
    pub const fn figurine(self) -> char {
        self.piece.figurine(self.color)
    }
}

impl fmt::Display for ColoredPiece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.to_char(), self.piece.to_char())
    }
}

impl FromStr for ColoredPiece {
    type Err = IllegalArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IllegalArgument::InvalidColoredPiece(s.to_string());
        let mut chars = s.chars();
        let (Some(c), Some(p), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let color = Color::from_char(c).ok_or_else(invalid)?;
        if !p.is_ascii_lowercase() {
            return Err(invalid());
        }
        let piece = Piece::from_char(p).ok_or_else(invalid)?;
        Ok(ColoredPiece { color, piece })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn piece_to_fen() {
        assert_eq!(Piece::Pawn.to_fen_char(Color::White), 'P');
        assert_eq!(Piece::Pawn.to_fen_char(Color::Black), 'p');
        assert_eq!(Piece::King.to_fen_char(Color::White), 'K');
        assert_eq!(Piece::Knight.to_fen_char(Color::Black), 'n');
    }

    #[test]
    fn piece_from_fen() {
        assert_eq!(Piece::from_fen_char('P'), Some((Piece::Pawn, Color::White)));
        assert_eq!(Piece::from_fen_char('p'), Some((Piece::Pawn, Color::Black)));
        assert_eq!(Piece::from_fen_char('K'), Some((Piece::King, Color::White)));
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn san_letters() {
        assert_eq!(Piece::Knight.to_san_char(), 'N');
        assert_eq!(Piece::from_san_char('Q'), Some(Piece::Queen));
        assert_eq!(Piece::from_san_char('q'), None);
        assert_eq!(Piece::from_san_char('X'), None);
    }

    #[test]
    fn figurines_are_color_sensitive() {
        assert_eq!(Piece::Knight.figurine(Color::White), '♘');
        assert_eq!(Piece::Knight.figurine(Color::Black), '♞');
        for piece in Piece::ALL {
            for color in Color::ALL {
                assert_eq!(Piece::from_figurine(piece.figurine(color)), Some((piece, color)));
            }
        }
        assert_eq!(Piece::from_figurine('N'), None);
    }

    #[test]
    fn is_slider() {
        assert!(!Piece::Pawn.is_slider());
        assert!(!Piece::Knight.is_slider());
        assert!(Piece::Bishop.is_slider());
        assert!(Piece::Rook.is_slider());
        assert!(Piece::Queen.is_slider());
        assert!(!Piece::King.is_slider());
    }

    #[test]
    fn colored_piece_codes() {
        let wk: ColoredPiece = "wk".parse().unwrap();
        assert_eq!(wk, ColoredPiece::new(Color::White, Piece::King));
        assert_eq!(wk.to_string(), "wk");
        assert_eq!(wk.to_fen_char(), 'K');
        assert_eq!("bp".parse::<ColoredPiece>().unwrap().to_fen_char(), 'p');

        for bad in ["", "w", "wK", "xk", "wkk", "wz"] {
            assert_eq!(
                bad.parse::<ColoredPiece>(),
                Err(IllegalArgument::InvalidColoredPiece(bad.to_string()))
            );
        }
    }

    #[test]
    fn piece_codes() {
        assert_eq!("q".parse::<Piece>(), Ok(Piece::Queen));
        assert!("Q".parse::<Piece>().is_err());
        assert!("qq".parse::<Piece>().is_err());
    }
}
