//! Castling right identifiers.

use std::fmt;

use crate::{CastlingStyle, Color, File, IllegalArgument, Variant};

/// One castling right: a color and the file its castling rook starts on.
///
/// Standard chess only ever uses the a- and h-files (`wq`, `wk`, ...),
/// Chess960 may use any file (`wa` ... `wh`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CastleRight {
    pub color: Color,
    pub file: File,
}

impl CastleRight {
    #[inline]
    pub const fn new(color: Color, file: File) -> Self {
        CastleRight { color, file }
    }

    /// Parses a two-letter castle identifier, validated against `variant`.
    ///
    /// `wk`/`wq`/`bk`/`bq` are accepted by every variant except Chess960;
    /// `wa`..`wh` and `ba`..`bh` only by Chess960.
    pub fn parse(id: &str, variant: Variant) -> Result<Self, IllegalArgument> {
        let invalid = || IllegalArgument::InvalidCastle {
            castle: id.to_string(),
            variant,
        };
        let mut chars = id.chars();
        let (Some(c), Some(s), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(invalid());
        };
        let color = Color::from_char(c).ok_or_else(invalid)?;
        let file = if variant.rules().castling == CastlingStyle::Chess960 {
            if !s.is_ascii_lowercase() {
                return Err(invalid());
            }
            File::from_char(s).ok_or_else(invalid)?
        } else {
            match s {
                'k' => File::H,
                'q' => File::A,
                _ => return Err(invalid()),
            }
        };
        Ok(CastleRight { color, file })
    }

    /// Returns the identifier for this right in the given variant.
    pub fn identifier(self, variant: Variant) -> String {
        let side = if variant.rules().castling == CastlingStyle::Chess960 {
            self.file.to_char()
        } else if self.file == File::A {
            'q'
        } else {
            'k'
        };
        format!("{}{}", self.color.to_char(), side)
    }
}

impl fmt::Display for CastleRight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.color.to_char(), self.file.to_char())
    }
}
