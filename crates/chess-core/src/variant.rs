//! Chess variants and the rule capabilities each one enables.
//!
//! The engine never branches on a variant name directly. It asks
//! [`Variant::rules`] for a [`VariantRules`] record and consults the
//! individual capabilities (royal kings, castling style, forced captures...).

use std::fmt;
use std::str::FromStr;

use crate::{Color, IllegalArgument};

/// The supported chess variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Variant {
    /// Orthodox chess.
    #[default]
    Regular,
    /// Fischer random chess: shuffled back ranks, file-keyed castling.
    Chess960,
    /// Neither side has a king.
    NoKing,
    /// Only white has a king.
    WhiteKingOnly,
    /// Only black has a king.
    BlackKingOnly,
    /// Losing chess: captures are compulsory, kings are ordinary pieces.
    Antichess,
    /// White has a horde of pawns and no king.
    Horde,
}

/// How castling rights are represented and validated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CastlingStyle {
    /// No castling at all.
    None,
    /// King on the e-file, rooks on the a- and h-files, `KQkq` letters.
    Standard,
    /// King anywhere between the rooks, rights keyed by rook file.
    Chess960,
}

/// Capability table for a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantRules {
    /// Whether each color (indexed by [`Color::index`]) has exactly one king
    /// that must be kept out of check.
    pub royal_king: [bool; 2],
    pub castling: CastlingStyle,
    /// Captures are compulsory whenever one is available.
    pub forced_capture: bool,
    /// Pawns may promote to a king.
    pub king_promotion: bool,
    /// White pawns may stand on the first rank (and double-step from it).
    pub white_pawns_on_first_rank: bool,
    /// Whether kings may appear freely (neither royal nor forbidden).
    pub free_kings: bool,
}

const REGULAR_RULES: VariantRules = VariantRules {
    royal_king: [true, true],
    castling: CastlingStyle::Standard,
    forced_capture: false,
    king_promotion: false,
    white_pawns_on_first_rank: false,
    free_kings: false,
};

/// Board part of the orthodox start position.
pub const REGULAR_START_BOARD: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Board part of the horde start position.
pub const HORDE_START_BOARD: &str = "rnbqkbnr/pppppppp/8/1PP2PP1/PPPPPPPP/PPPPPPPP/PPPPPPPP/PPPPPPPP";

impl Variant {
    /// All variants, in declaration order.
    pub const ALL: [Variant; 7] = [
        Variant::Regular,
        Variant::Chess960,
        Variant::NoKing,
        Variant::WhiteKingOnly,
        Variant::BlackKingOnly,
        Variant::Antichess,
        Variant::Horde,
    ];

    /// Returns the capability table for this variant.
    pub const fn rules(self) -> VariantRules {
        match self {
            Variant::Regular => REGULAR_RULES,
            Variant::Chess960 => VariantRules {
                castling: CastlingStyle::Chess960,
                ..REGULAR_RULES
            },
            Variant::NoKing => VariantRules {
                royal_king: [false, false],
                castling: CastlingStyle::None,
                ..REGULAR_RULES
            },
            Variant::WhiteKingOnly => VariantRules {
                royal_king: [true, false],
                ..REGULAR_RULES
            },
            Variant::BlackKingOnly => VariantRules {
                royal_king: [false, true],
                ..REGULAR_RULES
            },
            Variant::Antichess => VariantRules {
                royal_king: [false, false],
                castling: CastlingStyle::None,
                forced_capture: true,
                king_promotion: true,
                white_pawns_on_first_rank: false,
                free_kings: true,
            },
            Variant::Horde => VariantRules {
                royal_king: [false, true],
                white_pawns_on_first_rank: true,
                ..REGULAR_RULES
            },
        }
    }

    /// Returns true if `color` has a royal king in this variant.
    #[inline]
    pub const fn has_royal_king(self, color: Color) -> bool {
        self.rules().royal_king[color.index()]
    }

    /// Returns true if castling rights may be effective for `color`.
    #[inline]
    pub const fn can_castle(self, color: Color) -> bool {
        !matches!(self.rules().castling, CastlingStyle::None) && self.has_royal_king(color)
    }

    /// Returns the board part of the canonical start position, if the
    /// variant has one.
    pub const fn start_board(self) -> Option<&'static str> {
        match self {
            Variant::Regular | Variant::Antichess => Some(REGULAR_START_BOARD),
            Variant::Horde => Some(HORDE_START_BOARD),
            Variant::Chess960 | Variant::NoKing | Variant::WhiteKingOnly | Variant::BlackKingOnly => {
                None
            }
        }
    }

    /// The name used in variant-prefixed FEN strings.
    pub const fn name(self) -> &'static str {
        match self {
            Variant::Regular => "regular",
            Variant::Chess960 => "chess960",
            Variant::NoKing => "no-king",
            Variant::WhiteKingOnly => "white-king-only",
            Variant::BlackKingOnly => "black-king-only",
            Variant::Antichess => "antichess",
            Variant::Horde => "horde",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = IllegalArgument;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name() == s)
            .ok_or_else(|| IllegalArgument::InvalidVariant(s.to_string()))
    }
}
