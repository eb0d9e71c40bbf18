//! Move notations: SAN, figurine SAN and UCI.
//!
//! Generation always produces the canonical form. Parsing is tolerant by
//! default; strict parsing rejects anything that differs from what the
//! generator would write.

mod san;
mod uci;

pub use san::{figurine_to_move, move_to_figurine, move_to_san, san_to_move};
pub use uci::{move_to_uci, uci_to_move};

use thiserror::Error;
use tracing::debug;

use crate::{MoveDescriptor, Position};

/// Why a move text was rejected.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum NotationErrorKind {
    #[error("empty move text")]
    Empty,

    #[error("not a move in this notation")]
    InvalidSyntax,

    #[error("the position is not legal")]
    IllegalPosition,

    #[error("no legal move matches")]
    NoMatchingMove,

    #[error("more than one legal move matches")]
    AmbiguousMove,

    #[error("castling is not legal here")]
    IllegalCastling,

    #[error("promotion piece missing")]
    MissingPromotion,

    #[error("promotion given for a move that does not promote")]
    UnexpectedPromotion,

    #[error("pawns cannot promote to that piece")]
    IllegalPromotionPiece,

    #[error("capture symbol on a move that captures nothing")]
    CaptureSymbolOnNonCapture,

    #[error("glyph color does not match the side to move")]
    WrongGlyphColor,

    #[error("capture symbol missing")]
    MissingCaptureSymbol,

    #[error("check or mate symbol does not match the resulting position")]
    WrongCheckSymbol,

    #[error("disambiguation is not minimal")]
    NonCanonicalDisambiguation,

    #[error("castling must be written with the letter O")]
    NonCanonicalCastling,

    #[error("promotion must be introduced by '='")]
    MissingPromotionSymbol,

    #[error("pawn moves are written without a piece letter")]
    PawnDesignator,

    #[error("castling is not written in the expected UCI form")]
    NonCanonicalUci,
}

impl NotationErrorKind {
    /// True if the text is not a move at all, as opposed to a well-formed
    /// move that is not legal (or not canonical) in the position.
    pub fn is_malformed(self) -> bool {
        matches!(self, NotationErrorKind::Empty | NotationErrorKind::InvalidSyntax)
    }
}

/// A move text that does not resolve to a legal move.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid move '{notation}' in position '{fen}': {kind}")]
pub struct InvalidNotation {
    pub fen: String,
    pub notation: String,
    pub kind: NotationErrorKind,
}

impl InvalidNotation {
    pub(crate) fn new(position: &Position, notation: &str, kind: NotationErrorKind) -> Self {
        InvalidNotation {
            fen: position.fen(),
            notation: notation.to_string(),
            kind,
        }
    }

    #[inline]
    pub fn is_malformed(&self) -> bool {
        self.kind.is_malformed()
    }
}

impl Position {
    /// Returns the SAN of a legal move of this position.
    pub fn notation(&self, mv: &MoveDescriptor) -> String {
        move_to_san(self, mv)
    }

    /// Returns the SAN of a legal move with piece letters replaced by glyphs.
    pub fn figurine_notation(&self, mv: &MoveDescriptor) -> String {
        move_to_figurine(self, mv)
    }

    /// Returns the UCI text of a legal move.
    pub fn uci(&self, mv: &MoveDescriptor) -> String {
        move_to_uci(self, mv, false)
    }

    /// Returns the UCI text of a legal move, writing castling as
    /// king-takes-rook when `force_kxr` is set.
    pub fn uci_with(&self, mv: &MoveDescriptor, force_kxr: bool) -> String {
        move_to_uci(self, mv, force_kxr)
    }

    pub fn parse_notation(&self, text: &str, strict: bool) -> Result<MoveDescriptor, InvalidNotation> {
        san_to_move(self, text, strict)
    }

    pub fn parse_figurine_notation(
        &self,
        text: &str,
        strict: bool,
    ) -> Result<MoveDescriptor, InvalidNotation> {
        figurine_to_move(self, text, strict)
    }

    pub fn parse_uci(
        &self,
        text: &str,
        strict: bool,
        force_kxr: bool,
    ) -> Result<MoveDescriptor, InvalidNotation> {
        uci_to_move(self, text, strict, force_kxr)
    }

    /// Plays a move given in SAN (tolerant).
    ///
    /// Returns `Ok(false)` without touching the position if the text is a
    /// well-formed move that is not legal here. Malformed text is an error.
    pub fn play_notation(&mut self, text: &str) -> Result<bool, InvalidNotation> {
        let parsed = san_to_move(self, text, false);
        self.play_parsed(parsed)
    }

    /// Plays a move given in UCI (tolerant). Same contract as
    /// [`Position::play_notation`].
    pub fn play_uci(&mut self, text: &str) -> Result<bool, InvalidNotation> {
        let parsed = uci_to_move(self, text, false, false);
        self.play_parsed(parsed)
    }

    fn play_parsed(
        &mut self,
        parsed: Result<MoveDescriptor, InvalidNotation>,
    ) -> Result<bool, InvalidNotation> {
        match parsed {
            Ok(mv) => {
                self.play(&mv);
                Ok(true)
            }
            Err(err) if err.is_malformed() => Err(err),
            Err(err) => {
                debug!(fen = %err.fen, notation = %err.notation, reason = %err.kind, "move not played");
                Ok(false)
            }
        }
    }
}
