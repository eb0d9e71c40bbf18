//! Move descriptors.
//!
//! A [`MoveDescriptor`] is a fully resolved move: it records everything
//! needed to apply the move to the position it was generated from. Only the
//! move generator creates descriptors.

use std::fmt;

use chess_core::{Color, ColoredPiece, IllegalArgument, Piece, Square};

/// What kind of move a descriptor describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Any move not covered by the other kinds, captures included.
    Normal,
    /// A pawn advancing two squares from its second rank.
    DoublePush,
    /// The king moves from `from` to `to` and the rook from `rook_from` to `rook_to`.
    Castling { rook_from: Square, rook_to: Square },
    /// A pawn capturing en passant; the captured pawn is not on `to`.
    EnPassant,
    /// A pawn reaching its last rank, possibly capturing.
    Promotion(Piece),
}

/// One fully resolved move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveDescriptor {
    from: Square,
    to: Square,
    moving: ColoredPiece,
    captured: Option<(ColoredPiece, Square)>,
    kind: MoveKind,
}

impl MoveDescriptor {
    pub(crate) fn normal(
        from: Square,
        to: Square,
        moving: ColoredPiece,
        captured: Option<ColoredPiece>,
    ) -> Self {
        MoveDescriptor {
            from,
            to,
            moving,
            captured: captured.map(|piece| (piece, to)),
            kind: MoveKind::Normal,
        }
    }

    pub(crate) fn double_push(from: Square, to: Square, moving: ColoredPiece) -> Self {
        MoveDescriptor {
            from,
            to,
            moving,
            captured: None,
            kind: MoveKind::DoublePush,
        }
    }

    pub(crate) fn castling(
        from: Square,
        to: Square,
        moving: ColoredPiece,
        rook_from: Square,
        rook_to: Square,
    ) -> Self {
        MoveDescriptor {
            from,
            to,
            moving,
            captured: None,
            kind: MoveKind::Castling { rook_from, rook_to },
        }
    }

    pub(crate) fn en_passant(
        from: Square,
        to: Square,
        moving: ColoredPiece,
        captured_square: Square,
    ) -> Self {
        let captured = ColoredPiece::new(moving.color.opposite(), Piece::Pawn);
        MoveDescriptor {
            from,
            to,
            moving,
            captured: Some((captured, captured_square)),
            kind: MoveKind::EnPassant,
        }
    }

    pub(crate) fn new_promotion(
        from: Square,
        to: Square,
        moving: ColoredPiece,
        captured: Option<ColoredPiece>,
        promotion: Piece,
    ) -> Self {
        MoveDescriptor {
            from,
            to,
            moving,
            captured: captured.map(|piece| (piece, to)),
            kind: MoveKind::Promotion(promotion),
        }
    }

    /// Origin square of the moving piece (the king, for castling).
    #[inline]
    pub fn from(&self) -> Square {
        self.from
    }

    /// Destination square of the moving piece (the king, for castling).
    #[inline]
    pub fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.moving.color
    }

    #[inline]
    pub fn moving_piece(&self) -> Piece {
        self.moving.piece
    }

    #[inline]
    pub fn moving_colored_piece(&self) -> ColoredPiece {
        self.moving
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    #[inline]
    pub fn is_castling(&self) -> bool {
        matches!(self.kind, MoveKind::Castling { .. })
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.kind == MoveKind::EnPassant
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        matches!(self.kind, MoveKind::Promotion(_))
    }

    #[inline]
    pub fn is_double_push(&self) -> bool {
        self.kind == MoveKind::DoublePush
    }

    /// The piece placed on `to`: the promoted piece, or the moving piece.
    pub fn arriving_colored_piece(&self) -> ColoredPiece {
        match self.kind {
            MoveKind::Promotion(piece) => ColoredPiece::new(self.moving.color, piece),
            _ => self.moving,
        }
    }

    pub fn captured_piece(&self) -> Result<Piece, IllegalArgument> {
        self.captured_colored_piece().map(|piece| piece.piece)
    }

    pub fn captured_colored_piece(&self) -> Result<ColoredPiece, IllegalArgument> {
        self.captured
            .map(|(piece, _)| piece)
            .ok_or_else(|| not_applicable("captured piece", "non-capture"))
    }

    /// Square of the captured piece. Differs from `to` only en passant.
    pub fn captured_square(&self) -> Result<Square, IllegalArgument> {
        self.captured
            .map(|(_, square)| square)
            .ok_or_else(|| not_applicable("captured square", "non-capture"))
    }

    pub fn rook_from(&self) -> Result<Square, IllegalArgument> {
        match self.kind {
            MoveKind::Castling { rook_from, .. } => Ok(rook_from),
            _ => Err(not_applicable("rook origin", "non-castling")),
        }
    }

    pub fn rook_to(&self) -> Result<Square, IllegalArgument> {
        match self.kind {
            MoveKind::Castling { rook_to, .. } => Ok(rook_to),
            _ => Err(not_applicable("rook destination", "non-castling")),
        }
    }

    /// Square of the pawn captured en passant.
    pub fn en_passant_square(&self) -> Result<Square, IllegalArgument> {
        match (self.kind, self.captured) {
            (MoveKind::EnPassant, Some((_, square))) => Ok(square),
            _ => Err(not_applicable("en passant square", "non-en-passant")),
        }
    }

    pub fn promotion(&self) -> Result<Piece, IllegalArgument> {
        match self.kind {
            MoveKind::Promotion(piece) => Ok(piece),
            _ => Err(not_applicable("promotion", "non-promotion")),
        }
    }

    pub fn colored_promotion(&self) -> Result<ColoredPiece, IllegalArgument> {
        self.promotion()
            .map(|piece| ColoredPiece::new(self.moving.color, piece))
    }
}

fn not_applicable(field: &'static str, kind: &'static str) -> IllegalArgument {
    IllegalArgument::NotApplicable { field, kind }
}

impl fmt::Display for MoveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        match self.kind {
            MoveKind::Castling { .. } => write!(f, "O"),
            MoveKind::Promotion(piece) => write!(f, "{}", piece.to_san_char()),
            _ => Ok(()),
        }
    }
}
