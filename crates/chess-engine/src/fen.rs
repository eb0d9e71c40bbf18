//! FEN and X-FEN serialization for [`Position`].

use chess_core::{
    format_board, CastlingStyle, Color, FenErrorKind, FenParser, FenRecord, File, InvalidFen,
    Piece, Rank, Square, Variant,
};
use tracing::debug;

use crate::{Bitboard, Position};

/// Options for [`Position::fen_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FenOptions {
    /// Written instead of the position's halfmove clock.
    pub fifty_move_clock: Option<u32>,
    /// Written instead of the position's fullmove number.
    pub full_move_number: Option<u32>,
    /// Prefix non-regular variants with `<variant>:`.
    pub with_variant: bool,
    /// In Chess960, write `K`/`Q` letters for rights on the outermost rooks.
    pub regular_fen_if_possible: bool,
}

impl Position {
    /// Parses a FEN string tolerantly. A `<variant>:` prefix selects the
    /// variant, regular chess otherwise.
    pub fn from_fen(fen: &str) -> Result<Self, InvalidFen> {
        Self::from_fen_with(Variant::Regular, fen, false)
    }

    /// Parses a FEN string, rejecting anything non-canonical or inconsistent.
    pub fn from_fen_strict(fen: &str) -> Result<Self, InvalidFen> {
        Self::from_fen_with(Variant::Regular, fen, true)
    }

    /// Parses a FEN string in the given variant, unless the string is
    /// prefixed with another one.
    pub fn from_fen_with(variant: Variant, fen: &str, strict: bool) -> Result<Self, InvalidFen> {
        let record = FenParser::parse_with(fen, variant, strict).map_err(|err| {
            debug!(fen, reason = %err.kind, "rejected FEN");
            err
        })?;
        let position = Self::from_record(record, variant);
        if strict {
            position.check_strict_consistency(fen)?;
        }
        Ok(position)
    }

    /// Replaces the whole position with a tolerantly parsed FEN string.
    /// The current variant is kept unless the string is prefixed.
    /// On error the position is left untouched.
    pub fn set_fen(&mut self, fen: &str) -> Result<(), InvalidFen> {
        *self = Self::from_fen_with(self.variant, fen, false)?;
        Ok(())
    }

    /// Strict counterpart of [`Position::set_fen`].
    pub fn set_fen_strict(&mut self, fen: &str) -> Result<(), InvalidFen> {
        *self = Self::from_fen_with(self.variant, fen, true)?;
        Ok(())
    }

    /// Returns the FEN string of this position.
    pub fn fen(&self) -> String {
        self.fen_with(&FenOptions::default())
    }

    /// Returns the FEN string of this position with the given options.
    pub fn fen_with(&self, options: &FenOptions) -> String {
        let mut fen = String::with_capacity(90);
        if options.with_variant && self.variant != Variant::Regular {
            fen.push_str(self.variant.name());
            fen.push(':');
        }

        fen.push_str(&format_board(&self.board_array()));

        fen.push(' ');
        fen.push(self.turn.to_char());

        fen.push(' ');
        fen.push_str(&self.castling_field(options.regular_fen_if_possible));

        fen.push(' ');
        match self.en_passant_target() {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        let halfmove = options.fifty_move_clock.unwrap_or(self.halfmove_clock);
        let fullmove = options.full_move_number.unwrap_or(self.fullmove_number);
        fen.push_str(&format!(" {} {}", halfmove, fullmove));
        fen
    }

    fn castling_field(&self, regular_if_possible: bool) -> String {
        let xfen = self.variant.rules().castling == CastlingStyle::Chess960;
        let mut field = String::new();
        for color in Color::ALL {
            let flags = self.castling[color.index()];
            for file in File::ALL.into_iter().rev() {
                if flags & (1 << file.index()) == 0 {
                    continue;
                }
                let letter = if !xfen {
                    if file == File::A {
                        'Q'
                    } else {
                        'K'
                    }
                } else if regular_if_possible {
                    self.outermost_rook_letter(color, file)
                        .unwrap_or_else(|| file.to_char().to_ascii_uppercase())
                } else {
                    file.to_char().to_ascii_uppercase()
                };
                field.push(match color {
                    Color::White => letter,
                    Color::Black => letter.to_ascii_lowercase(),
                });
            }
        }
        if field.is_empty() {
            field.push('-');
        }
        field
    }

    /// `K` or `Q` if the right on `file` belongs to the outermost rook on its
    /// side of the king.
    fn outermost_rook_letter(&self, color: Color, file: File) -> Option<char> {
        let back_rank = Bitboard::rank(color.back_rank());
        let king = (self.pieces_of(Piece::King, color) & back_rank).single()?;
        let rooks = self.pieces_of(Piece::Rook, color) & back_rank;
        let rook_files = |range: std::ops::Range<u8>| {
            range.filter(|&f| rooks.contains(Square::new(File::ALL[f as usize], king.rank())))
                .count()
        };
        if file.index() > king.file().index() && rook_files(file.index() + 1..8) == 0 {
            Some('K')
        } else if file.index() < king.file().index() && rook_files(0..file.index()) == 0 {
            Some('Q')
        } else {
            None
        }
    }

    fn from_record(record: FenRecord, default_variant: Variant) -> Self {
        let variant = record.variant.unwrap_or(default_variant);
        let mut position = Position::empty(variant);
        for sq in Square::all() {
            if let Some(piece) = record.board[sq.index() as usize] {
                position.put(sq, piece);
            }
        }
        position.turn = record.turn;
        position.castling = position.parse_castling_field(&record.castling);
        position.en_passant = record.en_passant.map(|sq| sq.file());
        position.halfmove_clock = record.halfmove_clock;
        position.fullmove_number = record.fullmove_number;
        position
    }

    /// Resolves castling letters against the board already set up.
    fn parse_castling_field(&self, field: &str) -> [u8; 2] {
        let mut castling = [0u8; 2];
        let xfen = self.variant.rules().castling == CastlingStyle::Chess960;
        for c in field.chars().filter(|&c| c != '-') {
            let color = if c.is_ascii_uppercase() {
                Color::White
            } else {
                Color::Black
            };
            let file = match c.to_ascii_lowercase() {
                'k' if xfen => self.outermost_rook_file(color, true).unwrap_or(File::H),
                'q' if xfen => self.outermost_rook_file(color, false).unwrap_or(File::A),
                'k' => File::H,
                'q' => File::A,
                other => match File::from_char(other) {
                    Some(file) => file,
                    None => continue,
                },
            };
            castling[color.index()] |= 1 << file.index();
        }
        castling
    }

    /// File of the rook closest to the corner on the given side of the king.
    fn outermost_rook_file(&self, color: Color, king_side: bool) -> Option<File> {
        let back_rank = Bitboard::rank(color.back_rank());
        let king = (self.pieces_of(Piece::King, color) & back_rank).single()?;
        let rooks = self.pieces_of(Piece::Rook, color) & back_rank;
        let is_rook = |file: &File| rooks.contains(Square::new(*file, king.rank()));
        if king_side {
            File::ALL[king.file().index() as usize + 1..]
                .iter()
                .rev()
                .find(|f| is_rook(f))
                .copied()
        } else {
            File::ALL[..king.file().index() as usize]
                .iter()
                .find(|f| is_rook(f))
                .copied()
        }
    }

    /// Checks that only strict parsing performs: castling flags and the en
    /// passant square must match the board.
    fn check_strict_consistency(&self, fen: &str) -> Result<(), InvalidFen> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        let field = |index: usize| fields.get(index).copied().unwrap_or("").to_string();

        if !self.castling_flags_consistent() {
            let err = InvalidFen::new(fen, FenErrorKind::InconsistentCastling(field(2)));
            debug!(fen, reason = %err.kind, "rejected FEN");
            return Err(err);
        }
        if !self.en_passant_consistent() {
            let err = InvalidFen::new(fen, FenErrorKind::InconsistentEnPassant(field(3)));
            debug!(fen, reason = %err.kind, "rejected FEN");
            return Err(err);
        }
        Ok(())
    }

    /// Castling flags are backed by pieces, and a Chess960 color has at most
    /// one right on each side of its king.
    fn castling_flags_consistent(&self) -> bool {
        if self.effective_castling_rights() != self.castling {
            return false;
        }
        if self.variant.rules().castling != CastlingStyle::Chess960 {
            return true;
        }
        Color::ALL.into_iter().all(|color| {
            let flags = self.castling[color.index()];
            let Some(king) = self.pieces_of(Piece::King, color).single() else {
                return flags == 0;
            };
            let below = flags & ((1u8 << king.file().index()) - 1);
            let above = flags >> king.file().index();
            below.count_ones() <= 1 && above.count_ones() <= 1
        })
    }

    /// The en passant file, if any, points behind a pawn that could just have
    /// advanced two squares.
    fn en_passant_consistent(&self) -> bool {
        let Some(target) = self.en_passant_target() else {
            return true;
        };
        let mover = self.turn.opposite();
        let origin_rank = match mover {
            Color::White => Rank::R2,
            Color::Black => Rank::R7,
        };
        let origin = Square::new(target.file(), origin_rank);
        let pawn = Square::new(target.file(), double_step_rank(mover));
        let occupied = self.occupied();
        !occupied.contains(target)
            && !occupied.contains(origin)
            && self.pieces_of(Piece::Pawn, mover).contains(pawn)
    }
}

/// The rank on which a pawn that just made a double step stands.
fn double_step_rank(mover: Color) -> Rank {
    match mover {
        Color::White => Rank::R4,
        Color::Black => Rank::R5,
    }
}
