//! Chess position representation.

use std::fmt;
use std::str::FromStr;

use chess_core::{
    CastleRight, CastlingStyle, Color, ColoredPiece, File, IllegalArgument, InvalidFen, Piece,
    Rank, Square, Variant,
};

use crate::Bitboard;

/// Complete position state: board, variant, side to move, castling rights,
/// en passant file and move counters.
///
/// Setters trust the caller: they never check that the resulting position
/// is consistent. Use [`Position::is_legal`] for that.
#[derive(Debug, Clone)]
pub struct Position {
    /// Bitboards for each piece type, indexed by Piece enum.
    pub(crate) pieces: [Bitboard; 6],

    /// Bitboards for each color's pieces.
    pub(crate) colors: [Bitboard; 2],

    pub(crate) variant: Variant,

    pub(crate) turn: Color,

    /// Castling rights per color; bit `f` is the right for the rook on file `f`.
    pub(crate) castling: [u8; 2],

    /// File of the pawn that just made a double step, if any.
    pub(crate) en_passant: Option<File>,

    pub(crate) halfmove_clock: u32,

    pub(crate) fullmove_number: u32,
}

/// Knight placements for Scharnagl numbering, indexed by the remaining code
/// (0..10), as positions among the five squares left after bishops and queen.
const KNIGHT_TABLE: [(usize, usize); 10] = [
    (0, 1),
    (0, 2),
    (0, 3),
    (0, 4),
    (1, 2),
    (1, 3),
    (1, 4),
    (2, 3),
    (2, 4),
    (3, 4),
];

impl Position {
    /// Creates an empty board in the given variant, white to move.
    pub fn empty(variant: Variant) -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            variant,
            turn: Color::White,
            castling: [0; 2],
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// Creates the regular starting position.
    pub fn new() -> Self {
        Self::board_from_layout(Variant::Regular, chess_core::REGULAR_START_BOARD, [0x81, 0x81])
    }

    /// Creates the canonical starting position of a variant.
    pub fn start(variant: Variant) -> Result<Self, IllegalArgument> {
        match variant {
            Variant::Regular => Ok(Self::new()),
            Variant::Antichess => Ok(Self::board_from_layout(
                variant,
                chess_core::REGULAR_START_BOARD,
                [0, 0],
            )),
            Variant::Horde => Ok(Self::board_from_layout(
                variant,
                chess_core::HORDE_START_BOARD,
                [0, 0x81],
            )),
            Variant::Chess960 | Variant::NoKing | Variant::WhiteKingOnly | Variant::BlackKingOnly => {
                Err(IllegalArgument::NoCanonicalStart(variant))
            }
        }
    }

    /// Creates the Chess960 starting position with the given Scharnagl code
    /// (0-959, 518 being the regular setup).
    pub fn chess960(code: u32) -> Result<Self, IllegalArgument> {
        if code > 959 {
            return Err(IllegalArgument::InvalidScharnaglCode(code));
        }

        let mut rank: [Option<Piece>; 8] = [None; 8];
        let mut n = code as usize;
        rank[2 * (n % 4) + 1] = Some(Piece::Bishop);
        n /= 4;
        rank[2 * (n % 4)] = Some(Piece::Bishop);
        n /= 4;
        place_on_nth_empty(&mut rank, n % 6, Piece::Queen);
        n /= 6;
        let (first, second) = KNIGHT_TABLE[n];
        // The second knight goes first so that the first index is not shifted.
        place_on_nth_empty(&mut rank, second, Piece::Knight);
        place_on_nth_empty(&mut rank, first, Piece::Knight);
        for piece in [Piece::Rook, Piece::King, Piece::Rook] {
            place_on_nth_empty(&mut rank, 0, piece);
        }

        let mut position = Position::empty(Variant::Chess960);
        let mut rook_files = 0u8;
        for (file, piece) in rank.iter().enumerate() {
            let Some(piece) = *piece else { continue };
            let file = File::ALL[file];
            position.put(Square::new(file, Rank::R1), ColoredPiece::new(Color::White, piece));
            position.put(Square::new(file, Rank::R8), ColoredPiece::new(Color::Black, piece));
            position.put(Square::new(file, Rank::R2), ColoredPiece::new(Color::White, Piece::Pawn));
            position.put(Square::new(file, Rank::R7), ColoredPiece::new(Color::Black, Piece::Pawn));
            if piece == Piece::Rook {
                rook_files |= 1 << file.index();
            }
        }
        position.castling = [rook_files; 2];
        Ok(position)
    }

    fn board_from_layout(variant: Variant, layout: &str, castling: [u8; 2]) -> Self {
        let mut position = Position::empty(variant);
        for (rank_idx, text) in layout.split('/').enumerate() {
            let rank = 7 - rank_idx as u8;
            let mut file = 0u8;
            for c in text.chars() {
                if let Some(run) = c.to_digit(10) {
                    file += run as u8;
                } else if let Some(piece) = ColoredPiece::from_fen_char(c) {
                    if let Some(sq) = Square::from_index(rank * 8 + file) {
                        position.put(sq, piece);
                    }
                    file += 1;
                }
            }
        }
        position.castling = castling;
        position
    }

    /// Empties the board and switches to the given variant.
    pub fn clear(&mut self, variant: Variant) {
        *self = Position::empty(variant);
    }

    /// Resets to the regular starting position.
    pub fn reset(&mut self) {
        *self = Position::new();
    }

    /// Resets to a Chess960 starting position.
    pub fn reset960(&mut self, code: u32) -> Result<(), IllegalArgument> {
        *self = Position::chess960(code)?;
        Ok(())
    }

    /// Resets to the antichess starting position.
    pub fn reset_antichess(&mut self) {
        *self = Self::board_from_layout(Variant::Antichess, chess_core::REGULAR_START_BOARD, [0, 0]);
    }

    /// Resets to the horde starting position.
    pub fn reset_horde(&mut self) {
        *self = Self::board_from_layout(Variant::Horde, chess_core::HORDE_START_BOARD, [0, 0x81]);
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Returns the content of a square.
    pub fn square(&self, sq: Square) -> Option<ColoredPiece> {
        self.piece_at(sq)
            .map(|(piece, color)| ColoredPiece::new(color, piece))
    }

    /// Sets the content of a square.
    pub fn set_square(&mut self, sq: Square, content: Option<ColoredPiece>) {
        self.remove(sq);
        if let Some(piece) = content {
            self.put(sq, piece);
        }
    }

    #[inline]
    pub fn turn(&self) -> Color {
        self.turn
    }

    #[inline]
    pub fn set_turn(&mut self, turn: Color) {
        self.turn = turn;
    }

    /// Returns whether the castling right named by `id` (`wk`, `bq`, or
    /// `wa`..`bh` in Chess960) is set.
    pub fn castling(&self, id: &str) -> Result<bool, IllegalArgument> {
        let right = CastleRight::parse(id, self.variant)?;
        Ok(self.has_castling_right(right))
    }

    /// Sets or clears the castling right named by `id`.
    pub fn set_castling(&mut self, id: &str, value: bool) -> Result<(), IllegalArgument> {
        let right = CastleRight::parse(id, self.variant)?;
        self.set_castling_right(right, value)
    }

    #[inline]
    pub fn has_castling_right(&self, right: CastleRight) -> bool {
        self.castling[right.color.index()] & (1 << right.file.index()) != 0
    }

    /// Sets or clears a castling right. Outside Chess960 only rights on the
    /// a- and h-file rooks exist.
    pub fn set_castling_right(
        &mut self,
        right: CastleRight,
        value: bool,
    ) -> Result<(), IllegalArgument> {
        let chess960 = self.variant.rules().castling == CastlingStyle::Chess960;
        if !chess960 && right.file != File::A && right.file != File::H {
            return Err(IllegalArgument::InvalidCastle {
                castle: right.to_string(),
                variant: self.variant,
            });
        }
        let bit = 1u8 << right.file.index();
        if value {
            self.castling[right.color.index()] |= bit;
        } else {
            self.castling[right.color.index()] &= !bit;
        }
        Ok(())
    }

    /// All castling rights currently flagged, white first, files ascending.
    pub fn castling_rights(&self) -> Vec<CastleRight> {
        Color::ALL
            .into_iter()
            .flat_map(|color| {
                File::ALL
                    .into_iter()
                    .filter(move |file| self.castling[color.index()] & (1 << file.index()) != 0)
                    .map(move |file| CastleRight::new(color, file))
            })
            .collect()
    }

    /// Returns whether the castling right named by `id` could actually be
    /// used: the flag is set and the king and rook stand where it requires.
    pub fn effective_castling(&self, id: &str) -> Result<bool, IllegalArgument> {
        let right = CastleRight::parse(id, self.variant)?;
        Ok(self.effective_castling_rights()[right.color.index()] & (1 << right.file.index()) != 0)
    }

    /// The castling flags backed by the actual king and rook placement.
    pub(crate) fn effective_castling_rights(&self) -> [u8; 2] {
        let mut effective = [0u8; 2];
        for color in Color::ALL {
            let flags = self.castling[color.index()];
            if flags == 0 || !self.variant.can_castle(color) {
                continue;
            }
            let back_rank = Bitboard::rank(color.back_rank());
            let Some(king) = (self.pieces_of(Piece::King, color) & back_rank).single() else {
                continue;
            };
            if self.pieces_of(Piece::King, color).more_than_one() {
                continue;
            }
            let standard = self.variant.rules().castling == CastlingStyle::Standard;
            if standard && king.file() != File::E {
                continue;
            }
            let rooks = self.pieces_of(Piece::Rook, color) & back_rank;
            for file in File::ALL {
                let bit = 1u8 << file.index();
                if flags & bit == 0 || file == king.file() {
                    continue;
                }
                if standard && file != File::A && file != File::H {
                    continue;
                }
                if rooks.contains(Square::new(file, king.rank())) {
                    effective[color.index()] |= bit;
                }
            }
        }
        effective
    }

    /// Returns the raw en passant file (set after any double pawn push).
    #[inline]
    pub fn en_passant(&self) -> Option<File> {
        self.en_passant
    }

    #[inline]
    pub fn set_en_passant(&mut self, file: Option<File>) {
        self.en_passant = file;
    }

    /// Returns the en passant file only if an en passant capture is legal.
    pub fn effective_en_passant(&self) -> Option<File> {
        self.en_passant?;
        if self.moves().iter().any(|mv| mv.is_en_passant()) {
            self.en_passant
        } else {
            None
        }
    }

    /// Square a pawn capturing en passant would land on.
    pub(crate) fn en_passant_target(&self) -> Option<Square> {
        let file = self.en_passant?;
        let rank = match self.turn {
            Color::White => Rank::R6,
            Color::Black => Rank::R3,
        };
        Some(Square::new(file, rank))
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn set_halfmove_clock(&mut self, clock: u32) {
        self.halfmove_clock = clock;
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    #[inline]
    pub fn set_fullmove_number(&mut self, number: u32) {
        self.fullmove_number = number;
    }

    /// Returns the piece and color at the given square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        Piece::ALL
            .into_iter()
            .find(|piece| self.pieces[piece.index()].contains(sq))
            .map(|piece| (piece, color))
    }

    /// Returns a bitboard of all occupied squares.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Returns a bitboard of all pieces of a color.
    #[inline]
    pub fn color_pieces(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Returns a bitboard of pieces of the given type and color.
    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> Bitboard {
        self.pieces[piece.index()] & self.colors[color.index()]
    }

    #[inline]
    pub(crate) fn put(&mut self, sq: Square, piece: ColoredPiece) {
        self.pieces[piece.piece.index()].set(sq);
        self.colors[piece.color.index()].set(sq);
    }

    #[inline]
    pub(crate) fn remove(&mut self, sq: Square) {
        for bb in self.pieces.iter_mut().chain(self.colors.iter_mut()) {
            bb.clear(sq);
        }
    }

    /// Board contents as an array indexed by square.
    pub(crate) fn board_array(&self) -> [Option<ColoredPiece>; 64] {
        let mut board = [None; 64];
        for sq in Square::all() {
            board[sq.index() as usize] = self.square(sq);
        }
        board
    }
}

fn place_on_nth_empty(rank: &mut [Option<Piece>; 8], n: usize, piece: Piece) {
    if let Some(slot) = rank.iter_mut().filter(|slot| slot.is_none()).nth(n) {
        *slot = Some(piece);
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::new()
    }
}

/// Positions are equal when they lead to the same legal continuations: the
/// board, turn, variant, effective castling rights and effective en passant
/// file are compared. Move counters are ignored.
impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.colors == other.colors
            && self.turn == other.turn
            && self.variant == other.variant
            && self.effective_castling_rights() == other.effective_castling_rights()
            && self.effective_en_passant() == other.effective_en_passant()
    }
}

impl Eq for Position {}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fen())
    }
}

impl FromStr for Position {
    type Err = InvalidFen;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}
