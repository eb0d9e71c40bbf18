//! FEN (Forsyth-Edwards Notation) field parsing.
//!
//! [`FenParser`] splits a FEN string into its six fields, checks their
//! syntax and returns a [`FenRecord`]. Castling letters are kept as text:
//! resolving `K`/`Q` in Chess960 needs the board, which the engine owns.
//! Checks that need move generation (en passant reachability, castling
//! consistency) also live in the engine, but report their failures through
//! the same [`InvalidFen`] error.

use thiserror::Error;

use crate::{CastlingStyle, Color, ColoredPiece, Square, Variant};

/// Why a FEN string was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FenErrorKind {
    #[error("expected 6 fields, got {0}")]
    WrongNumberOfFields(usize),

    #[error("expected 8 ranks, got {0}")]
    WrongNumberOfRanks(usize),

    #[error("unexpected character '{character}' in rank {rank}")]
    UnexpectedCharacterInBoard { rank: u8, character: char },

    #[error("rank {rank} has {squares} squares, expected 8")]
    WrongRankLength { rank: u8, squares: u32 },

    #[error("invalid turn: expected 'w' or 'b', got '{0}'")]
    InvalidTurn(String),

    #[error("invalid castling field: '{0}'")]
    InvalidCastling(String),

    #[error("invalid en passant field: '{0}'")]
    InvalidEnPassant(String),

    #[error("en passant square '{0}' is not on the rank matching the side to move")]
    WrongEnPassantRank(String),

    #[error("invalid halfmove clock: '{0}'")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: '{0}'")]
    InvalidFullmoveNumber(String),

    #[error("unknown variant: '{0}'")]
    UnknownVariant(String),

    #[error("castling field '{0}' is not in canonical form")]
    NonCanonicalCastling(String),

    #[error("castling field '{0}' does not match the king and rook placement")]
    InconsistentCastling(String),

    #[error("en passant square '{0}' cannot be the target of a double pawn push")]
    InconsistentEnPassant(String),
}

/// A FEN string that could not be parsed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid FEN '{fen}': {kind}")]
pub struct InvalidFen {
    pub fen: String,
    pub kind: FenErrorKind,
}

impl InvalidFen {
    pub fn new(fen: &str, kind: FenErrorKind) -> Self {
        InvalidFen {
            fen: fen.to_string(),
            kind,
        }
    }
}

/// The fields of a syntactically valid FEN string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenRecord {
    /// Variant named by a `<variant>:` prefix, if any.
    pub variant: Option<Variant>,
    /// Board contents indexed by [`Square::index`].
    pub board: [Option<ColoredPiece>; 64],
    pub turn: Color,
    /// Castling field as written (`-`, `KQkq`, `HAha`...).
    pub castling: String,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// FEN field parser.
pub struct FenParser;

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    /// Parses a FEN string tolerantly, in regular chess unless prefixed.
    pub fn parse(fen: &str) -> Result<FenRecord, InvalidFen> {
        Self::parse_with(fen, Variant::Regular, false)
    }

    /// Parses a FEN string. `default_variant` is used to validate the
    /// castling field unless the string carries a variant prefix.
    pub fn parse_with(
        fen: &str,
        default_variant: Variant,
        strict: bool,
    ) -> Result<FenRecord, InvalidFen> {
        Self::parse_fields(fen, default_variant, strict).map_err(|kind| InvalidFen::new(fen, kind))
    }

    fn parse_fields(
        fen: &str,
        default_variant: Variant,
        strict: bool,
    ) -> Result<FenRecord, FenErrorKind> {
        let trimmed = fen.trim();
        let (prefix, body) = match trimmed.split_once(':') {
            Some((name, rest)) => {
                let variant = name
                    .trim()
                    .parse::<Variant>()
                    .map_err(|_| FenErrorKind::UnknownVariant(name.to_string()))?;
                (Some(variant), rest)
            }
            None => (None, trimmed),
        };
        let variant = prefix.unwrap_or(default_variant);

        let parts: Vec<&str> = body.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenErrorKind::WrongNumberOfFields(parts.len()));
        }

        let board = parse_board(parts[0])?;

        let turn = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenErrorKind::InvalidTurn(other.to_string())),
        };

        validate_castling(parts[2], variant, strict)?;

        let en_passant = parse_en_passant(parts[3], turn, strict)?;

        let halfmove_clock = parse_counter(parts[4], strict)
            .ok_or_else(|| FenErrorKind::InvalidHalfmoveClock(parts[4].to_string()))?;
        let fullmove_number = parse_counter(parts[5], strict)
            .filter(|&n| !strict || n >= 1)
            .ok_or_else(|| FenErrorKind::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenRecord {
            variant: prefix,
            board,
            turn,
            castling: parts[2].to_string(),
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }
}

fn parse_board(placement: &str) -> Result<[Option<ColoredPiece>; 64], FenErrorKind> {
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(FenErrorKind::WrongNumberOfRanks(ranks.len()));
    }

    let mut board = [None; 64];
    for (i, text) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut squares = 0u32;
        for c in text.chars() {
            if let Some(run) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                squares += run;
            } else if let Some(piece) = ColoredPiece::from_fen_char(c) {
                if squares < 8 {
                    board[(rank * 8) as usize + squares as usize] = Some(piece);
                }
                squares += 1;
            } else {
                return Err(FenErrorKind::UnexpectedCharacterInBoard {
                    rank: rank + 1,
                    character: c,
                });
            }
        }
        if squares != 8 {
            return Err(FenErrorKind::WrongRankLength {
                rank: rank + 1,
                squares,
            });
        }
    }
    Ok(board)
}

fn validate_castling(castling: &str, variant: Variant, strict: bool) -> Result<(), FenErrorKind> {
    if castling == "-" {
        return Ok(());
    }
    let invalid = || FenErrorKind::InvalidCastling(castling.to_string());
    let chess960 = variant.rules().castling == CastlingStyle::Chess960;

    let allowed = |c: char| {
        matches!(c, 'K' | 'Q' | 'k' | 'q')
            || (chess960 && ('A'..='H').contains(&c.to_ascii_uppercase()))
    };
    if !castling.chars().all(allowed) {
        return Err(invalid());
    }
    if !strict {
        return Ok(());
    }

    let canonical = if chess960 {
        is_canonical_xfen_castling(castling)
    } else {
        is_canonical_regular_castling(castling)
    };
    if canonical {
        Ok(())
    } else {
        Err(FenErrorKind::NonCanonicalCastling(castling.to_string()))
    }
}

/// `K?Q?k?q?`, not empty.
fn is_canonical_regular_castling(castling: &str) -> bool {
    let mut rest = castling;
    for letter in ["K", "Q", "k", "q"] {
        if let Some(tail) = rest.strip_prefix(letter) {
            rest = tail;
        }
    }
    rest.is_empty() && !castling.is_empty()
}

/// White letters before black, each color descending by file, at most two
/// per color, file letters only.
fn is_canonical_xfen_castling(castling: &str) -> bool {
    let white: Vec<char> = castling.chars().take_while(|c| c.is_ascii_uppercase()).collect();
    let black: Vec<char> = castling.chars().skip(white.len()).collect();
    let descending = |letters: &[char]| letters.windows(2).all(|w| w[0] > w[1]);
    let file_letters = |letters: &[char]| {
        letters
            .iter()
            .all(|c| ('a'..='h').contains(&c.to_ascii_lowercase()))
    };
    !castling.is_empty()
        && black.iter().all(|c| c.is_ascii_lowercase())
        && white.len() <= 2
        && black.len() <= 2
        && file_letters(&white)
        && file_letters(&black)
        && descending(&white)
        && descending(&black)
}

fn parse_en_passant(
    field: &str,
    turn: Color,
    strict: bool,
) -> Result<Option<Square>, FenErrorKind> {
    if field == "-" {
        return Ok(None);
    }
    let square = Square::from_algebraic(field)
        .filter(|sq| sq.rank().index() == 2 || sq.rank().index() == 5)
        .ok_or_else(|| FenErrorKind::InvalidEnPassant(field.to_string()))?;
    let expected_rank = match turn {
        Color::White => 5,
        Color::Black => 2,
    };
    if strict && square.rank().index() != expected_rank {
        return Err(FenErrorKind::WrongEnPassantRank(field.to_string()));
    }
    Ok(Some(square))
}

fn parse_counter(field: &str, strict: bool) -> Option<u32> {
    if !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if strict && field.len() > 1 && field.starts_with('0') {
        return None;
    }
    field.parse().ok()
}

/// Formats a board as the first FEN field.
pub fn format_board(board: &[Option<ColoredPiece>; 64]) -> String {
    let mut out = String::with_capacity(72);
    for rank in (0..8).rev() {
        let mut empty = 0;
        for file in 0..8 {
            match board[rank * 8 + file] {
                Some(piece) => {
                    if empty > 0 {
                        out.push(char::from(b'0' + empty));
                        empty = 0;
                    }
                    out.push(piece.to_fen_char());
                }
                None => empty += 1,
            }
        }
        if empty > 0 {
            out.push(char::from(b'0' + empty));
        }
        if rank > 0 {
            out.push('/');
        }
    }
    out
}
