//! Standard Algebraic Notation (SAN) parsing and generation.
//!
//! Examples: "e4", "Nf3", "Bxc6", "O-O", "e8=Q", "Nbd2", "R1e1", "Qh4#".
//! Figurine notation is SAN with the piece letters replaced by the unicode
//! glyphs of the moving side.

use chess_core::{Color, File, Piece, Rank, Square};

use super::{InvalidNotation, NotationErrorKind};
use crate::movegen::{make_move, promotion_pieces, MoveList};
use crate::{MoveDescriptor, MoveKind, Position};

/// Converts a legal move to SAN. The position is the one before the move.
pub fn move_to_san(position: &Position, mv: &MoveDescriptor) -> String {
    write_san(position, mv, false)
}

/// Converts a legal move to figurine SAN.
pub fn move_to_figurine(position: &Position, mv: &MoveDescriptor) -> String {
    write_san(position, mv, true)
}

/// Parses SAN and returns the matching legal move.
pub fn san_to_move(
    position: &Position,
    text: &str,
    strict: bool,
) -> Result<MoveDescriptor, InvalidNotation> {
    parse_and_resolve(position, text, strict, false)
        .map_err(|kind| InvalidNotation::new(position, text, kind))
}

/// Parses figurine SAN and returns the matching legal move.
pub fn figurine_to_move(
    position: &Position,
    text: &str,
    strict: bool,
) -> Result<MoveDescriptor, InvalidNotation> {
    parse_and_resolve(position, text, strict, true)
        .map_err(|kind| InvalidNotation::new(position, text, kind))
}

fn write_san(position: &Position, mv: &MoveDescriptor, glyphs: bool) -> String {
    let mut san = String::with_capacity(8);
    let color = mv.color();

    if let MoveKind::Castling { rook_from, .. } = mv.kind() {
        san.push_str(if is_king_side(mv.from(), rook_from) {
            "O-O"
        } else {
            "O-O-O"
        });
    } else {
        let piece = mv.moving_piece();
        if piece != Piece::Pawn {
            san.push(piece_char(piece, color, glyphs));
        }

        let (file, rank) = disambiguation(&position.moves(), mv);
        if file {
            san.push(mv.from().file().to_char());
        }
        if rank {
            san.push(mv.from().rank().to_char());
        }

        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to().to_string());

        if let Ok(promotion) = mv.promotion() {
            san.push('=');
            san.push(piece_char(promotion, color, glyphs));
        }
    }

    san.push_str(check_suffix(position, mv));
    san
}

fn piece_char(piece: Piece, color: Color, glyphs: bool) -> char {
    if glyphs {
        piece.figurine(color)
    } else {
        piece.to_san_char()
    }
}

fn is_king_side(king: Square, rook: Square) -> bool {
    rook.file() > king.file()
}

/// Which parts of the origin square SAN must show: (file, rank).
///
/// Pawn captures always show the file. Other pieces show the file if it
/// tells them apart from every rival reaching the same square, else the
/// rank if that does, else both.
fn disambiguation(moves: &MoveList, mv: &MoveDescriptor) -> (bool, bool) {
    if mv.moving_piece() == Piece::Pawn {
        return (mv.is_capture(), false);
    }
    let from = mv.from();
    let rivals: Vec<Square> = moves
        .iter()
        .filter(|other| {
            !other.is_castling()
                && other.moving_piece() == mv.moving_piece()
                && other.to() == mv.to()
                && other.from() != from
        })
        .map(|other| other.from())
        .collect();

    if rivals.is_empty() {
        (false, false)
    } else if rivals.iter().all(|sq| sq.file() != from.file()) {
        (true, false)
    } else if rivals.iter().all(|sq| sq.rank() != from.rank()) {
        (false, true)
    } else {
        (true, true)
    }
}

fn check_suffix(position: &Position, mv: &MoveDescriptor) -> &'static str {
    let next = make_move(position, mv);
    if !next.is_check() {
        ""
    } else if next.has_move() {
        "+"
    } else {
        "#"
    }
}

/// Syntactic pieces of a SAN text.
#[derive(Debug)]
enum SanBody {
    Castle {
        king_side: bool,
        with_zeros: bool,
    },
    Move {
        piece: Piece,
        /// The piece was written out, even though it is a pawn.
        explicit_pawn: bool,
        glyph_colors: Vec<Color>,
        from_file: Option<File>,
        from_rank: Option<Rank>,
        capture: bool,
        to: Square,
        promotion: Option<Piece>,
        promotion_symbol: bool,
    },
}

#[derive(Debug)]
struct ParsedSan<'a> {
    body: SanBody,
    suffix: &'a str,
}

fn file_char(c: char) -> Option<File> {
    if c.is_ascii_lowercase() {
        File::from_char(c)
    } else {
        None
    }
}

/// Reads a piece designator: an uppercase letter, or a glyph in figurine mode.
fn piece_designator(c: char, figurine: bool) -> Option<(Piece, Option<Color>)> {
    if figurine {
        Piece::from_figurine(c).map(|(piece, color)| (piece, Some(color)))
    } else {
        Piece::from_san_char(c).map(|piece| (piece, None))
    }
}

fn parse_san(text: &str, figurine: bool) -> Result<ParsedSan<'_>, NotationErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotationErrorKind::Empty);
    }
    let body = text.trim_end_matches(|c| c == '+' || c == '#');
    let suffix = &text[body.len()..];

    let castle = match body {
        "O-O" | "0-0" => Some(true),
        "O-O-O" | "0-0-0" => Some(false),
        _ => None,
    };
    if let Some(king_side) = castle {
        return Ok(ParsedSan {
            body: SanBody::Castle {
                king_side,
                with_zeros: body.starts_with('0'),
            },
            suffix,
        });
    }

    let chars: Vec<char> = body.chars().collect();
    let mut glyph_colors = Vec::new();
    let mut start = 0;
    let mut end = chars.len();

    let mut piece = Piece::Pawn;
    let mut explicit_pawn = false;
    if let Some((designated, color)) = chars.first().and_then(|&c| piece_designator(c, figurine)) {
        piece = designated;
        explicit_pawn = designated == Piece::Pawn;
        glyph_colors.extend(color);
        start = 1;
    }

    let mut promotion = None;
    let mut promotion_symbol = false;
    if end > start {
        if let Some((promoted, color)) = piece_designator(chars[end - 1], figurine) {
            if promoted == Piece::Pawn {
                return Err(NotationErrorKind::InvalidSyntax);
            }
            promotion = Some(promoted);
            glyph_colors.extend(color);
            end -= 1;
            if end > start && chars[end - 1] == '=' {
                promotion_symbol = true;
                end -= 1;
            }
        }
    }

    if end < start + 2 {
        return Err(NotationErrorKind::InvalidSyntax);
    }
    let to_file = file_char(chars[end - 2]).ok_or(NotationErrorKind::InvalidSyntax)?;
    let to_rank = Rank::from_char(chars[end - 1]).ok_or(NotationErrorKind::InvalidSyntax)?;
    end -= 2;

    let capture = end > start && chars[end - 1] == 'x';
    if capture {
        end -= 1;
    }

    let (from_file, from_rank) = match &chars[start..end] {
        [] => (None, None),
        [c] => match (file_char(*c), Rank::from_char(*c)) {
            (Some(file), _) => (Some(file), None),
            (None, Some(rank)) => (None, Some(rank)),
            (None, None) => return Err(NotationErrorKind::InvalidSyntax),
        },
        [f, r] => (
            Some(file_char(*f).ok_or(NotationErrorKind::InvalidSyntax)?),
            Some(Rank::from_char(*r).ok_or(NotationErrorKind::InvalidSyntax)?),
        ),
        _ => return Err(NotationErrorKind::InvalidSyntax),
    };

    Ok(ParsedSan {
        body: SanBody::Move {
            piece,
            explicit_pawn,
            glyph_colors,
            from_file,
            from_rank,
            capture,
            to: Square::new(to_file, to_rank),
            promotion,
            promotion_symbol,
        },
        suffix,
    })
}

fn parse_and_resolve(
    position: &Position,
    text: &str,
    strict: bool,
    figurine: bool,
) -> Result<MoveDescriptor, NotationErrorKind> {
    let parsed = parse_san(text, figurine)?;
    if !position.is_legal() {
        return Err(NotationErrorKind::IllegalPosition);
    }
    let moves = position.moves();

    let mv = match parsed.body {
        SanBody::Castle {
            king_side,
            with_zeros,
        } => {
            let castle = moves
                .iter()
                .find(|mv| {
                    mv.rook_from()
                        .map(|rook| is_king_side(mv.from(), rook) == king_side)
                        .unwrap_or(false)
                })
                .copied()
                .ok_or(NotationErrorKind::IllegalCastling)?;
            if strict && with_zeros {
                return Err(NotationErrorKind::NonCanonicalCastling);
            }
            castle
        }
        SanBody::Move {
            piece,
            explicit_pawn,
            glyph_colors,
            from_file,
            from_rank,
            capture,
            to,
            promotion,
            promotion_symbol,
        } => {
            if glyph_colors.iter().any(|&color| color != position.turn()) {
                return Err(NotationErrorKind::WrongGlyphColor);
            }

            let mut candidates: Vec<MoveDescriptor> = moves
                .iter()
                .filter(|mv| {
                    !mv.is_castling()
                        && mv.moving_piece() == piece
                        && mv.to() == to
                        && from_file.map_or(true, |file| mv.from().file() == file)
                        && from_rank.map_or(true, |rank| mv.from().rank() == rank)
                })
                .copied()
                .collect();
            // A pawn without an origin file is a push.
            if piece == Piece::Pawn && from_file.is_none() {
                candidates.retain(|mv| mv.from().file() == to.file());
            }
            if candidates.is_empty() {
                return Err(NotationErrorKind::NoMatchingMove);
            }

            if candidates.iter().any(|mv| mv.is_promotion()) {
                let promoted = promotion.ok_or(NotationErrorKind::MissingPromotion)?;
                if !promotion_pieces(position.variant()).contains(&promoted) {
                    return Err(NotationErrorKind::IllegalPromotionPiece);
                }
                candidates.retain(|mv| mv.promotion() == Ok(promoted));
            } else if promotion.is_some() {
                return Err(NotationErrorKind::UnexpectedPromotion);
            }

            let mv = match candidates.as_slice() {
                [] => return Err(NotationErrorKind::NoMatchingMove),
                [mv] => *mv,
                _ => return Err(NotationErrorKind::AmbiguousMove),
            };

            if capture && !mv.is_capture() {
                return Err(NotationErrorKind::CaptureSymbolOnNonCapture);
            }
            if strict {
                if explicit_pawn {
                    return Err(NotationErrorKind::PawnDesignator);
                }
                if mv.is_capture() && !capture {
                    return Err(NotationErrorKind::MissingCaptureSymbol);
                }
                if mv.is_promotion() && !promotion_symbol {
                    return Err(NotationErrorKind::MissingPromotionSymbol);
                }
                if disambiguation(&moves, &mv) != (from_file.is_some(), from_rank.is_some()) {
                    return Err(NotationErrorKind::NonCanonicalDisambiguation);
                }
            }
            mv
        }
    };

    if strict && parsed.suffix != check_suffix(position, &mv) {
        return Err(NotationErrorKind::WrongCheckSymbol);
    }
    Ok(mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn san(position: &Position, uci: &str) -> String {
        let mv = position
            .moves()
            .iter()
            .find(|m| m.to_string().starts_with(uci))
            .copied()
            .unwrap_or_else(|| panic!("no move {} in {}", uci, position.fen()));
        move_to_san(position, &mv)
    }

    fn parse_err(position: &Position, text: &str, strict: bool) -> NotationErrorKind {
        san_to_move(position, text, strict).unwrap_err().kind
    }

    #[test]
    fn san_pawn_push() {
        assert_eq!(san(&Position::new(), "e2e4"), "e4");
    }

    #[test]
    fn san_knight_move() {
        assert_eq!(san(&Position::new(), "g1f3"), "Nf3");
    }

    #[test]
    fn san_pawn_capture() {
        let position = pos("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        assert_eq!(san(&position, "e4d5"), "exd5");
    }

    #[test]
    fn san_castling() {
        let position = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert_eq!(san(&position, "e1g1"), "O-O");
        assert_eq!(san(&position, "e1c1"), "O-O-O");
    }

    #[test]
    fn san_promotion() {
        let position = pos("8/P7/8/8/8/8/8/4K1k1 w - - 0 1");
        assert_eq!(san(&position, "a7a8Q"), "a8=Q");
        assert_eq!(san(&position, "a7a8N"), "a8=N");
    }

    #[test]
    fn san_disambiguation() {
        // Knights on b1 and f1 both reach d2.
        let position = pos("7k/8/8/8/8/8/8/1N1K1N2 w - - 0 1");
        assert_eq!(san(&position, "b1d2"), "Nbd2");

        // Rooks on a1 and a5 both reach a3.
        let position = pos("7k/8/8/R7/8/8/8/R3K3 w - - 0 1");
        assert_eq!(san(&position, "a1a3"), "R1a3");

        // e6 shares the file of e4 and g4 shares its rank.
        let position = pos("7k/8/4Q1Q1/8/4Q1Q1/8/8/4K3 w - - 0 1");
        assert_eq!(san(&position, "e4f5"), "Qe4f5");
    }

    #[test]
    fn san_check_and_mate() {
        let position = pos("7k/8/8/8/8/8/8/4K1Q1 w - - 0 1");
        assert_eq!(san(&position, "g1h2"), "Qh2+");

        let position = pos("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(san(&position, "a1a8"), "Ra8#");
    }

    #[test]
    fn figurine_uses_mover_glyphs() {
        let position = Position::new();
        let mv = san_to_move(&position, "Nf3", false).unwrap();
        assert_eq!(move_to_figurine(&position, &mv), "\u{2658}f3");
        assert_eq!(figurine_to_move(&position, "\u{2658}f3", true), Ok(mv));
        assert_eq!(
            figurine_to_move(&position, "\u{265E}f3", false)
                .unwrap_err()
                .kind,
            NotationErrorKind::WrongGlyphColor
        );

        let black = pos("rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq - 0 1");
        let mv = san_to_move(&black, "Nf6", false).unwrap();
        assert_eq!(move_to_figurine(&black, &mv), "\u{265E}f6");
    }

    #[test]
    fn parse_basic() {
        let position = Position::new();
        let mv = san_to_move(&position, "Nf3", true).unwrap();
        assert_eq!(mv.from(), Square::G1);
        assert_eq!(mv.to(), Square::F3);
        let mv = san_to_move(&position, "e4", true).unwrap();
        assert!(mv.is_double_push());
    }

    #[test]
    fn parse_tolerant_forms() {
        let position = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert!(san_to_move(&position, "0-0", false).unwrap().is_castling());
        assert!(san_to_move(&position, "O-O-O+", false).unwrap().is_castling());

        let position = pos("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        let capture = san_to_move(&position, "exd5", true).unwrap();
        assert_eq!(san_to_move(&position, "ed5", false), Ok(capture));
        assert_eq!(san_to_move(&position, "Pexd5", false), Ok(capture));

        let position = pos("8/P7/8/8/8/8/8/4K1k1 w - - 0 1");
        let promotion = san_to_move(&position, "a8=Q", true).unwrap();
        assert_eq!(san_to_move(&position, "a8Q", false), Ok(promotion));

        let position = Position::new();
        assert!(san_to_move(&position, "Ngf3", false).is_ok());
        assert!(san_to_move(&position, "Ng1f3#", false).is_ok());
    }

    #[test]
    fn parse_strict_rejections() {
        let position = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        assert_eq!(
            parse_err(&position, "0-0", true),
            NotationErrorKind::NonCanonicalCastling
        );

        let position = pos("rnbqkbnr/ppp1pppp/8/3p4/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 0 2");
        assert_eq!(
            parse_err(&position, "ed5", true),
            NotationErrorKind::MissingCaptureSymbol
        );

        let position = pos("8/P7/8/8/8/8/8/4K1k1 w - - 0 1");
        assert_eq!(
            parse_err(&position, "a8Q", true),
            NotationErrorKind::MissingPromotionSymbol
        );

        let position = Position::new();
        assert_eq!(
            parse_err(&position, "Ngf3", true),
            NotationErrorKind::NonCanonicalDisambiguation
        );
        assert_eq!(
            parse_err(&position, "Nf3+", true),
            NotationErrorKind::WrongCheckSymbol
        );

        let position = pos("6k1/5ppp/8/8/8/8/8/R3K3 w Q - 0 1");
        assert_eq!(
            parse_err(&position, "Ra8+", true),
            NotationErrorKind::WrongCheckSymbol
        );
        assert!(san_to_move(&position, "Ra8+", false).is_ok());
    }

    #[test]
    fn pawn_designator_is_tolerated_only() {
        let position = Position::new();
        let push = san_to_move(&position, "e4", true).unwrap();
        assert_eq!(san_to_move(&position, "Pe4", false), Ok(push));
        assert_eq!(
            parse_err(&position, "Pe4", true),
            NotationErrorKind::PawnDesignator
        );

        assert_eq!(figurine_to_move(&position, "\u{2659}e4", false), Ok(push));
        assert_eq!(
            figurine_to_move(&position, "\u{2659}e4", true)
                .unwrap_err()
                .kind,
            NotationErrorKind::PawnDesignator
        );
    }

    #[test]
    fn parse_errors() {
        let position = Position::new();
        assert_eq!(parse_err(&position, "", false), NotationErrorKind::Empty);
        assert_eq!(parse_err(&position, "xyz", false), NotationErrorKind::InvalidSyntax);
        assert_eq!(parse_err(&position, "Nf", false), NotationErrorKind::InvalidSyntax);
        assert_eq!(parse_err(&position, "e9", false), NotationErrorKind::InvalidSyntax);
        assert_eq!(parse_err(&position, "Ke4", false), NotationErrorKind::NoMatchingMove);
        assert_eq!(parse_err(&position, "O-O", false), NotationErrorKind::IllegalCastling);
        assert_eq!(
            parse_err(&position, "Nxf3", false),
            NotationErrorKind::CaptureSymbolOnNonCapture
        );
        assert_eq!(
            parse_err(&position, "e4=Q", false),
            NotationErrorKind::UnexpectedPromotion
        );

        let position = pos("7k/8/8/8/8/8/8/1N1K1N2 w - - 0 1");
        assert_eq!(parse_err(&position, "Nd2", false), NotationErrorKind::AmbiguousMove);

        let position = pos("8/P7/8/8/8/8/8/4K1k1 w - - 0 1");
        assert_eq!(parse_err(&position, "a8", false), NotationErrorKind::MissingPromotion);
        assert_eq!(
            parse_err(&position, "a8=K", false),
            NotationErrorKind::IllegalPromotionPiece
        );

        let illegal = pos("4k3/8/8/8/8/8/8/4K2r b - - 0 1");
        assert_eq!(parse_err(&illegal, "Kd8", false), NotationErrorKind::IllegalPosition);
    }

    #[test]
    fn antichess_king_promotion() {
        let position = pos("antichess:8/P7/8/8/8/8/8/7k w - - 0 1");
        let mv = san_to_move(&position, "a8=K", true).unwrap();
        assert_eq!(mv.promotion(), Ok(Piece::King));
        assert_eq!(move_to_san(&position, &mv), "a8=K");
    }

    #[test]
    fn san_roundtrip_startpos() {
        let position = Position::new();
        for mv in position.moves().iter() {
            let text = move_to_san(&position, mv);
            assert_eq!(san_to_move(&position, &text, true), Ok(*mv), "{}", text);
        }
    }
}
