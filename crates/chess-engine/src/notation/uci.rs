//! UCI coordinate notation: `<from><to>[promotion]`, e.g. "e2e4", "a7a8q".
//!
//! Castling is written either king-moves-through ("e1g1") or
//! king-takes-rook ("e1h1"). Regular chess uses the first form. Chess960
//! uses it too, except when the king does not move or when an ordinary king
//! move has the same squares; then only king-takes-rook is unambiguous.

use chess_core::{CastlingStyle, Piece, Square};

use super::{InvalidNotation, NotationErrorKind};
use crate::movegen::promotion_pieces;
use crate::{MoveDescriptor, MoveKind, Position};

/// Converts a legal move to UCI.
pub fn move_to_uci(position: &Position, mv: &MoveDescriptor, force_kxr: bool) -> String {
    let mut uci = mv.from().to_string();
    match mv.kind() {
        MoveKind::Castling { rook_from, .. } if king_takes_rook(position, mv, force_kxr) => {
            uci.push_str(&rook_from.to_string());
        }
        MoveKind::Promotion(piece) => {
            uci.push_str(&mv.to().to_string());
            uci.push(piece.to_char());
        }
        _ => uci.push_str(&mv.to().to_string()),
    }
    uci
}

fn king_takes_rook(position: &Position, mv: &MoveDescriptor, force_kxr: bool) -> bool {
    if force_kxr {
        return true;
    }
    if position.variant().rules().castling != CastlingStyle::Chess960 {
        return false;
    }
    mv.from() == mv.to()
        || position
            .moves()
            .iter()
            .any(|other| !other.is_castling() && other.from() == mv.from() && other.to() == mv.to())
}

/// Parses UCI and returns the matching legal move.
///
/// Tolerant parsing accepts both castling forms and an uppercase promotion
/// letter; when a king move could also be read as castling, the ordinary
/// move wins. Strict parsing only accepts what [`move_to_uci`] would write.
pub fn uci_to_move(
    position: &Position,
    text: &str,
    strict: bool,
    force_kxr: bool,
) -> Result<MoveDescriptor, InvalidNotation> {
    resolve(position, text, strict, force_kxr)
        .map_err(|kind| InvalidNotation::new(position, text, kind))
}

fn parse(text: &str) -> Result<(Square, Square, Option<char>), NotationErrorKind> {
    let text = text.trim();
    if text.is_empty() {
        return Err(NotationErrorKind::Empty);
    }
    if !text.is_ascii() || !(4..=5).contains(&text.len()) {
        return Err(NotationErrorKind::InvalidSyntax);
    }
    let from = Square::from_algebraic(&text[0..2]).ok_or(NotationErrorKind::InvalidSyntax)?;
    let to = Square::from_algebraic(&text[2..4]).ok_or(NotationErrorKind::InvalidSyntax)?;
    let promotion = text[4..].chars().next();
    if let Some(c) = promotion {
        if Piece::from_char(c).is_none() {
            return Err(NotationErrorKind::InvalidSyntax);
        }
    }
    Ok((from, to, promotion))
}

fn resolve(
    position: &Position,
    text: &str,
    strict: bool,
    force_kxr: bool,
) -> Result<MoveDescriptor, NotationErrorKind> {
    let (from, to, promotion) = parse(text)?;
    if !position.is_legal() {
        return Err(NotationErrorKind::IllegalPosition);
    }
    let moves = position.moves();

    let ordinary: Vec<MoveDescriptor> = moves
        .iter()
        .filter(|mv| !mv.is_castling() && mv.from() == from && mv.to() == to)
        .copied()
        .collect();

    let mv = if ordinary.is_empty() {
        // One castling move may take the rook on the square another one
        // sends the king to; the form being written decides.
        let takes_rook = |mv: &&MoveDescriptor| mv.rook_from() == Ok(to);
        let moves_through = |mv: &&MoveDescriptor| mv.to() == to && from != to;
        let castles: Vec<MoveDescriptor> = moves
            .iter()
            .filter(|mv| mv.is_castling() && mv.from() == from)
            .copied()
            .collect();
        let preferred = if force_kxr {
            castles.iter().find(takes_rook).or_else(|| castles.iter().find(moves_through))
        } else {
            castles.iter().find(moves_through).or_else(|| castles.iter().find(takes_rook))
        };
        let castle = preferred.copied().ok_or(NotationErrorKind::NoMatchingMove)?;
        if promotion.is_some() {
            return Err(NotationErrorKind::UnexpectedPromotion);
        }
        castle
    } else if ordinary.iter().any(|mv| mv.is_promotion()) {
        let letter = promotion.ok_or(NotationErrorKind::MissingPromotion)?;
        let piece = Piece::from_char(letter).ok_or(NotationErrorKind::InvalidSyntax)?;
        if !promotion_pieces(position.variant()).contains(&piece) {
            return Err(NotationErrorKind::IllegalPromotionPiece);
        }
        ordinary
            .into_iter()
            .find(|mv| mv.promotion() == Ok(piece))
            .ok_or(NotationErrorKind::NoMatchingMove)?
    } else if promotion.is_some() {
        return Err(NotationErrorKind::UnexpectedPromotion);
    } else {
        ordinary[0]
    };

    if strict && move_to_uci(position, &mv, force_kxr) != text.trim() {
        return Err(NotationErrorKind::NonCanonicalUci);
    }
    Ok(mv)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn err(position: &Position, text: &str, strict: bool) -> NotationErrorKind {
        uci_to_move(position, text, strict, false).unwrap_err().kind
    }

    #[test]
    fn ordinary_moves() {
        let position = Position::new();
        let mv = uci_to_move(&position, "g1f3", true, false).unwrap();
        assert_eq!(mv.from(), Square::G1);
        assert_eq!(move_to_uci(&position, &mv, false), "g1f3");
    }

    #[test]
    fn promotions() {
        let position = pos("8/P7/8/8/8/8/8/4K1k1 w - - 0 1");
        let mv = uci_to_move(&position, "a7a8n", true, false).unwrap();
        assert_eq!(mv.promotion(), Ok(Piece::Knight));
        assert_eq!(move_to_uci(&position, &mv, false), "a7a8n");

        assert_eq!(uci_to_move(&position, "a7a8N", false, false), Ok(mv));
        assert_eq!(err(&position, "a7a8N", true), NotationErrorKind::NonCanonicalUci);
        assert_eq!(err(&position, "a7a8", false), NotationErrorKind::MissingPromotion);
        assert_eq!(err(&position, "a7a8k", false), NotationErrorKind::IllegalPromotionPiece);
        assert_eq!(
            err(&Position::new(), "e2e4q", false),
            NotationErrorKind::UnexpectedPromotion
        );
    }

    #[test]
    fn regular_castling_forms() {
        let position = pos("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R w KQkq - 0 1");
        let castle = uci_to_move(&position, "e1g1", true, false).unwrap();
        assert!(castle.is_castling());
        assert_eq!(move_to_uci(&position, &castle, false), "e1g1");
        assert_eq!(move_to_uci(&position, &castle, true), "e1h1");

        assert_eq!(uci_to_move(&position, "e1h1", false, false), Ok(castle));
        assert_eq!(err(&position, "e1h1", true), NotationErrorKind::NonCanonicalUci);
        assert_eq!(uci_to_move(&position, "e1h1", true, true), Ok(castle));
    }

    #[test]
    fn chess960_ambiguous_king_move() {
        // King b1, rook a1: b1c1 is both an ordinary king move and the
        // king's castling destination.
        let position = pos("chess960:1k6/8/8/8/8/8/8/RK6 w A - 0 1");
        let king_move = uci_to_move(&position, "b1c1", true, false).unwrap();
        assert!(!king_move.is_castling());

        let castle = uci_to_move(&position, "b1a1", true, false).unwrap();
        assert!(castle.is_castling());
        assert_eq!(move_to_uci(&position, &castle, false), "b1a1");
    }

    #[test]
    fn chess960_unambiguous_castling() {
        let position = pos("chess960:4k3/8/8/8/8/8/8/4K2R w H - 0 1");
        let castle = uci_to_move(&position, "e1g1", true, false).unwrap();
        assert!(castle.is_castling());
        assert_eq!(uci_to_move(&position, "e1h1", false, false), Ok(castle));
        assert_eq!(move_to_uci(&position, &castle, true), "e1h1");
    }

    #[test]
    fn chess960_king_already_on_destination() {
        let position = pos("chess960:6k1/8/8/8/8/8/8/6KR w H - 0 1");
        let castle = position
            .moves()
            .iter()
            .find(|mv| mv.is_castling())
            .copied()
            .unwrap();
        assert_eq!(castle.from(), castle.to());
        assert_eq!(move_to_uci(&position, &castle, false), "g1h1");
        assert_eq!(uci_to_move(&position, "g1h1", true, false), Ok(castle));
    }

    #[test]
    fn syntax_errors() {
        let position = Position::new();
        assert_eq!(err(&position, "", false), NotationErrorKind::Empty);
        assert_eq!(err(&position, "e2", false), NotationErrorKind::InvalidSyntax);
        assert_eq!(err(&position, "e2e9", false), NotationErrorKind::InvalidSyntax);
        assert_eq!(err(&position, "e2e4x", false), NotationErrorKind::InvalidSyntax);
        assert_eq!(err(&position, "e2e5", false), NotationErrorKind::NoMatchingMove);
    }

    #[test]
    fn roundtrip_all_startpos_moves() {
        let position = Position::chess960(100).unwrap();
        for mv in position.moves().iter() {
            let text = move_to_uci(&position, mv, false);
            assert_eq!(uci_to_move(&position, &text, true, false), Ok(*mv));
        }
    }
}
