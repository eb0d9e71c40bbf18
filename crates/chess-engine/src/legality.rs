//! Position validity, check detection and two-step move resolution.

use chess_core::{CastlingStyle, Color, IllegalArgument, Piece, Square};

use crate::movegen::promotion_pieces;
use crate::{Bitboard, MoveDescriptor, Position};

/// Outcome of [`Position::is_move_legal`].
///
/// Non-illegal outcomes carry what is needed to finish building the move
/// once the caller supplies the missing choice, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveLegality {
    Illegal,
    /// Exactly one legal move goes from `from` to `to`.
    Regular(MoveDescriptor),
    /// A pawn reaches its last rank; the promotion piece is still open.
    Promotion(PendingPromotion),
    /// Chess960: the destination is both a castling target and an ordinary
    /// king move.
    Castle960(PendingCastle960),
}

/// Tag of a non-illegal [`MoveLegality`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStatus {
    Regular,
    Promotion,
    Castle960,
}

impl MoveLegality {
    pub fn status(&self) -> Option<MoveStatus> {
        match self {
            MoveLegality::Illegal => None,
            MoveLegality::Regular(_) => Some(MoveStatus::Regular),
            MoveLegality::Promotion(_) => Some(MoveStatus::Promotion),
            MoveLegality::Castle960(_) => Some(MoveStatus::Castle960),
        }
    }

    #[inline]
    pub fn is_legal(&self) -> bool {
        !matches!(self, MoveLegality::Illegal)
    }
}

/// The legal promotions sharing one origin and destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingPromotion {
    candidates: Vec<MoveDescriptor>,
}

impl PendingPromotion {
    /// Pieces the pawn may become.
    pub fn pieces(&self) -> Vec<Piece> {
        self.candidates
            .iter()
            .filter_map(|mv| mv.promotion().ok())
            .collect()
    }

    /// Returns the promotion move to `piece`.
    pub fn resolve(&self, piece: Piece) -> Result<MoveDescriptor, IllegalArgument> {
        self.candidates
            .iter()
            .find(|mv| mv.promotion() == Ok(piece))
            .copied()
            .ok_or_else(|| IllegalArgument::InvalidPromotion(piece.to_san_char().to_string()))
    }
}

/// Which reading of an ambiguous Chess960 king move to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Castle960Choice {
    Castle,
    KingMove,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCastle960 {
    castle: MoveDescriptor,
    king_move: MoveDescriptor,
}

impl PendingCastle960 {
    pub fn resolve(&self, choice: Castle960Choice) -> MoveDescriptor {
        match choice {
            Castle960Choice::Castle => self.castle,
            Castle960Choice::KingMove => self.king_move,
        }
    }
}

impl Position {
    /// Returns true if the position could arise in a game of its variant:
    ///
    /// 1. every color with a royal king has exactly one, and colors that may
    ///    not have kings have none;
    /// 2. no pawn stands on the first or last rank (horde white pawns may
    ///    stand on the first);
    /// 3. the side that just moved did not leave its king in check.
    ///
    /// Castling flags and the en passant file are not part of this: stale
    /// ones are simply not effective. Illegal positions have no moves.
    pub fn is_legal(&self) -> bool {
        self.kings_consistent()
            && self.pawns_consistent()
            && !self.royal_king_attacked(self.turn.opposite())
    }

    fn kings_consistent(&self) -> bool {
        let rules = self.variant.rules();
        Color::ALL.into_iter().all(|color| {
            let kings = self.pieces_of(Piece::King, color).count();
            if rules.royal_king[color.index()] {
                kings == 1
            } else {
                rules.free_kings || kings == 0
            }
        })
    }

    fn pawns_consistent(&self) -> bool {
        let pawns = self.pieces[Piece::Pawn.index()];
        let first_rank = if self.variant.rules().white_pawns_on_first_rank {
            pawns & self.colors[Color::Black.index()]
        } else {
            pawns
        };
        (pawns & Bitboard::RANK_8).is_empty() && (first_rank & Bitboard::RANK_1).is_empty()
    }


    /// Returns the square of the king of `color`.
    ///
    /// Fails if the variant does not track a king for that color. Returns
    /// `Ok(None)` when the king is missing or not unique.
    pub fn king_square(&self, color: Color) -> Result<Option<Square>, IllegalArgument> {
        if !self.variant.has_royal_king(color) {
            return Err(IllegalArgument::UntrackedKing {
                variant: self.variant,
                color,
            });
        }
        Ok(self.pieces_of(Piece::King, color).single())
    }

    /// Returns true if the side to move has a royal king under attack.
    pub fn is_check(&self) -> bool {
        self.is_legal() && self.royal_king_attacked(self.turn)
    }

    pub fn is_checkmate(&self) -> bool {
        self.is_check() && !self.has_move()
    }

    /// No legal move while not in check. In antichess this is any position
    /// without a move, since check does not exist there.
    pub fn is_stalemate(&self) -> bool {
        self.is_legal() && !self.royal_king_attacked(self.turn) && !self.has_move()
    }

    /// Tests whether a legal move goes from `from` to `to`.
    ///
    /// In Chess960 a castling move is reached either by `to` being the
    /// castling rook's square or by `to` being the king's destination.
    pub fn is_move_legal(&self, from: Square, to: Square) -> MoveLegality {
        let chess960 = self.variant.rules().castling == CastlingStyle::Chess960;
        let candidates: Vec<MoveDescriptor> = self
            .moves()
            .into_iter()
            .filter(|mv| {
                if mv.from() != from {
                    return false;
                }
                match mv.rook_from() {
                    Ok(rook_from) if chess960 => rook_from == to || (mv.to() == to && from != to),
                    _ => mv.to() == to,
                }
            })
            .collect();

        if candidates.iter().any(|mv| mv.is_promotion()) {
            return MoveLegality::Promotion(PendingPromotion { candidates });
        }

        let castle = candidates.iter().find(|mv| mv.is_castling()).copied();
        let ordinary = candidates.iter().find(|mv| !mv.is_castling()).copied();
        match (castle, ordinary) {
            (Some(castle), Some(king_move)) => {
                MoveLegality::Castle960(PendingCastle960 { castle, king_move })
            }
            (Some(mv), None) | (None, Some(mv)) => MoveLegality::Regular(mv),
            (None, None) => MoveLegality::Illegal,
        }
    }

    /// Legal promotion pieces for this position's variant.
    pub fn promotion_pieces(&self) -> &'static [Piece] {
        promotion_pieces(self.variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::{File, Variant};

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    fn play_all(position: &mut Position, moves: &[&str]) {
        for uci in moves {
            let mv = *position
                .moves()
                .iter()
                .find(|m| m.to_string().starts_with(uci))
                .unwrap_or_else(|| panic!("no move {} in {}", uci, position.fen()));
            position.play(&mv);
        }
    }

    #[test]
    fn start_positions_are_legal() {
        assert!(Position::new().is_legal());
        assert!(Position::start(Variant::Antichess).unwrap().is_legal());
        assert!(Position::start(Variant::Horde).unwrap().is_legal());
        assert!(Position::chess960(0).unwrap().is_legal());
        assert!(Position::empty(Variant::NoKing).is_legal());
    }

    #[test]
    fn king_counts() {
        assert!(!pos("8/8/8/8/8/8/8/4K3 w - - 0 1").is_legal());
        assert!(!pos("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").is_legal());
        assert!(pos("white-king-only:8/8/8/8/8/8/8/4K3 w - - 0 1").is_legal());
        assert!(!pos("white-king-only:4k3/8/8/8/8/8/8/4K3 w - - 0 1").is_legal());
        assert!(pos("antichess:kk6/8/8/8/8/8/8/KKK5 w - - 0 1").is_legal());
    }

    #[test]
    fn pawns_on_back_ranks() {
        assert!(!pos("P3k3/8/8/8/8/8/8/4K3 w - - 0 1").is_legal());
        assert!(!pos("4k3/8/8/8/8/8/8/p3K3 w - - 0 1").is_legal());
        assert!(pos("horde:4k3/8/8/8/8/8/8/PPPP4 w - - 0 1").is_legal());
        assert!(!pos("horde:4k3/8/8/8/8/8/8/pPPP4 w - - 0 1").is_legal());
    }

    #[test]
    fn side_not_to_move_in_check() {
        // The side to move may be in check, the other side may not.
        let position = pos("4k3/8/8/8/8/8/8/R3K2r w - - 0 1");
        assert!(position.is_legal());
        assert!(position.is_check());
        assert!(!pos("4k3/8/8/8/8/8/8/4K2r b - - 0 1").is_legal());
        assert!(pos("4k3/8/8/8/8/8/8/4K2r b - - 0 1").moves().is_empty());
    }

    #[test]
    fn stale_castling_flags_keep_the_position_playable() {
        let mut position = pos("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1");
        assert!(position.is_legal());
        assert_eq!(position.moves().len(), 5);
        assert!(position.moves().iter().all(|mv| !mv.is_castling()));
        assert_eq!(position.effective_castling("wk"), Ok(false));
        assert_eq!(position.play_notation("Kd2"), Ok(true));

        // Strict parsing still refuses the same text.
        assert!(Position::from_fen_strict("4k3/8/8/8/8/8/8/4K3 w KQkq - 0 1").is_err());
    }

    #[test]
    fn removing_a_rook_leaves_its_flag_ineffective() {
        let mut position = Position::new();
        position.set_square(Square::H1, None);
        assert!(position.is_legal());
        assert_eq!(position.moves().len(), 20);
        assert_eq!(position.castling("wk"), Ok(true));
        assert_eq!(position.effective_castling("wk"), Ok(false));
        assert_eq!(position.effective_castling("wq"), Ok(true));
    }

    #[test]
    fn chess960_flags_blocked_by_other_rooks() {
        let position = pos("chess960:4k3/8/8/8/8/8/8/4KRRR w FH - 0 1");
        assert!(position.is_legal());
        assert!(position.moves().iter().all(|mv| !mv.is_castling()));
        assert!(pos("chess960:4k3/8/8/8/8/8/8/R3KR2 w FA - 0 1")
            .moves()
            .iter()
            .any(|mv| mv.is_castling()));
    }

    #[test]
    fn stale_en_passant_file_is_ignored() {
        let position = pos("4k3/8/8/8/8/8/8/4K3 w - e6 0 1");
        assert!(position.is_legal());
        assert_eq!(position.moves().len(), 5);
        assert_eq!(position.effective_en_passant(), None);

        let position = pos("4k3/8/8/8/4P3/8/8/4K3 b - e3 0 1");
        assert!(position.is_legal());
        assert_eq!(position.en_passant(), Some(File::E));
    }

    #[test]
    fn king_square_by_variant() {
        let position = Position::new();
        assert_eq!(position.king_square(Color::White), Ok(Some(Square::E1)));
        assert_eq!(position.king_square(Color::Black), Ok(Some(Square::E8)));

        let horde = Position::start(Variant::Horde).unwrap();
        assert_eq!(
            horde.king_square(Color::White),
            Err(IllegalArgument::UntrackedKing {
                variant: Variant::Horde,
                color: Color::White
            })
        );

        let kingless = Position::empty(Variant::Regular);
        assert_eq!(kingless.king_square(Color::White), Ok(None));
    }

    #[test]
    fn scholars_mate() {
        let mut position = Position::new();
        play_all(
            &mut position,
            &["e2e4", "e7e5", "f1c4", "b8c6", "d1h5", "g8f6", "h5f7"],
        );
        assert!(position.is_check());
        assert!(position.is_checkmate());
        assert!(!position.is_stalemate());
        assert!(!position.has_move());
    }

    #[test]
    fn stalemate() {
        let position = pos("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(!position.is_check());
        assert!(position.is_stalemate());
        assert!(!position.is_checkmate());
    }

    #[test]
    fn antichess_has_no_check() {
        let position = pos("antichess:8/8/8/8/8/8/8/K6r w - - 0 1");
        assert!(!position.is_check());
        assert!(position.has_move());

        let stuck = pos("antichess:8/8/8/8/8/p7/P7/8 w - - 0 1");
        assert!(stuck.is_stalemate());
        assert!(!stuck.is_checkmate());
    }

    #[test]
    fn illegal_positions_are_not_terminal() {
        let position = pos("4k3/8/8/8/8/8/8/4K2r b - - 0 1");
        assert!(!position.is_check());
        assert!(!position.is_checkmate());
        assert!(!position.is_stalemate());
    }

    #[test]
    fn move_legality_regular() {
        let position = Position::new();
        let legality = position.is_move_legal(Square::E2, Square::E4);
        assert_eq!(legality.status(), Some(MoveStatus::Regular));
        match legality {
            MoveLegality::Regular(mv) => assert_eq!(mv.to_string(), "e2e4"),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(
            position.is_move_legal(Square::E2, Square::E5),
            MoveLegality::Illegal
        );
        assert!(!position.is_move_legal(Square::E7, Square::E5).is_legal());
    }

    #[test]
    fn move_legality_promotion() {
        let position = pos("8/P7/8/8/8/8/8/4K2k w - - 0 1");
        let MoveLegality::Promotion(pending) = position.is_move_legal(Square::A7, Square::A8)
        else {
            panic!("expected a promotion");
        };
        assert_eq!(pending.pieces().len(), 4);
        assert_eq!(pending.resolve(Piece::Knight).unwrap().to_string(), "a7a8N");
        assert_eq!(
            pending.resolve(Piece::King),
            Err(IllegalArgument::InvalidPromotion("K".to_string()))
        );
        assert!(pending.resolve(Piece::Pawn).is_err());
    }

    #[test]
    fn move_legality_chess960_castling() {
        let position = pos("chess960:1k6/8/8/8/8/8/8/RK6 w A - 0 1");

        let MoveLegality::Castle960(pending) = position.is_move_legal(Square::B1, Square::C1)
        else {
            panic!("expected an ambiguous castling");
        };
        let castle = pending.resolve(Castle960Choice::Castle);
        assert!(castle.is_castling());
        assert_eq!(castle.rook_to(), Ok(Square::D1));
        let king_move = pending.resolve(Castle960Choice::KingMove);
        assert!(!king_move.is_castling());
        assert_eq!(king_move.to(), Square::C1);

        match position.is_move_legal(Square::B1, Square::A1) {
            MoveLegality::Regular(mv) => assert!(mv.is_castling()),
            other => panic!("unexpected {:?}", other),
        }
    }
}
