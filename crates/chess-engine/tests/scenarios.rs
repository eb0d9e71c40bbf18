//! End-to-end scenarios exercising the public API the way a game-tree
//! layer would: FEN in, moves out, notation both ways.

use chess_engine::{
    Color, FenOptions, MoveLegality, NotationErrorKind, Position, Square, Variant,
};

const STARTPOS: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[test]
fn default_position_fen() {
    assert_eq!(Position::new().fen(), STARTPOS);
    assert_eq!(Position::from_fen(STARTPOS).unwrap(), Position::new());
}

#[test]
fn scholars_mate_sequence() {
    let mut position = Position::new();
    for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6"] {
        assert_eq!(position.play_notation(san), Ok(true), "{}", san);
        assert!(!position.is_checkmate());
    }
    let mate = position.parse_notation("Qxf7#", true).unwrap();
    assert_eq!(position.notation(&mate), "Qxf7#");
    position.play(&mate);

    assert!(position.is_check());
    assert!(position.is_checkmate());
    assert!(!position.is_stalemate());
    assert!(!position.has_move());
    assert_eq!(position.turn(), Color::Black);
    assert_eq!(position.fullmove_number(), 4);
}

#[test]
fn lone_king_attack_set() {
    let position = Position::from_fen("8/8/8/4K3/8/8/8/8 w - - 0 1").unwrap();
    let attacked: Vec<String> = Square::all()
        .filter(|&sq| position.is_attacked(sq, Color::White))
        .map(|sq| sq.to_string())
        .collect();
    assert_eq!(
        attacked,
        vec!["d4", "e4", "f4", "d5", "f5", "d6", "e6", "f6"]
    );
}

#[test]
fn chess960_castling_renderings() {
    // King on d1 between rooks on b1 and h1; the knight on c1 blocks the
    // queen side.
    let position =
        Position::from_fen("chess960:1rnk3r/pppppppp/8/8/8/8/PPPPPPPP/1RNK3R w HBhb - 0 1")
            .unwrap();
    let castles: Vec<_> = position
        .moves()
        .into_iter()
        .filter(|mv| mv.is_castling())
        .collect();
    assert_eq!(castles.len(), 1);
    let castle = castles[0];

    assert_eq!(position.notation(&castle), "O-O");
    assert_eq!(position.uci(&castle), "d1g1");
    assert_eq!(position.uci_with(&castle, true), "d1h1");
    assert_eq!(castle.rook_from(), Ok(Square::H1));
    assert_eq!(castle.rook_to(), Ok(Square::F1));

    let mut after = position.clone();
    after.play(&castle);
    assert_eq!(
        after.fen(),
        "1rnk3r/pppppppp/8/8/8/8/PPPPPPPP/1RN2RK1 b hb - 1 1"
    );
}

#[test]
fn chess960_castling_renderings_rook_on_h() {
    let position =
        Position::from_fen("chess960:4k3/8/8/8/8/8/8/R3K2R w HA - 0 1").unwrap();
    let castle = position.parse_notation("O-O", true).unwrap();
    assert_eq!(position.uci(&castle), "e1g1");
    assert_eq!(position.uci_with(&castle, true), "e1h1");
    assert_eq!(position.parse_uci("e1h1", false, false), Ok(castle));
    assert_eq!(position.parse_uci("e1h1", true, true), Ok(castle));
    assert_eq!(
        position.parse_uci("e1h1", true, false).unwrap_err().kind,
        NotationErrorKind::NonCanonicalUci
    );
}

#[test]
fn en_passant_captured_square() {
    let mut position = Position::new();
    for san in ["g4", "a6", "g5", "f5"] {
        assert_eq!(position.play_notation(san), Ok(true));
    }
    assert_eq!(
        position.fen(),
        "rnbqkbnr/1pppp1pp/p7/5pP1/8/8/PPPPPP1P/RNBQKBNR w KQkq f6 0 3"
    );

    let capture = position.parse_notation("gxf6", true).unwrap();
    assert!(capture.is_en_passant());
    assert_eq!(capture.to(), Square::F6);
    assert_eq!(capture.captured_square(), Ok(Square::F5));
    assert_eq!(capture.en_passant_square(), Ok(Square::F5));

    position.play(&capture);
    assert_eq!(position.square(Square::F5), None);
    assert_eq!(position.en_passant(), None);
}

#[test]
fn is_move_legal_protocol() {
    let position = Position::from_fen("4k3/1P6/8/8/8/8/8/4K3 w - - 0 1").unwrap();
    match position.is_move_legal(Square::B7, Square::B8) {
        MoveLegality::Promotion(pending) => {
            let mv = pending.resolve(chess_engine::Piece::Queen).unwrap();
            assert_eq!(position.notation(&mv), "b8=Q+");
        }
        other => panic!("expected a promotion, got {:?}", other),
    }
    assert_eq!(
        position.is_move_legal(Square::E1, Square::E3),
        MoveLegality::Illegal
    );
}

#[test]
fn fen_options() {
    let position = Position::start(Variant::Horde).unwrap();
    let options = FenOptions {
        with_variant: true,
        ..FenOptions::default()
    };
    let text = position.fen_with(&options);
    assert!(text.starts_with("horde:"));
    assert_eq!(Position::from_fen(&text).unwrap(), position);
}

#[test]
fn variant_games_play_through() {
    // Antichess: after 1. e3 b5 white must capture.
    let mut position = Position::start(Variant::Antichess).unwrap();
    assert_eq!(position.play_notation("e3"), Ok(true));
    assert_eq!(position.play_notation("b5"), Ok(true));
    let moves: Vec<String> = position
        .moves()
        .iter()
        .map(|mv| position.notation(mv))
        .collect();
    assert_eq!(moves, vec!["Bxb5"]);
    assert_eq!(position.play_notation("Nf3"), Ok(false));

    // Horde: white has no king to protect.
    let position = Position::start(Variant::Horde).unwrap();
    assert!(position.king_square(Color::White).is_err());
    assert_eq!(position.king_square(Color::Black), Ok(Some(Square::E8)));
    assert_eq!(position.moves().len(), 8);
}

#[test]
fn null_moves() {
    let mut position = Position::new();
    assert_eq!(position.play_notation("e4"), Ok(true));
    assert!(position.play_null_move());
    assert_eq!(position.turn(), Color::White);
    assert_eq!(position.en_passant(), None);
    assert_eq!(position.fullmove_number(), 2);
}
