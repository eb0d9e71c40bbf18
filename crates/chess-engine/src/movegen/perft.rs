//! Perft (performance test) for move generator validation.
//!
//! Perft counts the number of leaf nodes at a given depth, which can be
//! compared against known-correct values to validate the move generator.

use tracing::trace;

use super::{generate_moves, make_move};
use crate::Position;

/// Counts the number of leaf nodes at the given depth.
pub fn perft(position: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_moves(position);

    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .iter()
        .map(|m| perft(&make_move(position, m), depth - 1))
        .sum()
}

/// Perft with divide: the node count below each root move, keyed by the
/// move's UCI text and sorted by it.
pub fn perft_divide(position: &Position, depth: u32) -> Vec<(String, u64)> {
    let moves = generate_moves(position);
    let mut results = Vec::with_capacity(moves.len());

    for m in &moves {
        let next = make_move(position, m);
        let nodes = if depth > 1 { perft(&next, depth - 1) } else { 1 };
        let uci = position.uci(m);
        trace!(%uci, nodes, "perft divide");
        results.push((uci, nodes));
    }

    results.sort_by(|a, b| a.0.cmp(&b.0));
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_core::Variant;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
    const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
    const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
    const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 0 1";

    fn counts(fen: &str, expected: &[u64]) {
        let position = Position::from_fen(fen).unwrap();
        for (depth, &nodes) in expected.iter().enumerate() {
            assert_eq!(perft(&position, depth as u32 + 1), nodes, "{} depth {}", fen, depth + 1);
        }
    }

    #[test]
    fn perft_startpos() {
        let position = Position::new();
        assert_eq!(perft(&position, 0), 1);
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8902);
        assert_eq!(perft(&position, 4), 197281);
    }

    // Depth 5 is slow in debug builds.
    #[test]
    #[ignore]
    fn perft_startpos_depth_5() {
        assert_eq!(perft(&Position::new(), 5), 4865609);
    }

    // A position with lots of special moves.
    #[test]
    fn perft_kiwipete() {
        counts(KIWIPETE, &[48, 2039, 97862]);
    }

    // Check evasion, en passant, promotion.
    #[test]
    fn perft_position3() {
        counts(POSITION_3, &[14, 191, 2812]);
    }

    // Lots of promotions and captures.
    #[test]
    fn perft_position4() {
        counts(POSITION_4, &[6, 264, 9467]);
    }

    #[test]
    fn perft_position5() {
        counts(POSITION_5, &[44, 1486, 62379]);
    }

    #[test]
    fn perft_chess960() {
        counts(
            "chess960:bqnb1rkr/pp3ppp/3ppn2/2p5/5P2/P2P4/NPP1P1PP/BQ1BNRKR w HFhf - 2 9",
            &[21, 528, 12189],
        );
        let standard = Position::chess960(518).unwrap();
        assert_eq!(perft(&standard, 3), 8902);
    }

    #[test]
    fn perft_antichess_start() {
        let position = Position::start(Variant::Antichess).unwrap();
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8067);
    }

    #[test]
    fn perft_horde_start() {
        let position = Position::start(Variant::Horde).unwrap();
        assert_eq!(perft(&position, 1), 8);
        assert_eq!(perft(&position, 2), 128);
        assert_eq!(perft(&position, 3), 1274);
    }

    #[test]
    fn perft_divide_sums_to_perft() {
        let position = Position::from_fen(KIWIPETE).unwrap();
        let results = perft_divide(&position, 2);
        assert_eq!(results.len(), 48);
        let total: u64 = results.iter().map(|(_, n)| n).sum();
        assert_eq!(total, 2039);
        assert!(results.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(results.iter().any(|(uci, _)| uci == "e1g1"));
    }
}
