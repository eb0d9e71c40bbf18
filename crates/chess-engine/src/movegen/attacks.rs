//! Attack tables for all piece types.
//!
//! Everything here is computed at compile time. Knights, kings and pawns use
//! direct per-square lookups; sliders walk the precomputed [`RAYS`] up to the
//! first blocker.

use crate::Bitboard;
use chess_core::{Color, Square};

/// The eight sliding directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    pub const DIAGONALS: [Direction; 4] = [
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    pub const ORTHOGONALS: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// (file delta, rank delta) of one step.
    const fn delta(self) -> (i8, i8) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// Whether square indices grow along this direction.
    const fn is_positive(self) -> bool {
        matches!(
            self,
            Direction::North | Direction::NorthEast | Direction::East | Direction::NorthWest
        )
    }
}

/// Precomputed knight attack tables.
const KNIGHT_ATTACKS: [Bitboard; 64] = compute_step_attacks(&[
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
]);

/// Precomputed king attack tables.
const KING_ATTACKS: [Bitboard; 64] = compute_step_attacks(&[
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
]);

/// Precomputed pawn attack tables [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    compute_step_attacks(&[(-1, 1), (1, 1)]),
    compute_step_attacks(&[(-1, -1), (1, -1)]),
];

/// Empty-board rays [direction][square], excluding the origin square.
const RAYS: [[Bitboard; 64]; 8] = compute_rays();

/// Returns knight attacks from the given square.
#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

/// Returns king attacks from the given square.
#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Returns pawn attacks from the given square for the given color.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

/// Returns the empty-board ray from `sq` in the given direction.
#[inline]
pub fn ray(direction: Direction, sq: Square) -> Bitboard {
    RAYS[direction as usize][sq.index() as usize]
}

/// Returns the squares reached from `sq` along one direction, stopping at
/// (and including) the first occupied square.
#[inline]
pub fn ray_attacks(direction: Direction, sq: Square, occupied: Bitboard) -> Bitboard {
    let ray = RAYS[direction as usize][sq.index() as usize];
    let blockers = ray & occupied;
    let blocker = if direction.is_positive() {
        blockers.lowest()
    } else {
        blockers.highest()
    };
    match blocker {
        Some(blocker) => ray ^ RAYS[direction as usize][blocker.index() as usize],
        None => ray,
    }
}

/// Returns bishop attacks from the given square.
#[inline]
pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for direction in Direction::DIAGONALS {
        attacks |= ray_attacks(direction, sq, occupied);
    }
    attacks
}

/// Returns rook attacks from the given square.
#[inline]
pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for direction in Direction::ORTHOGONALS {
        attacks |= ray_attacks(direction, sq, occupied);
    }
    attacks
}

/// Returns queen attacks from the given square.
#[inline]
pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Builds a single-step attack table from (file, rank) offsets.
const fn compute_step_attacks(offsets: &[(i8, i8)]) -> [Bitboard; 64] {
    let mut attacks = [Bitboard::EMPTY; 64];
    let mut sq = 0;
    while sq < 64 {
        let file = (sq % 8) as i8;
        let rank = (sq / 8) as i8;
        let mut bb = 0u64;
        let mut i = 0;
        while i < offsets.len() {
            let f = file + offsets[i].0;
            let r = rank + offsets[i].1;
            if f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f) as u32;
            }
            i += 1;
        }
        attacks[sq] = Bitboard(bb);
        sq += 1;
    }
    attacks
}

const fn compute_rays() -> [[Bitboard; 64]; 8] {
    let mut rays = [[Bitboard::EMPTY; 64]; 8];
    let mut dir = 0;
    while dir < 8 {
        let (df, dr) = Direction::ALL[dir].delta();
        let mut sq = 0;
        while sq < 64 {
            let mut f = (sq % 8) as i8 + df;
            let mut r = (sq / 8) as i8 + dr;
            let mut bb = 0u64;
            while f >= 0 && f < 8 && r >= 0 && r < 8 {
                bb |= 1u64 << (r * 8 + f) as u32;
                f += df;
                r += dr;
            }
            rays[dir][sq] = Bitboard(bb);
            sq += 1;
        }
        dir += 1;
    }
    rays
}
