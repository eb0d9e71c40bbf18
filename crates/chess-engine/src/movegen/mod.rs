//! Move generation.
//!
//! Generation is two-phase: pseudo-legal moves are produced per piece type,
//! then moves that leave a royal king in check are filtered out by playing
//! them on a scratch copy. Variant rules come from [`Variant::rules`].

mod attacks;
pub mod perft;

use crate::{Bitboard, MoveDescriptor, MoveKind, Position};
use chess_core::{Color, ColoredPiece, File, Piece, Square, Variant};
use tracing::debug;

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, queen_attacks, ray, ray_attacks,
    rook_attacks, Direction,
};

/// A list of moves.
///
/// Regular chess positions have at most 218 legal moves; the backing vector
/// is allocated with room for that up front.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct MoveList {
    moves: Vec<MoveDescriptor>,
}

impl MoveList {
    /// Initial capacity, enough for any regular chess position.
    pub const MAX_MOVES: usize = 256;

    /// Creates an empty move list.
    #[inline]
    pub fn new() -> Self {
        MoveList {
            moves: Vec::with_capacity(Self::MAX_MOVES),
        }
    }

    /// Adds a move to the list.
    #[inline]
    pub fn push(&mut self, m: MoveDescriptor) {
        self.moves.push(m);
    }

    /// Returns the number of moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Returns true if the list is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Returns a slice of the moves.
    #[inline]
    pub fn as_slice(&self) -> &[MoveDescriptor] {
        &self.moves
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, MoveDescriptor> {
        self.moves.iter()
    }

    /// Returns true if the list holds the given move.
    pub fn contains(&self, m: &MoveDescriptor) -> bool {
        self.moves.contains(m)
    }

    /// Retains only moves for which the predicate returns true.
    pub fn retain<F>(&mut self, f: F)
    where
        F: FnMut(&MoveDescriptor) -> bool,
    {
        self.moves.retain(f);
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = MoveDescriptor;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.moves[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a MoveDescriptor;
    type IntoIter = std::slice::Iter<'a, MoveDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl IntoIterator for MoveList {
    type Item = MoveDescriptor;
    type IntoIter = std::vec::IntoIter<MoveDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl From<MoveList> for Vec<MoveDescriptor> {
    fn from(list: MoveList) -> Self {
        list.moves
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// Generates all legal moves for the given position.
///
/// Illegal positions (see [`Position::is_legal`]) have no moves.
pub fn generate_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();
    if !position.is_legal() {
        return moves;
    }

    generate_pseudo_legal_moves(position, &mut moves);

    let rules = position.variant.rules();
    let us = position.turn;
    if rules.royal_king[us.index()] {
        moves.retain(|m| {
            let next = make_move(position, m);
            !is_king_attacked(&next, us)
        });
    }
    if rules.forced_capture && moves.iter().any(|m| m.is_capture()) {
        moves.retain(|m| m.is_capture());
    }

    moves
}

/// Generates moves that obey piece movement rules, ignoring king safety
/// and forced captures.
pub fn generate_pseudo_legal_moves(position: &Position, moves: &mut MoveList) {
    generate_pawn_moves(position, moves);
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen, Piece::King] {
        generate_piece_moves(position, piece, moves);
    }
    generate_castling_moves(position, moves);
}

/// Pieces a pawn may promote to in the given variant.
pub fn promotion_pieces(variant: Variant) -> &'static [Piece] {
    const REGULAR: [Piece; 4] = [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight];
    const WITH_KING: [Piece; 5] = [
        Piece::Queen,
        Piece::Rook,
        Piece::Bishop,
        Piece::Knight,
        Piece::King,
    ];
    if variant.rules().king_promotion {
        &WITH_KING
    } else {
        &REGULAR
    }
}

/// Generates pseudo-legal pawn moves.
fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.turn;
    let them = us.opposite();
    let their_pieces = position.colors[them.index()];
    let empty = !position.occupied();
    let pawns = position.pieces_of(Piece::Pawn, us);
    let pawn = ColoredPiece::new(us, Piece::Pawn);
    let dir = us.pawn_direction();
    let promotions = promotion_pieces(position.variant);

    let forward = |bb: Bitboard| match us {
        Color::White => bb.north(),
        Color::Black => bb.south(),
    };
    let push = |moves: &mut MoveList, from: Square, to: Square, captured: Option<ColoredPiece>| {
        if to.rank().index() == us.promotion_rank() {
            for &piece in promotions {
                moves.push(MoveDescriptor::new_promotion(from, to, pawn, captured, piece));
            }
        } else {
            moves.push(MoveDescriptor::normal(from, to, pawn, captured));
        }
    };

    // Single pushes
    let single_pushes = forward(pawns) & empty;
    for to in single_pushes {
        if let Some(from) = to.offset(0, -dir) {
            push(moves, from, to, None);
        }
    }

    // Double pushes from the second rank
    let second_rank = Bitboard::rank(match us {
        Color::White => 1,
        Color::Black => 6,
    });
    let double_pushes = forward(forward(pawns & second_rank) & empty) & empty;
    for to in double_pushes {
        if let Some(from) = to.offset(0, -2 * dir) {
            moves.push(MoveDescriptor::double_push(from, to, pawn));
        }
    }

    // Horde pawns on the first rank may also advance two squares, without
    // creating an en passant target.
    if us == Color::White && position.variant.rules().white_pawns_on_first_rank {
        let first_rank_pushes = forward(forward(pawns & Bitboard::RANK_1) & empty) & empty;
        for to in first_rank_pushes {
            if let Some(from) = to.offset(0, -2) {
                moves.push(MoveDescriptor::normal(from, to, pawn, None));
            }
        }
    }

    // Captures
    for from in pawns {
        for to in pawn_attacks(from, us) & their_pieces {
            push(moves, from, to, position.square(to));
        }
    }

    // En passant
    if let Some(target) = position.en_passant_target() {
        let Some(captured_square) = target.offset(0, -dir) else {
            return;
        };
        let victim_in_place = position
            .pieces_of(Piece::Pawn, them)
            .contains(captured_square);
        if victim_in_place && !position.occupied().contains(target) {
            for from in pawn_attacks(target, them) & pawns {
                moves.push(MoveDescriptor::en_passant(from, target, pawn, captured_square));
            }
        }
    }
}

/// Generates pseudo-legal moves for knights, sliders and kings (castling aside).
fn generate_piece_moves(position: &Position, piece: Piece, moves: &mut MoveList) {
    let us = position.turn;
    let our_pieces = position.colors[us.index()];
    let occupied = position.occupied();
    let mover = ColoredPiece::new(us, piece);

    for from in position.pieces_of(piece, us) {
        let attacks = match piece {
            Piece::Knight => knight_attacks(from),
            Piece::Bishop => bishop_attacks(from, occupied),
            Piece::Rook => rook_attacks(from, occupied),
            Piece::Queen => queen_attacks(from, occupied),
            Piece::King => king_attacks(from),
            Piece::Pawn => Bitboard::EMPTY,
        };
        for to in attacks & !our_pieces {
            moves.push(MoveDescriptor::normal(from, to, mover, position.square(to)));
        }
    }
}

/// Squares of `rank` from file `a` to file `b`, both included, in any order.
fn rank_segment(rank: u8, a: u8, b: u8) -> Bitboard {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let files = (0xFFu64 >> (7 - hi)) & (0xFFu64 << lo);
    Bitboard(files << (8 * rank))
}

/// Generates castling moves, in both regular and Chess960 form.
///
/// The king ends on the g-file (rook on f) when castling with a rook on
/// its right, on the c-file (rook on d) otherwise. Every square between the
/// outermost king and rook squares must be free of other pieces, and none
/// of the squares the king crosses may be attacked.
fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.turn;
    // Effective rights already require the king and the flagged rooks on
    // the back rank.
    let flags = position.effective_castling_rights()[us.index()];
    let kings = position.pieces_of(Piece::King, us);
    let Some(king) = kings.single().filter(|_| flags != 0) else {
        return;
    };
    let them = us.opposite();
    if is_square_attacked(position, king, them) {
        return;
    }

    let occupied = position.occupied();
    let king_file = king.file().index();

    for file in File::ALL {
        let rook_file = file.index();
        if flags & (1 << rook_file) == 0 {
            continue;
        }
        let rook_from = Square::new(file, king.rank());

        let (king_to_file, rook_to_file) = if rook_file > king_file {
            (File::G, File::F)
        } else {
            (File::C, File::D)
        };
        let king_to = Square::new(king_to_file, king.rank());
        let rook_to = Square::new(rook_to_file, king.rank());

        let files = [king_file, rook_file, king_to_file.index(), rook_to_file.index()];
        let lo = files.iter().copied().min().unwrap_or(king_file);
        let hi = files.iter().copied().max().unwrap_or(king_file);
        let others = occupied & !Bitboard::from_square(king) & !Bitboard::from_square(rook_from);
        if (rank_segment(us.back_rank(), lo, hi) & others).is_not_empty() {
            continue;
        }

        let king_path = rank_segment(us.back_rank(), king_file, king_to_file.index());
        if king_path
            .into_iter()
            .any(|sq| is_square_attacked(position, sq, them))
        {
            continue;
        }

        moves.push(MoveDescriptor::castling(
            king,
            king_to,
            ColoredPiece::new(us, Piece::King),
            rook_from,
            rook_to,
        ));
    }
}

/// Returns the squares holding pieces of `by_color` that attack `sq`.
pub fn attackers_of(position: &Position, sq: Square, by_color: Color) -> Bitboard {
    let occupied = position.occupied();
    let diagonal =
        position.pieces_of(Piece::Bishop, by_color) | position.pieces_of(Piece::Queen, by_color);
    let orthogonal =
        position.pieces_of(Piece::Rook, by_color) | position.pieces_of(Piece::Queen, by_color);

    (pawn_attacks(sq, by_color.opposite()) & position.pieces_of(Piece::Pawn, by_color))
        | (knight_attacks(sq) & position.pieces_of(Piece::Knight, by_color))
        | (king_attacks(sq) & position.pieces_of(Piece::King, by_color))
        | (bishop_attacks(sq, occupied) & diagonal)
        | (rook_attacks(sq, occupied) & orthogonal)
}

/// Returns true if the given square is attacked by the given color.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let occupied = position.occupied();

    // Pawns, knights and kings attack symmetrically: look outward from `sq`.
    let enemy_pawns = position.pieces_of(Piece::Pawn, by_color);
    if (pawn_attacks(sq, by_color.opposite()) & enemy_pawns).is_not_empty() {
        return true;
    }

    let enemy_knights = position.pieces_of(Piece::Knight, by_color);
    if (knight_attacks(sq) & enemy_knights).is_not_empty() {
        return true;
    }

    let enemy_king = position.pieces_of(Piece::King, by_color);
    if (king_attacks(sq) & enemy_king).is_not_empty() {
        return true;
    }

    let enemy_bishops_queens =
        position.pieces_of(Piece::Bishop, by_color) | position.pieces_of(Piece::Queen, by_color);
    if enemy_bishops_queens.is_not_empty()
        && (bishop_attacks(sq, occupied) & enemy_bishops_queens).is_not_empty()
    {
        return true;
    }

    let enemy_rooks_queens =
        position.pieces_of(Piece::Rook, by_color) | position.pieces_of(Piece::Queen, by_color);
    enemy_rooks_queens.is_not_empty()
        && (rook_attacks(sq, occupied) & enemy_rooks_queens).is_not_empty()
}

/// Returns true if the (single) king of the given color is attacked.
pub fn is_king_attacked(position: &Position, king_color: Color) -> bool {
    match position.pieces_of(Piece::King, king_color).single() {
        Some(king) => is_square_attacked(position, king, king_color.opposite()),
        None => false,
    }
}

/// Makes a move and returns the new position.
pub fn make_move(position: &Position, m: &MoveDescriptor) -> Position {
    let mut next = position.clone();
    apply_move(&mut next, m);
    next
}

/// Applies a move in place. The move is trusted to come from this position.
pub(crate) fn apply_move(position: &mut Position, m: &MoveDescriptor) {
    let us = m.color();
    let from = m.from();
    let to = m.to();

    position.remove(from);
    if let Ok(captured) = m.captured_square() {
        position.remove(captured);
    }
    if let MoveKind::Castling { rook_from, rook_to } = m.kind() {
        position.remove(rook_from);
        position.put(rook_to, ColoredPiece::new(us, Piece::Rook));
    }
    position.remove(to);
    position.put(to, m.arriving_colored_piece());

    // A king move drops both rights; anything leaving or landing on a back
    // rank square drops the right tied to that file.
    if m.moving_piece() == Piece::King {
        position.castling[us.index()] = 0;
    }
    for sq in [from, to] {
        for color in Color::ALL {
            if sq.rank().index() == color.back_rank() {
                position.castling[color.index()] &= !(1 << sq.file().index());
            }
        }
    }

    position.en_passant = if m.is_double_push() {
        Some(from.file())
    } else {
        None
    };

    if m.moving_piece() == Piece::Pawn || m.is_capture() {
        position.halfmove_clock = 0;
    } else {
        position.halfmove_clock += 1;
    }
    if us == Color::Black {
        position.fullmove_number += 1;
    }
    position.turn = us.opposite();
}

impl Position {
    /// Returns all legal moves.
    pub fn moves(&self) -> MoveList {
        generate_moves(self)
    }

    /// Returns true if at least one legal move exists.
    pub fn has_move(&self) -> bool {
        !generate_moves(self).is_empty()
    }

    /// Returns true if `sq` is attacked by a piece of color `by`.
    pub fn is_attacked(&self, sq: Square, by: Color) -> bool {
        is_square_attacked(self, sq, by)
    }

    /// Returns the squares of the pieces of color `by` attacking `sq`.
    pub fn attackers(&self, sq: Square, by: Color) -> Vec<Square> {
        attackers_of(self, sq, by).into_iter().collect()
    }

    /// Applies a move generated from this position.
    pub fn play(&mut self, m: &MoveDescriptor) {
        apply_move(self, m);
    }

    /// Returns true if passing the turn is allowed: the position is legal
    /// and the side to move is not in check.
    pub fn is_null_move_legal(&self) -> bool {
        self.is_legal() && !self.royal_king_attacked(self.turn)
    }

    /// Passes the turn. Returns false, leaving the position untouched, when
    /// the null move is not allowed.
    pub fn play_null_move(&mut self) -> bool {
        if !self.is_null_move_legal() {
            debug!(fen = %self.fen(), "null move refused");
            return false;
        }
        if self.turn == Color::Black {
            self.fullmove_number += 1;
        }
        self.turn = self.turn.opposite();
        self.en_passant = None;
        self.halfmove_clock += 1;
        true
    }

    /// True if `color` has a royal king and it is attacked.
    pub(crate) fn royal_king_attacked(&self, color: Color) -> bool {
        self.variant.has_royal_king(color) && is_king_attacked(self, color)
    }
}
