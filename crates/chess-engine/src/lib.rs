//! Chess position engine with bitboard representation.
//!
//! This crate provides:
//! - [`Bitboard`] - 64-bit board representation with efficient operations
//! - [`Position`] - Board, variant, side to move, castling rights, en passant
//!   file and move counters, with FEN input and output
//! - Legal move generation for regular chess, Chess960, kingless variants,
//!   antichess and horde, yielding [`MoveDescriptor`]s
//! - Check, checkmate and stalemate detection
//! - SAN, figurine and UCI notation parsing and generation
//!
//! # Architecture
//!
//! The engine uses bitboards for piece representation - each piece type and
//! each color has a 64-bit integer where each bit represents a square.
//! Attack tables are computed at compile time. Variant behavior comes from
//! the capability table returned by [`Variant::rules`].
//!
//! # Example
//!
//! ```
//! use chess_engine::Position;
//!
//! let mut position = Position::new();
//! println!("Legal moves from starting position: {}", position.moves().len());
//!
//! for san in ["e4", "e5", "Bc4", "Nc6", "Qh5", "Nf6", "Qxf7#"] {
//!     assert_eq!(position.play_notation(san), Ok(true));
//! }
//! assert!(position.is_checkmate());
//! println!("Final position: {}", position.fen());
//! ```

mod bitboard;
mod descriptor;
mod fen;
mod legality;
pub mod movegen;
pub mod notation;
mod position;

pub use bitboard::Bitboard;
pub use chess_core::{
    CastleRight, Color, ColoredPiece, File, IllegalArgument, InvalidFen, Piece, Rank, Square,
    Variant,
};
pub use descriptor::{MoveDescriptor, MoveKind};
pub use fen::FenOptions;
pub use legality::{
    Castle960Choice, MoveLegality, MoveStatus, PendingCastle960, PendingPromotion,
};
pub use movegen::perft::{perft, perft_divide};
pub use movegen::{
    bishop_attacks, generate_moves, is_king_attacked, king_attacks, knight_attacks, make_move,
    pawn_attacks, queen_attacks, ray, rook_attacks, Direction, MoveList,
};
pub use notation::{InvalidNotation, NotationErrorKind};
pub use position::Position;
