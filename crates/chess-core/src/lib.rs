//! Core types for chess.
//!
//! This crate provides the value types shared by the engine:
//! - [`Piece`], [`Color`] and [`ColoredPiece`] for piece representation
//! - [`Square`], [`File`], and [`Rank`] for board coordinates
//! - [`Variant`] and its [`VariantRules`] capability table
//! - [`CastleRight`] identifiers
//! - FEN field parsing ([`FenParser`])
//! - [`IllegalArgument`] for caller errors, [`InvalidFen`] for bad FEN data

mod castle;
mod color;
mod error;
mod fen;
mod piece;
mod square;
mod variant;

pub use castle::CastleRight;
pub use color::Color;
pub use error::IllegalArgument;
pub use fen::{format_board, FenErrorKind, FenParser, FenRecord, InvalidFen};
pub use piece::{ColoredPiece, Piece};
pub use square::{File, Rank, Square};
pub use variant::{CastlingStyle, Variant, VariantRules, HORDE_START_BOARD, REGULAR_START_BOARD};
