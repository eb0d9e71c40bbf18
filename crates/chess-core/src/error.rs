//! Caller errors.
//!
//! [`IllegalArgument`] covers static contract violations: malformed
//! identifiers and queries that make no sense for the current variant or
//! move kind. Malformed chess *data* (FEN text, move notation) is reported
//! through separate error types so callers can tell the two apart.

use thiserror::Error;

use crate::Variant;

/// A programmer error: an argument that violates the API contract regardless
/// of the position it is applied to.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IllegalArgument {
    #[error("invalid square: '{0}'")]
    InvalidSquare(String),

    #[error("invalid color: '{0}' (expected 'w' or 'b')")]
    InvalidColor(String),

    #[error("invalid piece: '{0}'")]
    InvalidPiece(String),

    #[error("invalid colored piece: '{0}'")]
    InvalidColoredPiece(String),

    #[error("invalid variant: '{0}'")]
    InvalidVariant(String),

    #[error("invalid castle identifier '{castle}' for variant {variant}")]
    InvalidCastle { castle: String, variant: Variant },

    #[error("invalid promotion piece: '{0}'")]
    InvalidPromotion(String),

    #[error("invalid Scharnagl code: {0} (expected 0-959)")]
    InvalidScharnaglCode(u32),

    #[error("variant {0} has no canonical start position")]
    NoCanonicalStart(Variant),

    #[error("variant {variant} does not track a {color} king")]
    UntrackedKing {
        variant: Variant,
        color: crate::Color,
    },

    #[error("{field} is not defined for a {kind} move")]
    NotApplicable {
        field: &'static str,
        kind: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_the_offending_value() {
        let err = IllegalArgument::InvalidSquare("i9".to_string());
        assert!(err.to_string().contains("i9"));

        let err = IllegalArgument::InvalidCastle {
            castle: "wa".to_string(),
            variant: Variant::Regular,
        };
        assert_eq!(
            err.to_string(),
            "invalid castle identifier 'wa' for variant regular"
        );

        let err = IllegalArgument::NotApplicable {
            field: "captured piece",
            kind: "quiet",
        };
        assert_eq!(err.to_string(), "captured piece is not defined for a quiet move");
    }
}
