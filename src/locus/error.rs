use thiserror::Error;

use crate::constants::{MAX_POSITION, MIN_POSITION};

/// Broad classification of an [`IdentifierError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierErrorKind {
    MalformedIdentifier,
    InvalidCoordinate,
}

/// Errors from parsing a single variant identifier or validating its coordinate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Token is not of the form `chrom-pos-ref-alt`.
    #[error("malformed variant identifier '{token}'")]
    Malformed { token: String },

    #[error("unknown chromosome '{chrom}'")]
    UnknownChromosome { chrom: String },

    #[error("position {pos} outside {min}-{max}", min = MIN_POSITION, max = MAX_POSITION)]
    PositionOutOfRange { pos: u64 },
}

impl IdentifierError {
    pub fn kind(&self) -> IdentifierErrorKind {
        match self {
            IdentifierError::Malformed { .. } => IdentifierErrorKind::MalformedIdentifier,
            IdentifierError::UnknownChromosome { .. } | IdentifierError::PositionOutOfRange { .. } => {
                IdentifierErrorKind::InvalidCoordinate
            }
        }
    }
}

/// Locus input that cannot be searched. The message lists the offending tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocusError {
    #[error("Invalid genes/intervals: {}", .0.join(", "))]
    InvalidGenesOrIntervals(Vec<String>),

    #[error("Invalid variants: {}", .0.join(", "))]
    InvalidVariants(Vec<String>),

    #[error("Invalid variant notation: found both variant IDs and rsIDs")]
    MixedVariantNotation,
}
