//! Error types for association building and transfers

use plateflow_domain::{PlateError, SampleId, WellAddress};
use thiserror::Error;

/// Errors that can occur while correlating two plates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AssociationError {
    /// Identity maps need plates of identical shape
    #[error("Plate dimensions do not match: {from:?} vs {to:?}")]
    DimensionMismatch {
        /// (rows, columns) of the source plate
        from: (usize, usize),
        /// (rows, columns) of the destination plate
        to: (usize, usize),
    },

    /// A replicated source has no address-identical destination
    #[error(
        "Sample {sample} occupies several source wells and {source_address} has no matching destination well"
    )]
    AmbiguousAssociation {
        /// Sample that could not be disambiguated
        sample: SampleId,
        /// Source well left without a partner
        source_address: WellAddress,
    },

    /// A destination well would receive from two sources
    #[error("Destination {0} is already associated")]
    DuplicateDestination(WellAddress),
}

/// Errors that can occur during transfer planning
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransferError {
    /// Plate mutation failed
    #[error("Plate error: {0}")]
    Plate(#[from] PlateError),

    /// Association could not be built
    #[error("Association error: {0}")]
    Association(#[from] AssociationError),

    /// Samples missing from one of the plates; nothing was transferred
    #[error("{} sample(s) could not be located in both plates: {}", .0.len(), join_samples(.0))]
    UnresolvedSamples(Vec<SampleId>),

    /// An associated well was unexpectedly empty
    #[error("Expected a part at {0}")]
    EmptySlot(WellAddress),

    /// Plate factory reports zero capacity
    #[error("Plate capacity must be greater than 0")]
    InvalidCapacity,

    /// Volume is negative, not finite, or above the configured maximum
    #[error("Invalid transfer volume: {0} ul")]
    InvalidVolume(f64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn join_samples(samples: &[SampleId]) -> String {
    samples
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
