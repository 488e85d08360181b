//! Error types for addressing and plate mutation

use crate::WellAddress;
use thiserror::Error;

/// Errors from the well label codec
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// Row cannot be expressed as a single letter A-Z
    #[error("Row {row} is out of range for alphanumeric labels (max 25)")]
    RowOutOfRange {
        /// Offending zero-based row
        row: usize,
    },

    /// Label does not match `<letter><column>`
    #[error("Malformed well label '{label}': {reason}")]
    MalformedLabel {
        /// The input as given
        label: String,
        /// What was wrong with it
        reason: String,
    },
}

/// Errors from plate construction and mutation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlateError {
    /// Plates need at least one row and one column, and a slot count that fits in memory
    #[error("Invalid plate dimensions {rows}x{columns}")]
    InvalidDimensions {
        /// Requested rows
        rows: usize,
        /// Requested columns
        columns: usize,
    },

    /// Address lies outside the plate
    #[error("Address {address} is outside a {rows}x{columns} plate")]
    OutOfBounds {
        /// Offending address
        address: WellAddress,
        /// Plate rows
        rows: usize,
        /// Plate columns
        columns: usize,
    },

    /// Slot already holds a part
    #[error("Slot {0} is already occupied")]
    SlotOccupied(WellAddress),

    /// More parts than empty slots
    #[error("Cannot place {requested} parts: only {available} empty slots")]
    CapacityExceeded {
        /// Parts to place
        requested: usize,
        /// Empty slots left
        available: usize,
    },

    /// Label could not be decoded
    #[error(transparent)]
    Address(#[from] AddressError),
}

/// Errors from parsing closed vocabularies
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Not a known measurement key or alias
    #[error("Unknown measurement key: {0}")]
    UnknownKey(String),

    /// Not a known QC status
    #[error("Invalid QC status: {0}")]
    UnknownStatus(String),
}
