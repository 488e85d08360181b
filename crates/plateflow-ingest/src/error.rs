//! Error types for ingest

use plateflow_domain::{AddressError, PlateError, WellAddress};
use thiserror::Error;

/// Errors that can occur while decoding external measurement tables
#[derive(Error, Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Well label could not be decoded
    #[error("Address error: {0}")]
    Address(#[from] AddressError),

    /// Cell is not a finite number
    #[error("Invalid value {value:?} at {location}")]
    InvalidValue {
        /// Label, address or table row the value came from
        location: String,
        /// Raw cell text
        value: String,
    },

    /// Header row lacks a required column
    #[error("Missing header: {0}")]
    MissingHeader(String),

    /// Data header names no known measurement
    #[error("Unknown measurement key: {0}")]
    UnknownKey(String),

    /// Data addressed to a well without a part
    #[error("No part at {0} to attach data to")]
    EmptySlot(WellAddress),

    /// Plate rejected the address
    #[error("Plate error: {0}")]
    Plate(#[from] PlateError),
}
