//! QC error types

use plateflow_domain::{Interval, MeasurementKey, PartId, QcStatus};
use thiserror::Error;

/// Errors that can occur during QC operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QcError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A part's value is missing or outside the accepted interval
    #[error("Part {part} has no valid {key} (got {value:?}, accepted {}..={})", .accepted.min, .accepted.max)]
    OutOfRange {
        /// Offending part
        part: PartId,
        /// Measurement checked
        key: MeasurementKey,
        /// Recorded value, if any
        value: Option<f64>,
        /// Accepted interval
        accepted: Interval,
    },

    /// A part has not reached the QC status required to proceed
    #[error("Part {part} requires QC status {required}, found {actual}")]
    StatusGate {
        /// Offending part
        part: PartId,
        /// Status the gate requires
        required: QcStatus,
        /// Status actually recorded
        actual: QcStatus,
    },

    /// The batch of inputs cannot be run as a job
    #[error("Invalid batch: {0}")]
    Batch(String),

    /// The standard curve cannot be built or applied
    #[error("Calibration error: {0}")]
    Calibration(String),
}
