//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Manifest refers to something it does not define
    #[error("Invalid manifest: {0}")]
    Manifest(String),

    /// Plate error
    #[error(transparent)]
    Plate(#[from] plateflow_domain::PlateError),

    /// Transfer error
    #[error("Transfer failed: {0}")]
    Transfer(#[from] plateflow_transfer::TransferError),

    /// QC error
    #[error("QC failed: {0}")]
    Qc(#[from] plateflow_qc::QcError),

    /// Ingest error
    #[error("Measurement data rejected: {0}")]
    Ingest(#[from] plateflow_ingest::IngestError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
}
