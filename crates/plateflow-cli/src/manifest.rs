//! Run manifest: the TOML description of one protocol run.

use crate::error::{CliError, Result};
use plateflow_domain::{FillOrder, MeasurementKey};
use plateflow_qc::{QcConfig, StandardPoint};
use plateflow_transfer::TransferConfig;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;

/// A run manifest.
///
/// Steps run in a fixed order: transfers, measurements, calibrations,
/// evaluation, then propagation.
///
/// ```toml
/// evaluate = ["working"]
/// propagate = ["working"]
///
/// [transfer]
/// fill_order = "column_major"
///
/// [[plates]]
/// name = "stock"
/// samples = ["S1", "S2"]
///
/// [[plates]]
/// name = "working"
///
/// [[transfers]]
/// from = "stock"
/// to = "working"
/// volume_ul = 20.0
///
/// [[measurements]]
/// plate = "working"
/// key = "concentration"
/// values = { A1 = 40.0, B1 = 60.0 }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Manifest {
    /// Transfer planner settings
    #[serde(default)]
    pub transfer: TransferConfig,

    /// QC ranges, propagated keys and batch limit
    #[serde(default)]
    pub qc: QcConfig,

    /// Plates and their initial contents
    #[serde(default)]
    pub plates: Vec<PlateSpec>,

    /// Plate-to-plate transfers, in order
    #[serde(default)]
    pub transfers: Vec<TransferStep>,

    /// Values recorded against wells
    #[serde(default)]
    pub measurements: Vec<MeasurementStep>,

    /// Standard curves turning fluorescence into concentration
    #[serde(default)]
    pub calibrations: Vec<CalibrationStep>,

    /// Plates to run QC evaluation on
    #[serde(default)]
    pub evaluate: Vec<String>,

    /// Plates whose values are copied back to their source parts
    #[serde(default)]
    pub propagate: Vec<String>,
}

/// A plate declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlateSpec {
    /// Unique plate name
    pub name: String,

    /// Rows (default 8)
    #[serde(default = "default_rows")]
    pub rows: usize,

    /// Columns (default 12)
    #[serde(default = "default_columns")]
    pub columns: usize,

    /// Sample names placed on the plate at the start of the run
    #[serde(default)]
    pub samples: Vec<String>,

    /// Order for the initial samples; the transfer fill order when absent
    #[serde(default)]
    pub fill_order: Option<FillOrder>,
}

/// A transfer step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferStep {
    /// Source plate name
    pub from: String,

    /// Destination plate name
    pub to: String,

    /// Sample names to move; every sample of the source when absent
    #[serde(default)]
    pub samples: Option<Vec<String>>,

    /// Volume per well (ul); the configured default when absent
    #[serde(default)]
    pub volume_ul: Option<f64>,
}

/// A measurement step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeasurementStep {
    /// Plate measured
    pub plate: String,

    /// Measurement key
    pub key: MeasurementKey,

    /// Value per well label
    pub values: BTreeMap<String, f64>,
}

/// A calibration step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalibrationStep {
    /// Plate whose fluorescence readings are converted
    pub plate: String,

    /// The two standards
    pub standards: [StandardPoint; 2],
}

fn default_rows() -> usize {
    8
}

fn default_columns() -> usize {
    12
}

impl Manifest {
    /// Load a manifest from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse a manifest from a TOML string.
    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Check settings and that every step refers to a declared plate.
    pub fn validate(&self) -> Result<()> {
        self.transfer.validate().map_err(CliError::Config)?;
        self.qc.validate().map_err(CliError::Config)?;

        let mut names = HashSet::new();
        for plate in &self.plates {
            if plate.name.trim().is_empty() {
                return Err(CliError::Manifest("plate names cannot be empty".to_string()));
            }
            if !names.insert(plate.name.as_str()) {
                return Err(CliError::Manifest(format!(
                    "plate '{}' is declared twice",
                    plate.name
                )));
            }
        }

        let known = |name: &str, step: &str| -> Result<()> {
            if names.contains(name) {
                Ok(())
            } else {
                Err(CliError::Manifest(format!(
                    "{} refers to undeclared plate '{}'",
                    step, name
                )))
            }
        };

        for (i, step) in self.transfers.iter().enumerate() {
            let label = format!("transfer {}", i + 1);
            known(&step.from, &label)?;
            known(&step.to, &label)?;
            if step.from == step.to {
                return Err(CliError::Manifest(format!(
                    "{} moves plate '{}' onto itself",
                    label, step.from
                )));
            }
        }
        for step in &self.measurements {
            known(&step.plate, "measurement")?;
        }
        for step in &self.calibrations {
            known(&step.plate, "calibration")?;
        }
        for name in &self.evaluate {
            known(name, "evaluate")?;
        }
        for name in &self.propagate {
            known(name, "propagate")?;
        }
        Ok(())
    }
}
