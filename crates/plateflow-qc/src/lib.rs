//! Plateflow QC
//!
//! Evaluates measurements against quality-control thresholds.
//!
//! The QC layer provides:
//! - Classification of one value against pass and margin intervals
//! - Per-part combination of statuses (fail > margin > pass > unknown)
//! - Plate evaluation that writes each part's combined status to the store
//! - One-hop propagation of measured values back to source parts
//! - Standard-curve calibration of plate reader fluorescence
//! - Workflow gates for batches, value ranges and prior QC status
//!
//! # Examples
//!
//! ```
//! use plateflow_domain::{FillOrder, MeasurementKey, MeasurementStore, Plate, QcStatus, SampleId};
//! use plateflow_qc::QcEvaluator;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut plate = Plate::new(8, 12)?;
//! plate.fill_samples(&[SampleId::new()], FillOrder::ColumnMajor)?;
//! let (_, part) = plate.parts().next().ok_or("empty plate")?;
//! let part = part.id;
//!
//! let mut store = MeasurementStore::new();
//! store.record(part, MeasurementKey::Concentration, 40.0);
//!
//! let evaluator = QcEvaluator::rna_default();
//! let report = evaluator.evaluate(&plate, &mut store);
//! assert_eq!(report.overall(), QcStatus::Margin);
//! assert_eq!(store.status(part), QcStatus::Margin);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod calibration;
mod config;
mod error;
mod evaluator;
pub mod gate;

pub use calibration::{StandardCurve, StandardPoint, DEFAULT_DILUTION_FACTOR};
pub use config::QcConfig;
pub use error::QcError;
pub use evaluator::{PlateQcReport, QcEvaluator, WellQc};
