//! Plateflow Transfer
//!
//! Moves samples between plates and keeps the record of what went where.
//!
//! # Overview
//!
//! The transfer layer is responsible for:
//! - **Association**: pairing source and destination wells, by sample or by address
//! - **Placement**: putting samples the destination lacks into its empty slots
//! - **Ledger**: one volume record per well-to-well transfer, accumulated per part
//! - **Provenance**: container and part edges for every committed transfer
//! - **Metrics**: counters for transfers, edges and populated plates
//!
//! Transfers are all-or-nothing: a sample that cannot be located on both
//! plates rejects the whole transfer and nothing is written.
//!
//! # Usage
//!
//! ## Plate-to-plate transfer
//!
//! ```
//! use plateflow_domain::{FillOrder, Plate, ProvenanceGraph, SampleId};
//! use plateflow_transfer::{TransferLedger, TransferPlanner};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples: Vec<SampleId> = (0..3).map(|_| SampleId::new()).collect();
//! let mut source = Plate::new(8, 12)?;
//! source.fill_samples(&samples, FillOrder::RowMajor)?;
//! let mut working = Plate::new(8, 12)?;
//!
//! let mut provenance = ProvenanceGraph::new();
//! let mut ledger = TransferLedger::new();
//! let mut planner = TransferPlanner::default_config();
//!
//! let volume = planner.default_volume();
//! planner.transfer_all(&source, &mut working, volume, &mut provenance, &mut ledger)?;
//! assert_eq!(ledger.len(), 3);
//! # Ok(())
//! # }
//! ```
//!
//! ## Distributing samples over new plates
//!
//! ```
//! use plateflow_domain::{FillOrder, PlateFormat, SampleId};
//! use plateflow_transfer::TransferPlanner;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let samples: Vec<SampleId> = (0..100).map(|_| SampleId::new()).collect();
//! let mut factory = PlateFormat::WELLS_96;
//! let plates = TransferPlanner::default_config().make_and_populate(
//!     &samples,
//!     &mut factory,
//!     None,
//!     FillOrder::ColumnMajor,
//! )?;
//! assert_eq!(plates.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! The planner can be configured via TOML:
//!
//! ```toml
//! fill_order = "column_major"
//! default_volume_ul = 20.0
//! max_volume_ul = 1000.0
//! ```

#![warn(missing_docs)]

pub mod association;
mod config;
mod error;
mod ledger;
mod metrics;
mod planner;

pub use association::{
    build_identity_map, build_sample_map, common_samples, AssociationEntry, AssociationMap,
    SampleMapping,
};
pub use config::TransferConfig;
pub use error::{AssociationError, TransferError};
pub use ledger::{TransferLedger, TransferRecord, Volume};
pub use metrics::TransferMetrics;
pub use planner::{TransferOutcome, TransferPlanner};
