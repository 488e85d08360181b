//! Plateflow Ingest
//!
//! Decodes measurement data handed over by instruments and CSV readers into
//! validated per-well maps, then attaches them to a plate's parts.
//!
//! # Overview
//!
//! ```text
//! (label, value) / (row, column, value) / header table / grid
//!     -> DataMap (addresses decoded, values finite)
//!     -> MeasurementStore (one value per part)
//! ```
//!
//! Reading files and showing upload prompts happen elsewhere; this crate
//! only sees already-split rows of cells.
//!
//! # Example Usage
//!
//! ```
//! use plateflow_domain::{FillOrder, MeasurementKey, MeasurementStore, Plate, SampleId};
//! use plateflow_ingest::parse_labelled;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut plate = Plate::new(8, 12)?;
//! plate.fill_samples(&[SampleId::new(), SampleId::new()], FillOrder::ColumnMajor)?;
//!
//! let map = parse_labelled(MeasurementKey::Concentration, &[("A1", "55.0"), ("B1", "81.5")])?;
//! let mut store = MeasurementStore::new();
//! assert_eq!(map.attach(&plate, &mut store)?, 2);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod data_map;
mod error;
mod parser;

pub use data_map::DataMap;
pub use error::IngestError;
pub use parser::{parse_grid, parse_indexed, parse_labelled, parse_table};
