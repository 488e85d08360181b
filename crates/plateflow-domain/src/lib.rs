//! Plateflow Domain Layer
//!
//! This crate contains the spatial sample-tracking model that every other
//! Plateflow crate builds on. It has no I/O, no logging and no runtime
//! dependencies beyond identifiers, serialization derives and error derives.
//!
//! ## Key Concepts
//!
//! - **WellAddress**: (row, column) grid position with an alphanumeric label ("C4")
//! - **Plate**: fixed-size grid of slots, each `Empty` or `Occupied(Part)`
//! - **Part**: one physical instance of a sample in exactly one slot
//! - **Provenance**: directed derived-from edges between plates, parts and samples
//! - **Measurements**: closed set of keys, values stored per part
//! - **QC**: pass/margin intervals and the ordered `QcStatus`
//!
//! ## Architecture
//!
//! - Pure data and algorithms only
//! - Services (transfer planning, QC evaluation, ingest) live in other crates
//! - Trait definitions for the inventory boundary

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod ids;
pub mod measurement;
pub mod plate;
pub mod provenance;
pub mod quality;
pub mod traits;
pub mod well;

// Re-exports for convenience
pub use error::{AddressError, ParseError, PlateError};
pub use ids::{PartId, PlateId, SampleId};
pub use measurement::{MeasurementKey, MeasurementRecord, MeasurementStore};
pub use plate::{FillOrder, Locator, Part, Plate, Slot};
pub use provenance::{EdgeKind, EntityRef, ProvenanceEdge, ProvenanceGraph};
pub use quality::{Interval, QcRange, QcStatus};
pub use traits::{PlateFactory, PlateFormat};
pub use well::WellAddress;
