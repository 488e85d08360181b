//! Validated per-well values ready to attach to a plate

use crate::IngestError;
use plateflow_domain::{MeasurementKey, MeasurementRecord, MeasurementStore, Plate, WellAddress};
use serde::Serialize;
use tracing::debug;

/// Values for one measurement key, addressed by well
///
/// Every value is finite. Entries keep the order they were read in; a well
/// listed twice keeps its last value when attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataMap {
    key: MeasurementKey,
    entries: Vec<(WellAddress, f64)>,
}

impl DataMap {
    /// Create an empty map for `key`
    pub fn new(key: MeasurementKey) -> Self {
        Self {
            key,
            entries: Vec::new(),
        }
    }

    /// Add a value; non-finite values are rejected
    pub fn insert(&mut self, address: WellAddress, value: f64) -> Result<(), IngestError> {
        if !value.is_finite() {
            return Err(IngestError::InvalidValue {
                location: address.to_string(),
                value: value.to_string(),
            });
        }
        self.entries.push((address, value));
        Ok(())
    }

    /// Measurement key
    pub fn key(&self) -> MeasurementKey {
        self.key
    }

    /// Entries in read order
    pub fn entries(&self) -> &[(WellAddress, f64)] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Last value read for `address`
    pub fn get(&self, address: WellAddress) -> Option<f64> {
        self.entries
            .iter()
            .rev()
            .find(|(a, _)| *a == address)
            .map(|(_, value)| *value)
    }

    /// Resolve every entry to a record for the part at its address
    ///
    /// Fails on the first address that is out of bounds or empty.
    pub fn records(&self, plate: &Plate) -> Result<Vec<MeasurementRecord>, IngestError> {
        self.entries
            .iter()
            .map(|&(address, value)| {
                let part = plate
                    .part_at(address)?
                    .ok_or(IngestError::EmptySlot(address))?;
                Ok(MeasurementRecord {
                    part: part.id,
                    key: self.key,
                    value,
                })
            })
            .collect()
    }

    /// Record every value on the part at its address
    ///
    /// All addresses are checked before anything is written, so a failing
    /// call leaves `store` untouched. Returns the number of values written.
    pub fn attach(&self, plate: &Plate, store: &mut MeasurementStore) -> Result<usize, IngestError> {
        let records = self.records(plate)?;
        let written = records.len();
        for record in records {
            store.apply(record);
        }
        debug!(plate = %plate.id(), key = %self.key, written, "data attached");
        Ok(written)
    }
}
