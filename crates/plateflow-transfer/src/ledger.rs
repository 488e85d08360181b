//! Transfer records and the per-part transfer history

use plateflow_domain::{PartId, PlateId, WellAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Liquid volume in microlitres
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    /// Create a volume from microlitres
    pub fn microliters(ul: f64) -> Self {
        Self(ul)
    }

    /// Value in microlitres
    pub fn as_microliters(&self) -> f64 {
        self.0
    }

    /// Finite and non-negative
    pub fn is_valid(&self) -> bool {
        self.0.is_finite() && self.0 >= 0.0
    }
}

impl std::ops::Add for Volume {
    type Output = Volume;

    fn add(self, rhs: Volume) -> Volume {
        Volume(self.0 + rhs.0)
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ul", self.0)
    }
}

/// One well-to-well transfer as instructed
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransferRecord {
    /// Part material was taken from
    pub from_part: PartId,
    /// Part material was added to
    pub to_part: PartId,
    /// Plate holding the source part
    pub from_plate: PlateId,
    /// Plate holding the destination part
    pub to_plate: PlateId,
    /// Source well
    pub source: WellAddress,
    /// Destination well
    pub destination: WellAddress,
    /// Volume moved
    pub volume: Volume,
}

/// Cumulative transfer-in history for every destination part
///
/// A pooled part receives several records; they are kept in the order the
/// transfers happened.
#[derive(Debug, Clone, Default)]
pub struct TransferLedger {
    records: Vec<TransferRecord>,
    by_destination: HashMap<PartId, Vec<usize>>,
}

impl TransferLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to the destination part's history
    pub fn record(&mut self, record: TransferRecord) {
        self.by_destination
            .entry(record.to_part)
            .or_default()
            .push(self.records.len());
        self.records.push(record);
    }

    /// Every record in the order it was made
    pub fn records(&self) -> &[TransferRecord] {
        &self.records
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether nothing was recorded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Transfers into one part, oldest first
    pub fn transfers_into(&self, part: PartId) -> Vec<&TransferRecord> {
        self.by_destination
            .get(&part)
            .map(|indices| indices.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    /// Total volume transferred into one part
    pub fn total_volume_into(&self, part: PartId) -> Volume {
        self.transfers_into(part)
            .into_iter()
            .fold(Volume::default(), |total, record| total + record.volume)
    }
}
