//! Measurement keys and the per-part measurement store
//!
//! Keys form a closed set. Free-form instrument headers are mapped onto a
//! key at the boundary (`MeasurementKey::parse`) and never travel further as
//! strings.

use crate::error::ParseError;
use crate::{PartId, QcStatus};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Kind of value measured for a part
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasurementKey {
    /// Stock concentration in ng/ul
    Concentration,
    /// Average fragment size in bp
    AverageSize,
    /// Dilution applied before reading
    DilutionFactor,
    /// Raw plate reader fluorescence
    Fluorescence,
    /// Molarity in nmol/L
    Molarity,
}

impl MeasurementKey {
    /// Every key, in declaration order
    pub const ALL: [MeasurementKey; 5] = [
        MeasurementKey::Concentration,
        MeasurementKey::AverageSize,
        MeasurementKey::DilutionFactor,
        MeasurementKey::Fluorescence,
        MeasurementKey::Molarity,
    ];

    /// Canonical name
    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementKey::Concentration => "concentration",
            MeasurementKey::AverageSize => "average_size",
            MeasurementKey::DilutionFactor => "dilution_factor",
            MeasurementKey::Fluorescence => "fluorescence",
            MeasurementKey::Molarity => "molarity",
        }
    }

    /// Parse a canonical name or a known instrument header
    ///
    /// Matching ignores case and surrounding whitespace.
    ///
    /// # Examples
    ///
    /// ```
    /// use plateflow_domain::MeasurementKey;
    ///
    /// assert_eq!(MeasurementKey::parse("Stock Conc (ng/ul)"), Some(MeasurementKey::Concentration));
    /// assert_eq!(MeasurementKey::parse("Avg. Size"), Some(MeasurementKey::AverageSize));
    /// assert_eq!(MeasurementKey::parse("colour"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "concentration" | "stock conc (ng/ul)" | "ng/ul" => Some(MeasurementKey::Concentration),
            "average_size" | "avg. size" | "average size" => Some(MeasurementKey::AverageSize),
            "dilution_factor" | "dilution factor" => Some(MeasurementKey::DilutionFactor),
            "fluorescence" => Some(MeasurementKey::Fluorescence),
            "molarity" | "nmole/l" => Some(MeasurementKey::Molarity),
            _ => None,
        }
    }
}

impl std::fmt::Display for MeasurementKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeasurementKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseError::UnknownKey(s.to_string()))
    }
}

/// One measured value for one part
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Part the value belongs to
    pub part: PartId,
    /// What was measured
    pub key: MeasurementKey,
    /// Measured value
    pub value: f64,
}

/// Engine-owned store of measured values and derived QC statuses
///
/// Values accumulate per part under different keys. The QC status is a
/// derived value that evaluation overwrites freely.
#[derive(Debug, Clone, Default)]
pub struct MeasurementStore {
    values: HashMap<PartId, BTreeMap<MeasurementKey, f64>>,
    statuses: HashMap<PartId, QcStatus>,
}

impl MeasurementStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a value, replacing any previous value for the same key
    pub fn record(&mut self, part: PartId, key: MeasurementKey, value: f64) {
        self.values.entry(part).or_default().insert(key, value);
    }

    /// Record a value only if the part has none for this key
    ///
    /// Returns `true` when the value was written.
    pub fn record_if_absent(&mut self, part: PartId, key: MeasurementKey, value: f64) -> bool {
        let values = self.values.entry(part).or_default();
        if values.contains_key(&key) {
            return false;
        }
        values.insert(key, value);
        true
    }

    /// Apply a record (last write wins)
    pub fn apply(&mut self, record: MeasurementRecord) {
        self.record(record.part, record.key, record.value);
    }

    /// Value measured for a part under `key`
    pub fn get(&self, part: PartId, key: MeasurementKey) -> Option<f64> {
        self.values.get(&part).and_then(|values| values.get(&key)).copied()
    }

    /// All values for a part, ordered by key
    pub fn values_for(&self, part: PartId) -> Vec<MeasurementRecord> {
        self.values
            .get(&part)
            .map(|values| {
                values
                    .iter()
                    .map(|(key, value)| MeasurementRecord {
                        part,
                        key: *key,
                        value: *value,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Attach a QC status, overwriting any earlier one
    pub fn set_status(&mut self, part: PartId, status: QcStatus) {
        self.statuses.insert(part, status);
    }

    /// Current QC status; `Unknown` when never evaluated
    pub fn status(&self, part: PartId) -> QcStatus {
        self.statuses.get(&part).copied().unwrap_or(QcStatus::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_aliases() {
        assert_eq!(MeasurementKey::parse("ng/uL"), Some(MeasurementKey::Concentration));
        assert_eq!(MeasurementKey::parse(" CONCENTRATION "), Some(MeasurementKey::Concentration));
        assert_eq!(MeasurementKey::parse("nmole/L"), Some(MeasurementKey::Molarity));
        assert_eq!(MeasurementKey::parse("Dilution Factor"), Some(MeasurementKey::DilutionFactor));
        assert_eq!(
            "% Total".parse::<MeasurementKey>(),
            Err(ParseError::UnknownKey("% Total".to_string()))
        );
    }

    #[test]
    fn test_canonical_names_parse_back() {
        for key in MeasurementKey::ALL {
            assert_eq!(MeasurementKey::parse(key.as_str()), Some(key));
        }
    }

    #[test]
    fn test_values_accumulate_across_keys() {
        let part = PartId::from_value(1);
        let mut store = MeasurementStore::new();
        store.record(part, MeasurementKey::Concentration, 60.0);
        store.record(part, MeasurementKey::AverageSize, 350.0);

        assert_eq!(store.values_for(part).len(), 2);
        assert_eq!(store.get(part, MeasurementKey::Concentration), Some(60.0));
    }

    #[test]
    fn test_record_overwrites_but_record_if_absent_does_not() {
        let part = PartId::from_value(1);
        let mut store = MeasurementStore::new();
        store.record(part, MeasurementKey::Concentration, 60.0);
        store.record(part, MeasurementKey::Concentration, 70.0);
        assert_eq!(store.get(part, MeasurementKey::Concentration), Some(70.0));

        assert!(!store.record_if_absent(part, MeasurementKey::Concentration, 10.0));
        assert_eq!(store.get(part, MeasurementKey::Concentration), Some(70.0));
        assert!(store.record_if_absent(part, MeasurementKey::Molarity, 12.5));
    }

    #[test]
    fn test_status_defaults_to_unknown() {
        let part = PartId::from_value(3);
        let mut store = MeasurementStore::new();
        assert_eq!(store.status(part), QcStatus::Unknown);
        store.set_status(part, QcStatus::Fail);
        store.set_status(part, QcStatus::Pass);
        assert_eq!(store.status(part), QcStatus::Pass);
    }
}
