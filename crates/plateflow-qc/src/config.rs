//! QC configuration

use plateflow_domain::{Interval, MeasurementKey, QcRange};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Configuration for QC evaluation and workflow gates
///
/// # Examples
///
/// ```
/// use plateflow_qc::QcConfig;
///
/// let config = QcConfig::from_toml(r#"
///     max_batch_inputs = 48
///     propagate_keys = ["concentration"]
///
///     [[ranges]]
///     key = "concentration"
///     pass = { min = 50.0, max = 100.0 }
///     margin = { min = 30.0, max = 120.0 }
/// "#).unwrap();
/// assert!(config.validate().is_ok());
/// assert_eq!(config.ranges.len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QcConfig {
    /// Ranges evaluated for every part, one per key
    #[serde(default)]
    pub ranges: Vec<QcRange>,

    /// Keys copied back to direct-source parts after measurement
    #[serde(default)]
    pub propagate_keys: Vec<MeasurementKey>,

    /// Largest number of samples a single job may take
    #[serde(default = "default_max_batch_inputs")]
    pub max_batch_inputs: usize,
}

fn default_max_batch_inputs() -> usize {
    96
}

impl Default for QcConfig {
    fn default() -> Self {
        Self {
            ranges: Vec::new(),
            propagate_keys: Vec::new(),
            max_batch_inputs: default_max_batch_inputs(),
        }
    }
}

impl QcConfig {
    /// RNA preset: stock concentration 50-100 ng/ul passes, 30-120 is marginal
    pub fn rna_default() -> Self {
        Self {
            ranges: vec![QcRange::new(
                MeasurementKey::Concentration,
                Interval::new(50.0, 100.0),
                Interval::new(30.0, 120.0),
            )],
            propagate_keys: vec![MeasurementKey::Concentration],
            max_batch_inputs: default_max_batch_inputs(),
        }
    }

    /// Range configured for `key`
    pub fn range_for(&self, key: MeasurementKey) -> Option<&QcRange> {
        self.ranges.iter().find(|range| range.key == key)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_batch_inputs == 0 {
            return Err("max_batch_inputs must be greater than 0".to_string());
        }

        let mut keys = HashSet::new();
        for range in &self.ranges {
            range.validate()?;
            if !keys.insert(range.key) {
                return Err(format!("more than one range configured for {}", range.key));
            }
        }
        Ok(())
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
