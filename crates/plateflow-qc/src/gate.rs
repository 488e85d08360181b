//! Workflow gates checked before a batch of samples may proceed

use crate::QcError;
use plateflow_domain::{Interval, MeasurementKey, MeasurementStore, PartId, QcStatus, SampleId};
use std::collections::HashSet;

/// Check a job's inputs: at least one, at most `max_inputs`, none repeated
pub fn validate_batch(samples: &[SampleId], max_inputs: usize) -> Result<(), QcError> {
    let mut seen = HashSet::new();
    if let Some(repeated) = samples.iter().find(|sample| !seen.insert(**sample)) {
        return Err(QcError::Batch(format!(
            "sample {} has been included more than once",
            repeated
        )));
    }
    if samples.len() > max_inputs {
        return Err(QcError::Batch(format!(
            "{} samples exceed the limit of {}",
            samples.len(),
            max_inputs
        )));
    }
    if samples.is_empty() {
        return Err(QcError::Batch("there are no samples".to_string()));
    }
    Ok(())
}

/// Require every part to have a `key` value inside `accepted`
pub fn validate_value_range(
    parts: &[PartId],
    key: MeasurementKey,
    accepted: Interval,
    store: &MeasurementStore,
) -> Result<(), QcError> {
    for &part in parts {
        let value = store.get(part, key);
        if !value.is_some_and(|v| accepted.contains(v)) {
            return Err(QcError::OutOfRange {
                part,
                key,
                value,
                accepted,
            });
        }
    }
    Ok(())
}

/// Require every part to carry exactly the `required` QC status
pub fn require_status(
    parts: &[PartId],
    required: QcStatus,
    store: &MeasurementStore,
) -> Result<(), QcError> {
    for &part in parts {
        let actual = store.status(part);
        if actual != required {
            return Err(QcError::StatusGate {
                part,
                required,
                actual,
            });
        }
    }
    Ok(())
}
