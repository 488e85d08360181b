//! Association maps: which source well feeds which destination well
//!
//! Maps are pure functions of two plate snapshots and a sample list, so the
//! same inputs always give the same map in the same order.

use crate::AssociationError;
use plateflow_domain::{Plate, SampleId, WellAddress};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// One (source, destination) pairing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationEntry {
    /// Well in the source plate
    pub source: WellAddress,
    /// Well in the destination plate
    pub destination: WellAddress,
    /// Sample that justified the pairing (absent for identity maps)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample: Option<SampleId>,
}

/// Ordered list of pairings in which each destination appears at most once
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssociationMap {
    entries: Vec<AssociationEntry>,
}

impl AssociationMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a pairing; a destination can only receive from one source
    pub fn insert(&mut self, entry: AssociationEntry) -> Result<(), AssociationError> {
        if self.source_for(entry.destination).is_some() {
            return Err(AssociationError::DuplicateDestination(entry.destination));
        }
        self.entries.push(entry);
        Ok(())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[AssociationEntry] {
        &self.entries
    }

    /// Iterate over entries
    pub fn iter(&self) -> impl Iterator<Item = &AssociationEntry> + '_ {
        self.entries.iter()
    }

    /// Number of pairings
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Source well feeding `destination`
    pub fn source_for(&self, destination: WellAddress) -> Option<WellAddress> {
        self.entries
            .iter()
            .find(|entry| entry.destination == destination)
            .map(|entry| entry.source)
    }
}

/// Result of a sample-driven association
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleMapping {
    /// Pairings for every resolved sample
    pub map: AssociationMap,
    /// Samples missing from the source plate, the destination plate, or both
    pub unresolved: Vec<SampleId>,
}

impl SampleMapping {
    /// Whether every requested sample was found on both plates
    pub fn is_complete(&self) -> bool {
        self.unresolved.is_empty()
    }
}

/// Pair every address occupied in both plates with itself
///
/// Plates must have identical dimensions. Entries come out in row-major order.
pub fn build_identity_map(from: &Plate, to: &Plate) -> Result<AssociationMap, AssociationError> {
    if from.dimensions() != to.dimensions() {
        return Err(AssociationError::DimensionMismatch {
            from: from.dimensions(),
            to: to.dimensions(),
        });
    }

    let occupied: HashSet<WellAddress> = to.filled_slots().into_iter().collect();
    let mut map = AssociationMap::new();
    for address in from.filled_slots() {
        if occupied.contains(&address) {
            map.insert(AssociationEntry {
                source: address,
                destination: address,
                sample: None,
            })?;
        }
    }
    Ok(map)
}

/// Pair source and destination wells for each sample
///
/// - Sample missing from either plate: reported in `unresolved`, no entry.
/// - One source well: paired with every destination well of the sample.
/// - Several source wells: each is paired with the destination at the same
///   address; a source without one is `AmbiguousAssociation`.
///
/// A sample listed twice is only considered once.
pub fn build_sample_map(
    from: &Plate,
    to: &Plate,
    samples: &[SampleId],
) -> Result<SampleMapping, AssociationError> {
    let mut mapping = SampleMapping::default();
    let mut considered = HashSet::new();

    for &sample in samples {
        if !considered.insert(sample) {
            continue;
        }

        let sources = from.find(sample);
        let destinations = to.find(sample);

        if sources.is_empty() || destinations.is_empty() {
            debug!(
                %sample,
                in_source = sources.len(),
                in_destination = destinations.len(),
                "sample not found in both plates"
            );
            mapping.unresolved.push(sample);
            continue;
        }

        if let [source] = sources.as_slice() {
            for destination in destinations {
                mapping.map.insert(AssociationEntry {
                    source: *source,
                    destination,
                    sample: Some(sample),
                })?;
            }
            continue;
        }

        for source in sources {
            if !destinations.contains(&source) {
                return Err(AssociationError::AmbiguousAssociation {
                    sample,
                    source_address: source,
                });
            }
            mapping.map.insert(AssociationEntry {
                source,
                destination: source,
                sample: Some(sample),
            })?;
        }
    }

    Ok(mapping)
}

/// Samples present on both plates, in `a`'s row-major first-seen order
pub fn common_samples(a: &Plate, b: &Plate) -> Vec<SampleId> {
    let in_b: HashSet<SampleId> = b.samples().into_iter().collect();
    a.samples()
        .into_iter()
        .filter(|sample| in_b.contains(sample))
        .collect()
}
