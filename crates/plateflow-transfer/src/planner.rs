//! Core transfer planner: populates plates, records volumes and lineage

use crate::association::{build_identity_map, build_sample_map, AssociationMap};
use crate::ledger::{TransferLedger, TransferRecord, Volume};
use crate::{TransferConfig, TransferError, TransferMetrics};
use plateflow_domain::{
    EdgeKind, EntityRef, FillOrder, Plate, PlateFactory, PlateId, ProvenanceGraph, SampleId,
    WellAddress,
};
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// What a committed transfer did
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransferOutcome {
    /// Source plate
    pub from_plate: PlateId,
    /// Destination plate
    pub to_plate: PlateId,
    /// Well pairings used
    pub map: AssociationMap,
    /// One record per pairing, in map order
    pub records: Vec<TransferRecord>,
    /// Destination wells that received a new part for a missing sample
    pub placed: Vec<WellAddress>,
}

/// A transfer computed against a copy of the destination plate
struct StagedTransfer {
    plate: Plate,
    outcome: TransferOutcome,
}

/// Transfer planner for moving samples between plates
///
/// Responsible for:
/// - Placing samples the destination plate does not hold yet
/// - Building the association map between source and destination
/// - Writing transfer records into the ledger
/// - Writing container and part provenance edges
///
/// Every operation either commits completely or leaves the destination
/// plate, the provenance graph and the ledger as they were.
///
/// # Examples
///
/// ```
/// use plateflow_domain::{FillOrder, Plate, ProvenanceGraph, SampleId};
/// use plateflow_transfer::{TransferConfig, TransferLedger, TransferPlanner, Volume};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let samples: Vec<SampleId> = (0..10).map(|_| SampleId::new()).collect();
/// let mut source = Plate::new(8, 12)?;
/// source.fill_samples(&samples, FillOrder::ColumnMajor)?;
///
/// let mut destination = Plate::new(8, 12)?;
/// let mut provenance = ProvenanceGraph::new();
/// let mut ledger = TransferLedger::new();
/// let mut planner = TransferPlanner::new(TransferConfig::default());
///
/// let outcome = planner.execute_transfer(
///     &source,
///     &mut destination,
///     &samples,
///     Volume::microliters(20.0),
///     &mut provenance,
///     &mut ledger,
/// )?;
/// assert_eq!(outcome.records.len(), 10);
/// println!("{}", planner.metrics().summary());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TransferPlanner {
    config: TransferConfig,
    metrics: TransferMetrics,
}

impl TransferPlanner {
    /// Create a new planner with the given configuration
    pub fn new(config: TransferConfig) -> Self {
        Self {
            config,
            metrics: TransferMetrics::new(),
        }
    }

    /// Create a planner with default configuration
    pub fn default_config() -> Self {
        Self::new(TransferConfig::default())
    }

    /// Get the configuration
    pub fn config(&self) -> &TransferConfig {
        &self.config
    }

    /// Get a reference to the current metrics
    pub fn metrics(&self) -> &TransferMetrics {
        &self.metrics
    }

    /// Reset metrics counters
    pub fn reset_metrics(&mut self) {
        self.metrics.reset();
    }

    /// Volume used when the caller has none of its own
    pub fn default_volume(&self) -> Volume {
        Volume::microliters(self.config.default_volume_ul)
    }

    /// Transfer `samples` from `from` into `to`
    ///
    /// 1. Samples missing from `to` are placed into its empty slots in the
    ///    configured fill order.
    /// 2. Source and destination wells are paired per sample; if any sample
    ///    cannot be found on both plates the whole transfer is rejected with
    ///    `UnresolvedSamples`.
    /// 3. One record per pairing goes into the ledger.
    /// 4. One container edge `from -> to` and one part edge per pairing go
    ///    into the provenance graph.
    pub fn execute_transfer(
        &mut self,
        from: &Plate,
        to: &mut Plate,
        samples: &[SampleId],
        volume: Volume,
        provenance: &mut ProvenanceGraph,
        ledger: &mut TransferLedger,
    ) -> Result<TransferOutcome, TransferError> {
        self.check_volume(volume)?;
        let staged = self.stage_or_abort(from, to, samples, volume)?;
        *to = staged.plate;
        Ok(self.commit(staged.outcome, provenance, ledger))
    }

    /// Transfer every sample held by `from` into `to`
    pub fn transfer_all(
        &mut self,
        from: &Plate,
        to: &mut Plate,
        volume: Volume,
        provenance: &mut ProvenanceGraph,
        ledger: &mut TransferLedger,
    ) -> Result<TransferOutcome, TransferError> {
        let samples = from.samples();
        self.execute_transfer(from, to, &samples, volume, provenance, ledger)
    }

    /// Transfer every sample of several source plates into one working plate
    ///
    /// Sources are staged one after another against the same destination,
    /// then committed together; a failure in any source commits nothing.
    pub fn transfer_from_many(
        &mut self,
        sources: &[&Plate],
        to: &mut Plate,
        volume: Volume,
        provenance: &mut ProvenanceGraph,
        ledger: &mut TransferLedger,
    ) -> Result<Vec<TransferOutcome>, TransferError> {
        self.check_volume(volume)?;

        let mut working = to.clone();
        let mut outcomes = Vec::with_capacity(sources.len());
        for source in sources {
            let samples = source.samples();
            let staged = self.stage_or_abort(source, &working, &samples, volume)?;
            working = staged.plate;
            outcomes.push(staged.outcome);
        }

        *to = working;
        Ok(outcomes
            .into_iter()
            .map(|outcome| self.commit(outcome, provenance, ledger))
            .collect())
    }

    /// Record that `to` is a relabelled copy of `from`
    ///
    /// Writes one container edge and a part edge for every address occupied
    /// in both plates. Plates must have the same dimensions.
    pub fn relabel(
        &mut self,
        from: &Plate,
        to: &Plate,
        provenance: &mut ProvenanceGraph,
    ) -> Result<AssociationMap, TransferError> {
        let map = build_identity_map(from, to)?;

        let mut part_pairs = Vec::with_capacity(map.len());
        for entry in map.iter() {
            let from_part = from
                .part_at(entry.source)?
                .ok_or(TransferError::EmptySlot(entry.source))?;
            let to_part = to
                .part_at(entry.destination)?
                .ok_or(TransferError::EmptySlot(entry.destination))?;
            part_pairs.push((from_part.id, to_part.id));
        }

        let container_edges = usize::from(provenance.add_edge(
            EntityRef::Plate(from.id()),
            EntityRef::Plate(to.id()),
            EdgeKind::Container,
        ));
        let part_edges = part_pairs
            .into_iter()
            .filter(|(a, b)| {
                provenance.add_edge(EntityRef::Part(*a), EntityRef::Part(*b), EdgeKind::Part)
            })
            .count();
        self.metrics.record_edges(part_edges, container_edges);

        info!(
            from = %from.id(),
            to = %to.id(),
            parts = map.len(),
            "plate relabelled"
        );
        Ok(map)
    }

    /// Distribute samples over as many plates as needed
    ///
    /// `first_plate`, when given, is filled first with as many samples as it
    /// has empty slots; it is always returned as plate 0. Remaining samples go
    /// in groups of the factory's capacity onto fresh plates, so group *i*
    /// lands on plate *i*. A repeated sample is placed once, at its first
    /// position. At least one plate is always returned, so an empty sample
    /// list still yields a fresh empty plate.
    pub fn make_and_populate<F: PlateFactory>(
        &mut self,
        samples: &[SampleId],
        factory: &mut F,
        first_plate: Option<Plate>,
        order: FillOrder,
    ) -> Result<Vec<Plate>, TransferError> {
        let capacity = factory.capacity();
        if capacity == 0 {
            return Err(TransferError::InvalidCapacity);
        }

        let mut seen = HashSet::new();
        let unique: Vec<SampleId> = samples
            .iter()
            .copied()
            .filter(|sample| seen.insert(*sample))
            .collect();

        let mut plates = Vec::new();
        let mut remaining = unique.as_slice();

        if let Some(mut plate) = first_plate {
            let take = plate.empty_slots().len().min(remaining.len());
            plate.fill_samples(&remaining[..take], order)?;
            remaining = &remaining[take..];
            plates.push(plate);
        }

        for group in remaining.chunks(capacity) {
            let mut plate = factory.create_plate()?;
            plate.fill_samples(group, order)?;
            plates.push(plate);
        }

        if plates.is_empty() {
            plates.push(factory.create_plate()?);
        }

        self.metrics.record_populated(plates.len());
        info!(
            samples = unique.len(),
            plates = plates.len(),
            "samples distributed over plates"
        );
        Ok(plates)
    }

    fn check_volume(&self, volume: Volume) -> Result<(), TransferError> {
        if !volume.is_valid() || volume.as_microliters() > self.config.max_volume_ul {
            return Err(TransferError::InvalidVolume(volume.as_microliters()));
        }
        Ok(())
    }

    fn stage_or_abort(
        &mut self,
        from: &Plate,
        to: &Plate,
        samples: &[SampleId],
        volume: Volume,
    ) -> Result<StagedTransfer, TransferError> {
        self.stage(from, to, samples, volume).inspect_err(|err| {
            if let TransferError::UnresolvedSamples(missing) = err {
                self.metrics.record_abort();
                warn!(
                    from = %from.id(),
                    to = %to.id(),
                    missing = missing.len(),
                    "transfer aborted"
                );
            }
        })
    }

    fn stage(
        &self,
        from: &Plate,
        to: &Plate,
        samples: &[SampleId],
        volume: Volume,
    ) -> Result<StagedTransfer, TransferError> {
        let mut plate = to.clone();

        let mut seen = HashSet::new();
        let missing: Vec<SampleId> = samples
            .iter()
            .copied()
            .filter(|sample| seen.insert(*sample) && plate.find(*sample).is_empty())
            .collect();
        let placed = plate.fill_samples(&missing, self.config.fill_order)?;
        if !placed.is_empty() {
            debug!(to = %plate.id(), placed = placed.len(), "placed missing samples");
        }

        let mapping = build_sample_map(from, &plate, samples)?;
        if !mapping.is_complete() {
            return Err(TransferError::UnresolvedSamples(mapping.unresolved));
        }

        let mut records = Vec::with_capacity(mapping.map.len());
        for entry in mapping.map.iter() {
            let from_part = from
                .part_at(entry.source)?
                .ok_or(TransferError::EmptySlot(entry.source))?;
            let to_part = plate
                .part_at(entry.destination)?
                .ok_or(TransferError::EmptySlot(entry.destination))?;
            records.push(TransferRecord {
                from_part: from_part.id,
                to_part: to_part.id,
                from_plate: from.id(),
                to_plate: plate.id(),
                source: entry.source,
                destination: entry.destination,
                volume,
            });
        }

        let outcome = TransferOutcome {
            from_plate: from.id(),
            to_plate: plate.id(),
            map: mapping.map,
            records,
            placed,
        };
        Ok(StagedTransfer { plate, outcome })
    }

    fn commit(
        &mut self,
        outcome: TransferOutcome,
        provenance: &mut ProvenanceGraph,
        ledger: &mut TransferLedger,
    ) -> TransferOutcome {
        let container_edges = usize::from(provenance.add_edge(
            EntityRef::Plate(outcome.from_plate),
            EntityRef::Plate(outcome.to_plate),
            EdgeKind::Container,
        ));

        let mut part_edges = 0;
        for record in &outcome.records {
            ledger.record(*record);
            if provenance.add_edge(
                EntityRef::Part(record.from_part),
                EntityRef::Part(record.to_part),
                EdgeKind::Part,
            ) {
                part_edges += 1;
            }
        }

        self.metrics
            .record_transfer(outcome.records.len(), part_edges, container_edges);
        info!(
            from = %outcome.from_plate,
            to = %outcome.to_plate,
            records = outcome.records.len(),
            placed = outcome.placed.len(),
            "transfer committed"
        );
        outcome
    }
}
