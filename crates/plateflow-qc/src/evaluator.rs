//! QC evaluation: classify measurements, combine per part, push values upstream

use crate::QcConfig;
use plateflow_domain::{
    EntityRef, MeasurementKey, MeasurementStore, PartId, Plate, PlateId, ProvenanceGraph,
    QcRange, QcStatus, SampleId, WellAddress,
};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// QC outcome for one occupied well
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WellQc {
    /// Well the part sits in
    pub address: WellAddress,
    /// Part evaluated
    pub part: PartId,
    /// Sample the part belongs to
    pub sample: SampleId,
    /// Status per evaluated key, before combination
    pub statuses: BTreeMap<MeasurementKey, QcStatus>,
    /// Combined status written to the store
    pub status: QcStatus,
}

/// QC outcome for a whole plate, in row-major well order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlateQcReport {
    /// Plate evaluated
    pub plate: PlateId,
    /// One entry per occupied well
    pub wells: Vec<WellQc>,
}

impl PlateQcReport {
    /// Worst status over the plate; `Unknown` for an empty plate
    pub fn overall(&self) -> QcStatus {
        QcEvaluator::combine(self.wells.iter().map(|well| well.status))
    }

    /// Number of wells with the given combined status
    pub fn count(&self, status: QcStatus) -> usize {
        self.wells.iter().filter(|well| well.status == status).count()
    }

    /// Parts with the given combined status, row-major
    pub fn parts_with(&self, status: QcStatus) -> Vec<PartId> {
        self.wells
            .iter()
            .filter(|well| well.status == status)
            .map(|well| well.part)
            .collect()
    }

    /// Entry for the part at `address`
    pub fn well(&self, address: WellAddress) -> Option<&WellQc> {
        self.wells.iter().find(|well| well.address == address)
    }
}

/// The QC evaluator reduces measurements to statuses
///
/// # Examples
///
/// ```
/// use plateflow_domain::{Interval, MeasurementKey, QcRange, QcStatus};
/// use plateflow_qc::QcEvaluator;
///
/// let range = QcRange::new(
///     MeasurementKey::Concentration,
///     Interval::new(50.0, 100.0),
///     Interval::new(30.0, 120.0),
/// );
/// assert_eq!(QcEvaluator::classify(Some(60.0), &range), QcStatus::Pass);
/// assert_eq!(QcEvaluator::classify(Some(40.0), &range), QcStatus::Margin);
/// assert_eq!(QcEvaluator::classify(None, &range), QcStatus::Unknown);
/// ```
#[derive(Debug, Clone, Default)]
pub struct QcEvaluator {
    config: QcConfig,
}

impl QcEvaluator {
    /// Create a new evaluator with the given configuration
    pub fn new(config: QcConfig) -> Self {
        Self { config }
    }

    /// Create an evaluator with the RNA preset
    pub fn rna_default() -> Self {
        Self::new(QcConfig::rna_default())
    }

    /// Get the configuration
    pub fn config(&self) -> &QcConfig {
        &self.config
    }

    /// Classify one value against its range
    ///
    /// Absent values are `Unknown`. The pass interval is checked first, then
    /// the margin interval; anything else fails.
    pub fn classify(value: Option<f64>, range: &QcRange) -> QcStatus {
        match value {
            None => QcStatus::Unknown,
            Some(v) if range.pass.contains(v) => QcStatus::Pass,
            Some(v) if range.margin.contains(v) => QcStatus::Margin,
            Some(_) => QcStatus::Fail,
        }
    }

    /// Combine statuses: fail > margin > pass > unknown
    ///
    /// An empty input is `Unknown`.
    pub fn combine<I>(statuses: I) -> QcStatus
    where
        I: IntoIterator<Item = QcStatus>,
    {
        statuses.into_iter().max().unwrap_or_default()
    }

    /// Evaluate the plate against the configured ranges
    pub fn evaluate(&self, plate: &Plate, store: &mut MeasurementStore) -> PlateQcReport {
        Self::evaluate_plate(plate, &self.config.ranges, store)
    }

    /// Evaluate every occupied well of `plate` against `ranges`
    ///
    /// The combined status of each part overwrites its status in `store`.
    pub fn evaluate_plate(
        plate: &Plate,
        ranges: &[QcRange],
        store: &mut MeasurementStore,
    ) -> PlateQcReport {
        let wells: Vec<WellQc> = plate
            .parts()
            .map(|(address, part)| {
                let statuses: BTreeMap<MeasurementKey, QcStatus> = ranges
                    .iter()
                    .map(|range| (range.key, Self::classify(store.get(part.id, range.key), range)))
                    .collect();
                let status = Self::combine(statuses.values().copied());
                WellQc {
                    address,
                    part: part.id,
                    sample: part.sample,
                    statuses,
                    status,
                }
            })
            .collect();

        for well in &wells {
            store.set_status(well.part, well.status);
        }

        let report = PlateQcReport {
            plate: plate.id(),
            wells,
        };
        info!(
            plate = %report.plate,
            wells = report.wells.len(),
            pass = report.count(QcStatus::Pass),
            margin = report.count(QcStatus::Margin),
            fail = report.count(QcStatus::Fail),
            "plate evaluated"
        );
        report
    }

    /// Copy the configured keys back to direct-source parts
    pub fn propagate(
        &self,
        plate: &Plate,
        provenance: &ProvenanceGraph,
        store: &mut MeasurementStore,
    ) -> usize {
        Self::propagate_to_sources(plate, &self.config.propagate_keys, provenance, store)
    }

    /// Copy measured values to the parts each part was directly derived from
    ///
    /// Only one hop is followed. A source part that already holds a value for
    /// a key keeps it, so when several derived parts share a source the first
    /// in row-major order wins. Returns the number of values written.
    pub fn propagate_to_sources(
        plate: &Plate,
        keys: &[MeasurementKey],
        provenance: &ProvenanceGraph,
        store: &mut MeasurementStore,
    ) -> usize {
        let mut written = 0;
        for (_, part) in plate.parts() {
            let sources: Vec<PartId> = provenance
                .direct_sources(EntityRef::Part(part.id))
                .into_iter()
                .filter_map(|entity| match entity {
                    EntityRef::Part(id) => Some(id),
                    _ => None,
                })
                .collect();
            if sources.is_empty() {
                continue;
            }

            for &key in keys {
                let Some(value) = store.get(part.id, key) else {
                    continue;
                };
                for &source in &sources {
                    if store.record_if_absent(source, key, value) {
                        written += 1;
                    } else {
                        debug!(part = %source, %key, "source already measured, kept");
                    }
                }
            }
        }

        debug!(plate = %plate.id(), written, "values propagated to sources");
        written
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plateflow_domain::{EdgeKind, FillOrder, Interval, Part};
    use proptest::prelude::*;

    fn concentration_range() -> QcRange {
        QcRange::new(
            MeasurementKey::Concentration,
            Interval::new(50.0, 100.0),
            Interval::new(30.0, 120.0),
        )
    }

    fn size_range() -> QcRange {
        QcRange::new(
            MeasurementKey::AverageSize,
            Interval::new(250.0, 400.0),
            Interval::new(200.0, 500.0),
        )
    }

    #[test]
    fn test_classify_boundaries() {
        let range = concentration_range();
        assert_eq!(QcEvaluator::classify(Some(50.0), &range), QcStatus::Pass);
        assert_eq!(QcEvaluator::classify(Some(100.0), &range), QcStatus::Pass);
        assert_eq!(QcEvaluator::classify(Some(30.0), &range), QcStatus::Margin);
        assert_eq!(QcEvaluator::classify(Some(120.0), &range), QcStatus::Margin);
        assert_eq!(QcEvaluator::classify(Some(29.9), &range), QcStatus::Fail);
        assert_eq!(QcEvaluator::classify(Some(f64::NAN), &range), QcStatus::Fail);
    }

    #[test]
    fn test_combine_precedence() {
        use QcStatus::*;
        assert_eq!(QcEvaluator::combine([Pass, Margin, Unknown]), Margin);
        assert_eq!(QcEvaluator::combine([Pass, Fail, Margin]), Fail);
        assert_eq!(QcEvaluator::combine([Unknown, Pass]), Pass);
        assert_eq!(QcEvaluator::combine([Unknown]), Unknown);
        assert_eq!(QcEvaluator::combine(Vec::new()), Unknown);
    }

    #[test]
    fn test_evaluate_plate_writes_combined_status() {
        let mut plate = Plate::new(2, 2).unwrap();
        plate
            .fill_samples(
                &[SampleId::from_value(1), SampleId::from_value(2), SampleId::from_value(3)],
                FillOrder::RowMajor,
            )
            .unwrap();
        let parts: Vec<PartId> = plate.parts().map(|(_, part)| part.id).collect();

        let mut store = MeasurementStore::new();
        store.record(parts[0], MeasurementKey::Concentration, 60.0);
        store.record(parts[0], MeasurementKey::AverageSize, 450.0);
        store.record(parts[1], MeasurementKey::Concentration, 10.0);

        let report =
            QcEvaluator::evaluate_plate(&plate, &[concentration_range(), size_range()], &mut store);

        assert_eq!(report.wells.len(), 3);
        let first = &report.wells[0];
        assert_eq!(first.statuses[&MeasurementKey::Concentration], QcStatus::Pass);
        assert_eq!(first.statuses[&MeasurementKey::AverageSize], QcStatus::Margin);
        assert_eq!(first.status, QcStatus::Margin);
        assert_eq!(report.wells[1].status, QcStatus::Fail);
        assert_eq!(report.wells[2].status, QcStatus::Unknown);

        assert_eq!(store.status(parts[0]), QcStatus::Margin);
        assert_eq!(store.status(parts[1]), QcStatus::Fail);
        assert_eq!(report.overall(), QcStatus::Fail);
        assert_eq!(report.parts_with(QcStatus::Fail), vec![parts[1]]);
    }

    #[test]
    fn test_evaluate_overwrites_previous_status() {
        let mut plate = Plate::new(1, 1).unwrap();
        let part = Part::new(SampleId::from_value(1));
        plate.place(WellAddress::new(0, 0), part).unwrap();

        let mut store = MeasurementStore::new();
        store.set_status(part.id, QcStatus::Fail);
        store.record(part.id, MeasurementKey::Concentration, 75.0);

        let evaluator = QcEvaluator::new(QcConfig {
            ranges: vec![concentration_range()],
            ..QcConfig::default()
        });
        evaluator.evaluate(&plate, &mut store);
        assert_eq!(store.status(part.id), QcStatus::Pass);
    }

    #[test]
    fn test_propagate_is_one_hop_and_first_write_wins() {
        let grandparent = Part::new(SampleId::from_value(1));
        let parent = Part::new(SampleId::from_value(1));
        let child_a = Part::new(SampleId::from_value(1));
        let child_b = Part::new(SampleId::from_value(1));

        let mut plate = Plate::new(1, 2).unwrap();
        plate.place(WellAddress::new(0, 0), child_a).unwrap();
        plate.place(WellAddress::new(0, 1), child_b).unwrap();

        let mut provenance = ProvenanceGraph::new();
        provenance.add_edge(grandparent.id.into(), parent.id.into(), EdgeKind::Part);
        provenance.add_edge(parent.id.into(), child_a.id.into(), EdgeKind::Part);
        provenance.add_edge(parent.id.into(), child_b.id.into(), EdgeKind::Part);

        let mut store = MeasurementStore::new();
        store.record(child_a.id, MeasurementKey::Concentration, 55.0);
        store.record(child_b.id, MeasurementKey::Concentration, 65.0);

        let written = QcEvaluator::propagate_to_sources(
            &plate,
            &[MeasurementKey::Concentration],
            &provenance,
            &mut store,
        );

        assert_eq!(written, 1);
        assert_eq!(store.get(parent.id, MeasurementKey::Concentration), Some(55.0));
        assert_eq!(store.get(grandparent.id, MeasurementKey::Concentration), None);
    }

    #[test]
    fn test_propagate_keeps_existing_source_value() {
        let source = Part::new(SampleId::from_value(1));
        let derived = Part::new(SampleId::from_value(1));
        let mut plate = Plate::new(1, 1).unwrap();
        plate.place(WellAddress::new(0, 0), derived).unwrap();

        let mut provenance = ProvenanceGraph::new();
        provenance.add_edge(source.id.into(), derived.id.into(), EdgeKind::Part);

        let mut store = MeasurementStore::new();
        store.record(source.id, MeasurementKey::Concentration, 80.0);
        store.record(derived.id, MeasurementKey::Concentration, 40.0);

        let evaluator = QcEvaluator::rna_default();
        assert_eq!(evaluator.propagate(&plate, &provenance, &mut store), 0);
        assert_eq!(store.get(source.id, MeasurementKey::Concentration), Some(80.0));
    }

    #[test]
    fn test_propagate_twice_changes_nothing() {
        let shared = Part::new(SampleId::from_value(1));
        let single = Part::new(SampleId::from_value(2));
        let derived = [
            Part::new(SampleId::from_value(1)),
            Part::new(SampleId::from_value(1)),
            Part::new(SampleId::from_value(2)),
        ];

        let mut plate = Plate::new(1, 3).unwrap();
        let mut provenance = ProvenanceGraph::new();
        for (column, part) in derived.iter().enumerate() {
            plate.place(WellAddress::new(0, column), *part).unwrap();
            let source = if column < 2 { shared } else { single };
            provenance.add_edge(source.id.into(), part.id.into(), EdgeKind::Part);
        }

        let mut store = MeasurementStore::new();
        let keys = [MeasurementKey::Concentration, MeasurementKey::AverageSize];
        for (i, part) in derived.iter().enumerate() {
            store.record(part.id, MeasurementKey::Concentration, 40.0 + i as f64 * 10.0);
            store.record(part.id, MeasurementKey::AverageSize, 300.0 + i as f64);
        }

        let first = QcEvaluator::propagate_to_sources(&plate, &keys, &provenance, &mut store);
        let shared_values = store.values_for(shared.id);
        let single_values = store.values_for(single.id);
        let second = QcEvaluator::propagate_to_sources(&plate, &keys, &provenance, &mut store);

        assert_eq!(first, 4);
        assert_eq!(second, 0);
        assert_eq!(store.values_for(shared.id), shared_values);
        assert_eq!(store.values_for(single.id), single_values);
        assert_eq!(store.get(shared.id, MeasurementKey::Concentration), Some(40.0));
        assert_eq!(store.get(single.id, MeasurementKey::AverageSize), Some(302.0));
    }

    mod proptests {
        use super::*;

        fn status() -> impl Strategy<Value = QcStatus> {
            prop_oneof![
                Just(QcStatus::Unknown),
                Just(QcStatus::Pass),
                Just(QcStatus::Margin),
                Just(QcStatus::Fail),
            ]
        }

        proptest! {
            #[test]
            fn test_combine_is_order_independent(mut statuses in prop::collection::vec(status(), 0..8)) {
                let forward = QcEvaluator::combine(statuses.clone());
                statuses.reverse();
                prop_assert_eq!(forward, QcEvaluator::combine(statuses));
            }

            #[test]
            fn test_unknown_never_overrides(statuses in prop::collection::vec(status(), 1..8)) {
                let combined = QcEvaluator::combine(statuses.clone());
                let mut with_unknown = statuses;
                with_unknown.push(QcStatus::Unknown);
                prop_assert_eq!(QcEvaluator::combine(with_unknown), combined);
            }

            #[test]
            fn test_pass_values_always_pass(value in 50.0f64..=100.0) {
                prop_assert_eq!(
                    QcEvaluator::classify(Some(value), &concentration_range()),
                    QcStatus::Pass
                );
            }
        }
    }
}
