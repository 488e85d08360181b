//! Executes a manifest against the engine and collects the report.

use crate::error::{CliError, Result};
use crate::manifest::Manifest;
use plateflow_domain::{
    MeasurementKey, MeasurementStore, Plate, PlateId, ProvenanceGraph, QcStatus, SampleId,
};
use plateflow_ingest::parse_labelled;
use plateflow_qc::gate::validate_batch;
use plateflow_qc::{PlateQcReport, QcEvaluator, StandardCurve};
use plateflow_transfer::{TransferLedger, TransferMetrics, TransferPlanner, Volume};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

/// Outcome of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Final state of every plate
    pub plates: Vec<PlateSummary>,
    /// One entry per transfer step
    pub transfers: Vec<TransferSummary>,
    /// Values attached by measurement steps
    pub measurements_attached: usize,
    /// Concentrations derived by calibration steps
    pub concentrations_calculated: usize,
    /// One entry per evaluated plate
    pub qc: Vec<QcSummary>,
    /// Values copied back to source parts
    pub values_propagated: usize,
    /// Edges in the provenance graph at the end of the run
    pub provenance_edges: usize,
    /// Transfer planner counters
    pub metrics: TransferMetrics,
}

/// Final state of one plate.
#[derive(Debug, Clone, Serialize)]
pub struct PlateSummary {
    /// Manifest name
    pub name: String,
    /// Plate id
    pub id: PlateId,
    /// Rows
    pub rows: usize,
    /// Columns
    pub columns: usize,
    /// Occupied wells
    pub filled: usize,
}

/// One executed transfer.
#[derive(Debug, Clone, Serialize)]
pub struct TransferSummary {
    /// Source plate name
    pub from: String,
    /// Destination plate name
    pub to: String,
    /// Well-to-well records written
    pub records: usize,
    /// Samples newly placed on the destination
    pub placed: usize,
    /// Volume per well (ul)
    pub volume_ul: f64,
}

/// QC outcome of one plate.
#[derive(Debug, Clone, Serialize)]
pub struct QcSummary {
    /// Plate name
    pub plate: String,
    /// Worst status over the plate
    pub overall: QcStatus,
    /// Row-major per-well outcome
    pub wells: Vec<WellSummary>,
}

/// QC outcome of one well.
#[derive(Debug, Clone, Serialize)]
pub struct WellSummary {
    /// Well label, e.g. "B3"
    pub well: String,
    /// Sample name from the manifest
    pub sample: String,
    /// Combined status
    pub status: QcStatus,
    /// Values recorded for the part
    pub values: BTreeMap<MeasurementKey, f64>,
}

/// Counts shown after a successful check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    /// Plates declared
    pub plates: usize,
    /// Distinct sample names
    pub samples: usize,
    /// Transfer steps
    pub transfers: usize,
    /// Measurement and calibration steps
    pub measurements: usize,
}

struct NamedPlate {
    name: String,
    plate: Plate,
}

/// Runs a validated manifest.
pub struct Runner {
    manifest: Manifest,
    plates: Vec<NamedPlate>,
    index: HashMap<String, usize>,
    sample_ids: HashMap<String, SampleId>,
    sample_names: HashMap<SampleId, String>,
}

impl Runner {
    /// Validate the manifest and build its plates.
    ///
    /// A sample name maps to the same sample on every plate it appears on.
    pub fn new(manifest: Manifest) -> Result<Self> {
        manifest.validate()?;

        let mut runner = Self {
            plates: Vec::with_capacity(manifest.plates.len()),
            index: HashMap::new(),
            sample_ids: HashMap::new(),
            sample_names: HashMap::new(),
            manifest: Manifest::default(),
        };

        for spec in &manifest.plates {
            let mut plate = Plate::new(spec.rows, spec.columns)?;
            let samples: Vec<SampleId> = spec
                .samples
                .iter()
                .map(|name| runner.sample_id(name))
                .collect();
            let order = spec.fill_order.unwrap_or(manifest.transfer.fill_order);
            plate.fill_samples(&samples, order)?;

            runner.index.insert(spec.name.clone(), runner.plates.len());
            runner.plates.push(NamedPlate {
                name: spec.name.clone(),
                plate,
            });
        }

        for step in &manifest.transfers {
            for name in step.samples.iter().flatten() {
                if !runner.sample_ids.contains_key(name) {
                    return Err(CliError::Manifest(format!(
                        "transfer from '{}' names unknown sample '{}'",
                        step.from, name
                    )));
                }
            }
        }

        runner.manifest = manifest;
        Ok(runner)
    }

    /// Counts describing the manifest.
    pub fn summary(&self) -> CheckSummary {
        CheckSummary {
            plates: self.plates.len(),
            samples: self.sample_ids.len(),
            transfers: self.manifest.transfers.len(),
            measurements: self.manifest.measurements.len() + self.manifest.calibrations.len(),
        }
    }

    /// Run every step and report.
    pub fn execute(mut self) -> Result<RunReport> {
        let mut planner = TransferPlanner::new(self.manifest.transfer.clone());
        let evaluator = QcEvaluator::new(self.manifest.qc.clone());
        let mut provenance = ProvenanceGraph::new();
        let mut ledger = TransferLedger::new();
        let mut store = MeasurementStore::new();

        let mut transfers = Vec::with_capacity(self.manifest.transfers.len());
        for step in &self.manifest.transfers {
            let from = self.plates[self.position(&step.from)?].plate.clone();
            let samples = match &step.samples {
                Some(names) => names
                    .iter()
                    .filter_map(|name| self.sample_ids.get(name).copied())
                    .collect(),
                None => from.samples(),
            };
            validate_batch(&samples, self.manifest.qc.max_batch_inputs)?;

            let volume = step
                .volume_ul
                .map(Volume::microliters)
                .unwrap_or_else(|| planner.default_volume());
            let to_idx = self.position(&step.to)?;
            let outcome = planner.execute_transfer(
                &from,
                &mut self.plates[to_idx].plate,
                &samples,
                volume,
                &mut provenance,
                &mut ledger,
            )?;

            transfers.push(TransferSummary {
                from: step.from.clone(),
                to: step.to.clone(),
                records: outcome.records.len(),
                placed: outcome.placed.len(),
                volume_ul: volume.as_microliters(),
            });
        }

        let mut measurements_attached = 0;
        for step in &self.manifest.measurements {
            let plate = &self.plates[self.position(&step.plate)?].plate;
            let rows: Vec<(&str, String)> = step
                .values
                .iter()
                .map(|(label, value)| (label.as_str(), value.to_string()))
                .collect();
            let map = parse_labelled(step.key, &rows)?;
            measurements_attached += map.attach(plate, &mut store)?;
        }

        let mut concentrations_calculated = 0;
        for step in &self.manifest.calibrations {
            let plate = &self.plates[self.position(&step.plate)?].plate;
            let [a, b] = step.standards;
            let curve = StandardCurve::from_standards(a, b)?;
            concentrations_calculated += curve.apply(plate, &mut store);
        }

        let mut qc = Vec::with_capacity(self.manifest.evaluate.len());
        for name in &self.manifest.evaluate {
            let plate = &self.plates[self.position(name)?].plate;
            let report = evaluator.evaluate(plate, &mut store);
            qc.push(self.qc_summary(name, &report, &store));
        }

        let mut values_propagated = 0;
        for name in &self.manifest.propagate {
            let plate = &self.plates[self.position(name)?].plate;
            values_propagated += evaluator.propagate(plate, &provenance, &mut store);
        }

        info!(
            transfers = transfers.len(),
            records = ledger.len(),
            evaluated = qc.len(),
            "run complete"
        );

        Ok(RunReport {
            plates: self
                .plates
                .iter()
                .map(|named| PlateSummary {
                    name: named.name.clone(),
                    id: named.plate.id(),
                    rows: named.plate.rows(),
                    columns: named.plate.columns(),
                    filled: named.plate.filled_slots().len(),
                })
                .collect(),
            transfers,
            measurements_attached,
            concentrations_calculated,
            qc,
            values_propagated,
            provenance_edges: provenance.len(),
            metrics: planner.metrics().clone(),
        })
    }

    fn sample_id(&mut self, name: &str) -> SampleId {
        if let Some(id) = self.sample_ids.get(name) {
            return *id;
        }
        let id = SampleId::new();
        self.sample_ids.insert(name.to_string(), id);
        self.sample_names.insert(id, name.to_string());
        id
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| CliError::Manifest(format!("undeclared plate '{}'", name)))
    }

    fn qc_summary(&self, name: &str, report: &PlateQcReport, store: &MeasurementStore) -> QcSummary {
        let wells = report
            .wells
            .iter()
            .map(|well| WellSummary {
                well: well.address.to_string(),
                sample: self
                    .sample_names
                    .get(&well.sample)
                    .cloned()
                    .unwrap_or_else(|| well.sample.to_string()),
                status: well.status,
                values: store
                    .values_for(well.part)
                    .into_iter()
                    .map(|record| (record.key, record.value))
                    .collect(),
            })
            .collect();

        QcSummary {
            plate: name.to_string(),
            overall: report.overall(),
            wells,
        }
    }
}
