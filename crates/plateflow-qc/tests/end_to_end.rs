//! End-to-end: populate a stock plate, transfer to a working plate, measure,
//! evaluate and push results back upstream.

use plateflow_domain::{
    EdgeKind, EntityRef, FillOrder, MeasurementKey, MeasurementStore, Plate, ProvenanceGraph,
    QcStatus, SampleId, WellAddress,
};
use plateflow_qc::gate::{require_status, validate_batch};
use plateflow_qc::{QcConfig, QcEvaluator, StandardCurve, StandardPoint};
use plateflow_transfer::{TransferLedger, TransferPlanner, Volume};

struct Run {
    stock: Plate,
    working: Plate,
    samples: Vec<SampleId>,
    provenance: ProvenanceGraph,
    ledger: TransferLedger,
}

fn run_transfer() -> Run {
    let samples: Vec<SampleId> = (0..10).map(|_| SampleId::new()).collect();
    let mut stock = Plate::new(8, 12).unwrap();
    stock.fill_samples(&samples, FillOrder::ColumnMajor).unwrap();

    let mut working = Plate::new(8, 12).unwrap();
    let mut provenance = ProvenanceGraph::new();
    let mut ledger = TransferLedger::new();
    TransferPlanner::default_config()
        .execute_transfer(
            &stock,
            &mut working,
            &samples,
            Volume::microliters(20.0),
            &mut provenance,
            &mut ledger,
        )
        .unwrap();

    Run {
        stock,
        working,
        samples,
        provenance,
        ledger,
    }
}

#[test]
fn test_transfer_measure_evaluate() {
    let run = run_transfer();
    assert!(validate_batch(&run.samples, QcConfig::default().max_batch_inputs).is_ok());

    assert_eq!(run.ledger.len(), 10);
    assert_eq!(run.provenance.edges_of_kind(EdgeKind::Part).count(), 10);
    assert_eq!(run.provenance.edges_of_kind(EdgeKind::Container).count(), 1);

    let first = run.working.part_at(WellAddress::new(0, 0)).unwrap().unwrap().id;
    let second = run.working.part_at(WellAddress::new(1, 0)).unwrap().unwrap().id;

    let mut store = MeasurementStore::new();
    store.record(first, MeasurementKey::Concentration, 40.0);
    store.record(second, MeasurementKey::Concentration, 60.0);

    let evaluator = QcEvaluator::rna_default();
    let report = evaluator.evaluate(&run.working, &mut store);

    assert_eq!(report.wells.len(), 10);
    assert_eq!(store.status(first), QcStatus::Margin);
    assert_eq!(store.status(second), QcStatus::Pass);
    assert_eq!(report.count(QcStatus::Unknown), 8);
    assert_eq!(report.overall(), QcStatus::Margin);

    assert!(require_status(&[second], QcStatus::Pass, &store).is_ok());
    assert!(require_status(&[first, second], QcStatus::Pass, &store).is_err());
}

#[test]
fn test_measurements_reach_stock_parts() {
    let run = run_transfer();
    let address = run.working.find(run.samples[4])[0];
    let working_part = run.working.part_at(address).unwrap().unwrap().id;
    let stock_part = run
        .stock
        .part_at(run.stock.find(run.samples[4])[0])
        .unwrap()
        .unwrap()
        .id;

    let mut store = MeasurementStore::new();
    store.record(working_part, MeasurementKey::Concentration, 72.5);

    let written = QcEvaluator::rna_default().propagate(&run.working, &run.provenance, &mut store);
    assert_eq!(written, 1);
    assert_eq!(store.get(stock_part, MeasurementKey::Concentration), Some(72.5));
    assert!(run
        .provenance
        .ancestors(EntityRef::Part(working_part))
        .contains(&EntityRef::Part(stock_part)));
}

#[test]
fn test_calibrated_concentrations_feed_evaluation() {
    let run = run_transfer();
    let curve = StandardCurve::from_standards(
        StandardPoint::new(1000.0, 10000.0),
        StandardPoint::new(0.0, 0.0),
    )
    .unwrap();

    let mut store = MeasurementStore::new();
    let parts: Vec<_> = run.working.parts().map(|(_, part)| part.id).collect();
    // 6000 * 0.1 * 100 / 1000 = 60 ng/ul
    store.record(parts[0], MeasurementKey::Fluorescence, 6000.0);
    // 1000 * 0.1 * 100 / 1000 = 10 ng/ul
    store.record(parts[1], MeasurementKey::Fluorescence, 1000.0);

    assert_eq!(curve.apply(&run.working, &mut store), 2);
    let report = QcEvaluator::rna_default().evaluate(&run.working, &mut store);

    assert_eq!(report.wells[0].status, QcStatus::Pass);
    assert_eq!(report.wells[1].status, QcStatus::Fail);
}

#[test]
fn test_report_serializes() {
    let run = run_transfer();
    let mut store = MeasurementStore::new();
    let report = QcEvaluator::rna_default().evaluate(&run.working, &mut store);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["wells"].as_array().map(Vec::len), Some(10));
    assert_eq!(json["wells"][0]["status"], "unknown");
    assert_eq!(json["wells"][0]["statuses"]["concentration"], "unknown");
}
