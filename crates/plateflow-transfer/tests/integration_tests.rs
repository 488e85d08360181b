//! Integration tests for the transfer planner
//!
//! These walk plates through several consecutive steps the way a protocol
//! run does and check the lineage that results.

use plateflow_domain::{
    EdgeKind, EntityRef, FillOrder, Plate, PlateFormat, ProvenanceGraph, SampleId, WellAddress,
};
use plateflow_transfer::{
    common_samples, TransferConfig, TransferError, TransferLedger, TransferPlanner, Volume,
};

fn samples(n: usize) -> Vec<SampleId> {
    (0..n).map(|_| SampleId::new()).collect()
}

#[test]
fn test_two_step_lineage_reaches_stock_parts() {
    let ids = samples(12);
    let mut planner = TransferPlanner::default_config();
    let mut factory = PlateFormat::WELLS_96;
    let mut provenance = ProvenanceGraph::new();
    let mut ledger = TransferLedger::new();

    let plates = planner
        .make_and_populate(&ids, &mut factory, None, FillOrder::ColumnMajor)
        .unwrap();
    let stock = &plates[0];

    let mut working = Plate::new(8, 12).unwrap();
    planner
        .transfer_all(stock, &mut working, Volume::microliters(20.0), &mut provenance, &mut ledger)
        .unwrap();

    let mut library = Plate::new(8, 12).unwrap();
    planner
        .transfer_all(&working, &mut library, Volume::microliters(5.0), &mut provenance, &mut ledger)
        .unwrap();

    let address = library.find(ids[3])[0];
    let library_part = library.part_at(address).unwrap().unwrap().id;
    let stock_part = stock.part_at(stock.find(ids[3])[0]).unwrap().unwrap().id;

    let ancestors = provenance.ancestors(EntityRef::Part(library_part));
    assert_eq!(ancestors.len(), 2);
    assert!(ancestors.contains(&EntityRef::Part(stock_part)));

    let plate_descendants = provenance.descendants(EntityRef::Plate(stock.id()));
    assert!(plate_descendants.contains(&EntityRef::Plate(library.id())));

    assert_eq!(ledger.len(), 24);
    assert_eq!(planner.metrics().transfers_executed, 2);
}

#[test]
fn test_row_wise_config_changes_placement() {
    let ids = samples(3);
    let mut source = Plate::new(8, 12).unwrap();
    source.fill_samples(&ids, FillOrder::ColumnMajor).unwrap();
    let mut destination = Plate::new(8, 12).unwrap();

    let mut planner = TransferPlanner::new(TransferConfig::row_wise());
    planner
        .execute_transfer(
            &source,
            &mut destination,
            &ids,
            Volume::microliters(20.0),
            &mut ProvenanceGraph::new(),
            &mut TransferLedger::new(),
        )
        .unwrap();

    assert_eq!(destination.find(ids[2]), vec![WellAddress::new(0, 2)]);
}

#[test]
fn test_transfer_of_common_samples_only() {
    let ids = samples(4);
    let mut source = Plate::new(2, 2).unwrap();
    source.fill_samples(&ids, FillOrder::RowMajor).unwrap();
    let mut destination = Plate::new(2, 2).unwrap();
    destination.fill_samples(&[ids[1], ids[3]], FillOrder::RowMajor).unwrap();

    let shared = common_samples(&source, &destination);
    assert_eq!(shared, vec![ids[1], ids[3]]);

    let outcome = TransferPlanner::default_config()
        .execute_transfer(
            &source,
            &mut destination,
            &shared,
            Volume::microliters(10.0),
            &mut ProvenanceGraph::new(),
            &mut TransferLedger::new(),
        )
        .unwrap();
    assert!(outcome.placed.is_empty());
    assert_eq!(outcome.records.len(), 2);
}

#[test]
fn test_unresolved_error_names_every_missing_sample() {
    let ids = samples(3);
    let source = Plate::new(2, 2).unwrap();
    let mut destination = Plate::new(2, 2).unwrap();
    let mut provenance = ProvenanceGraph::new();

    let err = TransferPlanner::default_config()
        .execute_transfer(
            &source,
            &mut destination,
            &ids,
            Volume::microliters(20.0),
            &mut provenance,
            &mut TransferLedger::new(),
        )
        .unwrap_err();

    assert_eq!(err, TransferError::UnresolvedSamples(ids.clone()));
    assert!(err.to_string().starts_with("3 sample(s)"));
    assert_eq!(provenance.edges_of_kind(EdgeKind::Container).count(), 0);
}

#[test]
fn test_outcome_serializes_for_audit() {
    let ids = samples(1);
    let mut source = Plate::new(1, 1).unwrap();
    source.fill_samples(&ids, FillOrder::RowMajor).unwrap();
    let mut destination = Plate::new(1, 1).unwrap();

    let outcome = TransferPlanner::default_config()
        .transfer_all(
            &source,
            &mut destination,
            Volume::microliters(20.0),
            &mut ProvenanceGraph::new(),
            &mut TransferLedger::new(),
        )
        .unwrap();

    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["records"][0]["volume"], 20.0);
    assert_eq!(json["map"][0]["destination"]["row"], 0);
}
