//! Metrics collection for transfer operations

use serde::Serialize;

/// Counters collected by the transfer planner
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransferMetrics {
    /// Plate-to-plate transfers committed
    pub transfers_executed: usize,

    /// Well-to-well records written
    pub records_written: usize,

    /// New part-level provenance edges
    pub part_edges: usize,

    /// New container-level provenance edges
    pub container_edges: usize,

    /// Plates filled by `make_and_populate`
    pub plates_populated: usize,

    /// Transfers aborted because samples could not be located
    pub aborted_transfers: usize,
}

impl TransferMetrics {
    /// Create new empty metrics
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a committed transfer
    pub fn record_transfer(&mut self, records: usize, part_edges: usize, container_edges: usize) {
        self.transfers_executed += 1;
        self.records_written += records;
        self.part_edges += part_edges;
        self.container_edges += container_edges;
    }

    /// Record container edges written outside a transfer (relabelling)
    pub fn record_edges(&mut self, part_edges: usize, container_edges: usize) {
        self.part_edges += part_edges;
        self.container_edges += container_edges;
    }

    /// Record plates filled with samples
    pub fn record_populated(&mut self, plates: usize) {
        self.plates_populated += plates;
    }

    /// Record an aborted transfer
    pub fn record_abort(&mut self) {
        self.aborted_transfers += 1;
    }

    /// Reset all metrics
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Generate a summary report of metrics
    pub fn summary(&self) -> String {
        [
            "Transfer Metrics Summary".to_string(),
            "========================".to_string(),
            format!("Transfers executed: {}", self.transfers_executed),
            format!("Records written: {}", self.records_written),
            format!("Part edges: {}", self.part_edges),
            format!("Container edges: {}", self.container_edges),
            format!("Plates populated: {}", self.plates_populated),
            format!("Aborted transfers: {}", self.aborted_transfers),
        ]
        .join("\n")
    }
}
