//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use crate::runner::{CheckSummary, QcSummary, RunReport};
use colored::*;
use plateflow_domain::QcStatus;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: CliFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a run report.
    pub fn format_report(&self, report: &RunReport) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            CliFormat::Table => Ok(self.format_report_table(report)),
        }
    }

    /// Format the result of a successful check.
    pub fn format_check(&self, summary: &CheckSummary) -> Result<String> {
        match self.format {
            CliFormat::Json => Ok(serde_json::to_string_pretty(summary)?),
            CliFormat::Table => Ok(self.success(&format!(
                "Manifest OK: {} plate(s), {} sample(s), {} transfer(s), {} measurement step(s)",
                summary.plates, summary.samples, summary.transfers, summary.measurements
            ))),
        }
    }

    fn format_report_table(&self, report: &RunReport) -> String {
        let mut sections = Vec::new();

        let mut plates = Builder::default();
        plates.push_record(["Plate", "Size", "Filled", "ID"]);
        for plate in &report.plates {
            plates.push_record([
                plate.name.clone(),
                format!("{}x{}", plate.rows, plate.columns),
                plate.filled.to_string(),
                plate.id.to_string()[..8].to_string(), // Truncate ID for readability
            ]);
        }
        sections.push(styled(plates));

        if !report.transfers.is_empty() {
            let mut transfers = Builder::default();
            transfers.push_record(["From", "To", "Records", "Placed", "Volume (ul)"]);
            for transfer in &report.transfers {
                transfers.push_record([
                    transfer.from.clone(),
                    transfer.to.clone(),
                    transfer.records.to_string(),
                    transfer.placed.to_string(),
                    transfer.volume_ul.to_string(),
                ]);
            }
            sections.push(styled(transfers));
        }

        for qc in &report.qc {
            sections.push(self.format_qc(qc));
        }

        sections.push(self.info(&format!(
            "{} measurement(s) attached, {} concentration(s) calculated, {} value(s) propagated, {} provenance edge(s)",
            report.measurements_attached,
            report.concentrations_calculated,
            report.values_propagated,
            report.provenance_edges
        )));

        sections.join("\n\n")
    }

    fn format_qc(&self, qc: &QcSummary) -> String {
        let heading = format!("QC {}: {}", qc.plate, self.status(qc.overall));
        if qc.wells.is_empty() {
            return format!("{}\n{}", heading, self.warning("No occupied wells."));
        }

        let mut wells = Builder::default();
        wells.push_record(["Well", "Sample", "Status", "Values"]);
        for well in &qc.wells {
            let values = well
                .values
                .iter()
                .map(|(key, value)| format!("{}={}", key, value))
                .collect::<Vec<_>>()
                .join(", ");
            wells.push_record([
                well.well.clone(),
                well.sample.clone(),
                well.status.to_string(),
                values,
            ]);
        }
        format!("{}\n{}", heading, styled(wells))
    }

    /// Format a QC status, colored by severity.
    pub fn status(&self, status: QcStatus) -> String {
        let color = match status {
            QcStatus::Pass => "green",
            QcStatus::Margin => "yellow",
            QcStatus::Fail => "red",
            QcStatus::Unknown => "",
        };
        self.colorize(status.as_str(), color)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

fn styled(builder: Builder) -> String {
    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));
    table.to_string()
}
