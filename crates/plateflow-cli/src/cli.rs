//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plateflow CLI - Run plate transfer and QC manifests.
#[derive(Debug, Parser)]
#[command(name = "plateflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Execute every step of a run manifest and print the report
    Run(ManifestArgs),

    /// Validate a run manifest without executing it
    Check(ManifestArgs),
}

/// Arguments naming a manifest file.
#[derive(Debug, Parser)]
pub struct ManifestArgs {
    /// Path to the TOML run manifest
    pub manifest: PathBuf,
}
