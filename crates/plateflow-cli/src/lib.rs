//! Plateflow CLI library.
//!
//! This library provides the core functionality for the `plateflow` command-line
//! interface: manifest loading, run execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod error;
pub mod manifest;
pub mod output;
pub mod runner;

pub use cli::{Cli, Command};
pub use error::{CliError, Result};
pub use manifest::Manifest;
pub use output::Formatter;
pub use runner::{RunReport, Runner};
