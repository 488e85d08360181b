//! Plateflow CLI - Run plate transfer and QC manifests.

use clap::Parser;
use plateflow_cli::commands;
use plateflow_cli::{Cli, Command, Formatter};
use tracing_subscriber::EnvFilter;

fn main() {
    // Log to stderr so stdout carries only the report
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> plateflow_cli::Result<()> {
    let cli = Cli::parse();
    let formatter = Formatter::new(cli.format, !cli.no_color);

    match cli.command {
        Command::Run(args) => commands::execute_run(args, &formatter)?,
        Command::Check(args) => commands::execute_check(args, &formatter)?,
    }

    Ok(())
}
