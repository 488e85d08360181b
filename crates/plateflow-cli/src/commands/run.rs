//! Run command implementation.

use crate::cli::ManifestArgs;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::output::Formatter;
use crate::runner::Runner;
use tracing::info;

/// Execute the run command.
pub fn execute_run(args: ManifestArgs, formatter: &Formatter) -> Result<()> {
    info!(manifest = %args.manifest.display(), "loading manifest");
    let manifest = Manifest::load(&args.manifest)?;
    let report = Runner::new(manifest)?.execute()?;

    println!("{}", formatter.format_report(&report)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliFormat;
    use std::io::Write;

    #[test]
    fn test_run_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            [[plates]]
            name = "stock"
            samples = ["S1", "S2"]

            [[plates]]
            name = "working"

            [[transfers]]
            from = "stock"
            to = "working"
            "#
        )
        .unwrap();

        let args = ManifestArgs {
            manifest: file.path().to_path_buf(),
        };
        let formatter = Formatter::new(CliFormat::Json, false);
        assert!(execute_run(args, &formatter).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = ManifestArgs {
            manifest: dir.path().join("absent.toml"),
        };
        let formatter = Formatter::new(CliFormat::Table, false);
        assert!(matches!(
            execute_run(args, &formatter),
            Err(crate::error::CliError::Io(_))
        ));
    }
}
