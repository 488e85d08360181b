//! Check command implementation.

use crate::cli::ManifestArgs;
use crate::error::Result;
use crate::manifest::Manifest;
use crate::output::Formatter;
use crate::runner::Runner;

/// Execute the check command.
pub fn execute_check(args: ManifestArgs, formatter: &Formatter) -> Result<()> {
    let manifest = Manifest::load(&args.manifest)?;
    let runner = Runner::new(manifest)?;

    println!("{}", formatter.format_check(&runner.summary())?);

    Ok(())
}
