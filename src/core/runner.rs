//! Application runner logic
//!
//! Resolves the settings, sets up logging and drives the pipeline over the
//! fonts named on the command line.

use crate::core::cli::CliArgs;
use crate::logging;
use crate::pipeline::{Outcome, Pipeline};
use anyhow::{bail, Result};
use tracing::info;

/// Run the patcher with the given CLI arguments.
///
/// Configuration problems are returned before any font is opened. Failures
/// of individual fonts are logged as they happen; the run then ends with an
/// error if any font failed.
pub fn run_app(cli_args: CliArgs) -> Result<()> {
    let _log_guard = logging::init(cli_args.verbose, cli_args.log_file)?;

    let file = cli_args.load_config_file()?;
    let (config, output) = cli_args.resolve(file)?;
    let pipeline = Pipeline::new(config, output)?;

    let summary = pipeline.run(&cli_args.fonts);
    for (source, outcome) in &summary.outcomes {
        match outcome {
            Outcome::Written { path, full_name } => {
                info!(source = %source.display(), "{full_name} -> {}", path.display());
            }
            Outcome::Preview(lines) => {
                println!("{}", source.display());
                for line in lines {
                    println!("  {line}");
                }
            }
        }
    }

    if !summary.is_success() {
        bail!(
            "{} of {} font resources failed",
            summary.failures.len(),
            summary.failures.len() + summary.outcomes.len()
        );
    }
    Ok(())
}
