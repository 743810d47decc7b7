use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline::{
    batch::{WorkDirs, run_all},
    profile::Profile,
    report::BatchReport,
};

use super::source::SourceArgs;

/// Runs every stage in order, keeping each stage's output under a working
/// directory.
///
/// Writes `extracted/`, `cleaned/`, `no_summary/` and `merged_rates.xlsx`
/// into the working directory.
#[derive(Args, Debug)]
pub struct Command {
    /// Directory containing the source documents.
    input_dir: PathBuf,

    /// Working directory for the stage outputs.
    work_dir: PathBuf,

    #[command(flatten)]
    source: SourceArgs,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, profile: &Profile) -> Result<BatchReport> {
    let source = cmd.source.build()?;
    let report = run_all(
        source.as_ref(),
        &cmd.input_dir,
        &WorkDirs::new(&cmd.work_dir),
        profile,
    );

    if let Err(err) = source.close() {
        log::warn!("Failed to shut down page source: {err}");
    }
    report
}
