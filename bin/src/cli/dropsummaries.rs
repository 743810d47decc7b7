use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline::{batch::StageDirs, filesio, profile::Profile, report::BatchReport, summary};

/// Removes survey summary rows from each cleaned table.
#[derive(Args, Debug)]
pub struct Command {
    /// Directory containing the cleaned tables.
    input_dir: PathBuf,

    /// Directory to write the filtered tables into, under the same names.
    output_dir: PathBuf,

    /// Extension of the table files to filter.
    #[arg(long, default_value = filesio::DEFAULT_EXTENSION)]
    extension: String,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, profile: &Profile) -> Result<BatchReport> {
    summary::drop_summaries_dir(
        &StageDirs::new(&cmd.input_dir, &cmd.output_dir),
        &profile.summary_marker,
        &cmd.extension,
    )
}
