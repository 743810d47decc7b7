use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline::{batch::StageDirs, clean, filesio, profile::Profile, report::BatchReport};

/// Trims boilerplate, drops empty columns and sparse rows, and reorders the
/// columns of each extracted table.
#[derive(Args, Debug)]
pub struct Command {
    /// Directory containing the extracted tables.
    input_dir: PathBuf,

    /// Directory to write the cleaned tables into, under the same names.
    output_dir: PathBuf,

    /// Extension of the table files to clean.
    #[arg(long, default_value = filesio::DEFAULT_EXTENSION)]
    extension: String,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, profile: &Profile) -> Result<BatchReport> {
    clean::clean_dir(
        &StageDirs::new(&cmd.input_dir, &cmd.output_dir),
        &profile.layout,
        &cmd.extension,
    )
}
