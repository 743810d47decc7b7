use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline::{filesio, merge, report::BatchReport};

/// Merges all tables in a directory into one file, tagging each row with the
/// name of the file it came from.
#[derive(Args, Debug)]
pub struct Command {
    /// Directory containing the tables to merge.
    input_dir: PathBuf,

    /// File to write the merged table to. Its extension selects the format.
    output_file: PathBuf,

    /// Extension of the table files to merge.
    #[arg(long, default_value = filesio::DEFAULT_EXTENSION)]
    extension: String,
}

/// Runs the subcommand.
pub fn run(cmd: &Command) -> Result<BatchReport> {
    merge::merge_dir(&cmd.input_dir, &cmd.output_file, &cmd.extension)
}
