use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use pipeline::{batch::StageDirs, extract, profile::Profile, report::BatchReport};

use super::source::SourceArgs;

/// Extracts per-utility company record tables from each source document.
#[derive(Args, Debug)]
pub struct Command {
    /// Directory containing the source documents.
    input_dir: PathBuf,

    /// Directory to write `cleaned_{electric,gas}_rates_{year}.xlsx` files
    /// into.
    output_dir: PathBuf,

    #[command(flatten)]
    source: SourceArgs,
}

/// Runs the subcommand.
pub fn run(cmd: &Command, profile: &Profile) -> Result<BatchReport> {
    let source = cmd.source.build()?;
    let dirs = StageDirs::new(&cmd.input_dir, &cmd.output_dir);
    let report = extract::extract_dir(source.as_ref(), &dirs, &profile.classifier);

    if let Err(err) = source.close() {
        log::warn!("Failed to shut down page source: {err}");
    }
    report
}
