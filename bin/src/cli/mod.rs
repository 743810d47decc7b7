use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use simplelog::LevelFilter;

use pipeline::{profile::Profile, report::BatchReport};

mod clean;
mod dropsummaries;
mod extract;
mod merge;
mod runall;
mod source;

/// Extracts utility rate tables from tariff filings and normalizes them into
/// one dataset.
#[derive(Parser, Debug)]
#[command(name = "tariffrates")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Logging level.
    #[arg(long, default_value = "Warn")]
    log_level: LevelFilter,

    /// YAML file overriding the built-in classifier rules, layout profile,
    /// and summary marker.
    #[arg(long)]
    profile: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    Extract(extract::Command),
    Clean(clean::Command),
    DropSummaries(dropsummaries::Command),
    Merge(merge::Command),
    RunAll(runall::Command),
}

pub fn run() -> Result<()> {
    let args = Args::parse();

    simplelog::SimpleLogger::init(args.log_level, simplelog::Config::default())
        .with_context(|| "configuring logging")?;

    let report = dispatch(&args)?;
    eprintln!("{}", report.summary());
    Ok(())
}

fn dispatch(args: &Args) -> Result<BatchReport> {
    let profile = match &args.profile {
        Some(path) => Profile::load(path)?,
        None => Profile::default(),
    };

    use Command::*;
    match &args.command {
        Extract(cmd) => extract::run(cmd, &profile),
        Clean(cmd) => clean::run(cmd, &profile),
        DropSummaries(cmd) => dropsummaries::run(cmd, &profile),
        Merge(cmd) => merge::run(cmd),
        RunAll(cmd) => runall::run(cmd, &profile),
    }
}
