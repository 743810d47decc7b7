//! Directory-level drivers shared by the stages, and the chained run of all
//! stages.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::{
    clean, extract, filesio, merge,
    pdf::PageSource,
    profile::Profile,
    report::BatchReport,
    summary,
};

/// Input and output directories of one stage.
#[derive(Clone, Debug)]
pub struct StageDirs {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl StageDirs {
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Lists the stage's input files and creates its output directory.
    pub(crate) fn prepare<F>(&self, accept: F) -> Result<Vec<PathBuf>>
    where
        F: Fn(&Path) -> bool,
    {
        let files = list_files(&self.input, accept)?;
        filesio::create_dir(&self.output)?;
        Ok(files)
    }
}

/// Lists the files directly inside `dir` for which `accept` returns `true`,
/// sorted by file name.
pub fn list_files<F>(dir: &Path, accept: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    let mut files = Vec::new();
    for entry in walkdir::WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("listing directory {:?}", dir))?;
        if entry.file_type().is_file() && accept(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Returns a predicate accepting paths with the given extension,
/// case-insensitively.
pub fn has_extension(extension: &str) -> impl Fn(&Path) -> bool + '_ {
    move |path: &Path| {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

/// Returns the final path component as a string, or the empty string.
pub(crate) fn file_name_of(path: &Path) -> &str {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default()
}

/// Locations used by [run_all], all under one working directory.
#[derive(Clone, Debug)]
pub struct WorkDirs {
    pub extracted: PathBuf,
    pub cleaned: PathBuf,
    pub no_summary: PathBuf,
    pub merged_file: PathBuf,
}

impl WorkDirs {
    pub fn new(work_dir: &Path) -> Self {
        Self {
            extracted: work_dir.join("extracted"),
            cleaned: work_dir.join("cleaned"),
            no_summary: work_dir.join("no_summary"),
            merged_file: work_dir.join("merged_rates.xlsx"),
        }
    }
}

/// Runs every stage in order over the documents in `input_dir`.
///
/// Each stage only starts once the previous one has finished. Item failures
/// are recorded in the returned report and do not stop later stages.
pub fn run_all(
    source: &dyn PageSource,
    input_dir: &Path,
    work: &WorkDirs,
    profile: &Profile,
) -> Result<BatchReport> {
    let mut report = BatchReport::new();

    log::info!("Extracting tables from {:?}.", input_dir);
    report.extend(
        extract::extract_dir(
            source,
            &StageDirs::new(input_dir, &work.extracted),
            &profile.classifier,
        )
        .context("extracting tables")?,
    );

    log::info!("Cleaning tables into {:?}.", work.cleaned);
    report.extend(
        clean::clean_dir(
            &StageDirs::new(&work.extracted, &work.cleaned),
            &profile.layout,
            filesio::DEFAULT_EXTENSION,
        )
        .context("cleaning tables")?,
    );

    log::info!("Dropping summary rows into {:?}.", work.no_summary);
    report.extend(
        summary::drop_summaries_dir(
            &StageDirs::new(&work.cleaned, &work.no_summary),
            &profile.summary_marker,
            filesio::DEFAULT_EXTENSION,
        )
        .context("dropping summary rows")?,
    );

    log::info!("Merging tables into {:?}.", work.merged_file);
    report.extend(
        merge::merge_dir(
            &work.no_summary,
            &work.merged_file,
            filesio::DEFAULT_EXTENSION,
        )
        .context("merging tables")?,
    );

    Ok(report)
}
