//! Per-item outcomes of a batch run.
//!
//! Batch drivers never abort on a single bad document or file. Each item's
//! result is recorded as an [ItemOutcome] in a [BatchReport] instead.

use std::{
    fmt::{self, Display},
    path::{Path, PathBuf},
};

/// Describes the outcome of processing a single item.
#[derive(Debug)]
pub enum ItemOutcome {
    /// Item processed, and the given files were written.
    Written { outputs: Vec<PathBuf> },
    /// Item read as an input to a combined output.
    Merged { rows: usize },
    /// Item processed, but yielded nothing to write.
    NoData,
    /// Item was not processed.
    Skipped { reason: String },
    /// Processing the item failed.
    Failed(anyhow::Error),
}

/// NOTE: the equality comparison regards two [ItemOutcome::Failed] values as
/// equal regardless of the underlying errors.
impl PartialEq for ItemOutcome {
    fn eq(&self, other: &Self) -> bool {
        use ItemOutcome::*;
        match (self, other) {
            (Written { outputs: a }, Written { outputs: b }) => a == b,
            (Merged { rows: a }, Merged { rows: b }) => a == b,
            (NoData, NoData) => true,
            (Skipped { reason: a }, Skipped { reason: b }) => a == b,
            (Failed(_), Failed(_)) => true,
            _ => false,
        }
    }
}

/// Outcome of one item, with any non-fatal warnings raised while processing
/// it.
#[derive(Debug, PartialEq)]
pub struct ItemReport {
    pub item: PathBuf,
    pub outcome: ItemOutcome,
    pub warnings: Vec<String>,
}

/// Outcomes of all items of one stage run, in processing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub items: Vec<ItemReport>,
}

impl BatchReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an outcome, logging it at a level matching its severity.
    pub fn record(&mut self, item: &Path, outcome: ItemOutcome, warnings: Vec<String>) {
        match &outcome {
            ItemOutcome::Written { outputs } => {
                for output in outputs {
                    log::info!("{:?}: wrote {:?}", item, output);
                }
            }
            ItemOutcome::Merged { rows } => log::debug!("{:?}: read {} rows", item, rows),
            ItemOutcome::NoData => log::info!("{:?}: no usable data", item),
            ItemOutcome::Skipped { reason } => log::warn!("{:?}: skipped: {}", item, reason),
            ItemOutcome::Failed(err) => log::warn!("{:?}: failed: {:?}", item, err),
        }

        self.items.push(ItemReport {
            item: item.to_owned(),
            outcome,
            warnings,
        });
    }

    /// Appends the items of another report.
    pub fn extend(&mut self, other: BatchReport) {
        self.items.extend(other.items);
    }

    pub fn outcome_for(&self, item: &Path) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|report| report.item == item)
            .map(|report| &report.outcome)
    }

    pub fn summary(&self) -> BatchSummary {
        let mut summary = BatchSummary::default();
        for report in &self.items {
            match &report.outcome {
                ItemOutcome::Written { outputs } => summary.written += outputs.len(),
                ItemOutcome::Merged { .. } => summary.merged += 1,
                ItemOutcome::NoData => summary.no_data += 1,
                ItemOutcome::Skipped { .. } => summary.skipped += 1,
                ItemOutcome::Failed(_) => summary.failed += 1,
            }
            summary.warnings += report.warnings.len();
        }
        summary
    }
}

/// Counts of outcomes in a [BatchReport].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct BatchSummary {
    /// Number of files written.
    pub written: usize,
    pub merged: usize,
    pub no_data: usize,
    pub skipped: usize,
    pub failed: usize,
    pub warnings: usize,
}

impl Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} files written, {} merged inputs, {} without data, {} skipped, {} failed, {} warnings",
            self.written, self.merged, self.no_data, self.skipped, self.failed, self.warnings,
        )
    }
}
