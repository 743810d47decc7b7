//! Extraction and normalization of utility rate tables from tariff filings.
//!
//! The stages run in order, each reading the previous stage's output files:
//! [extract] pulls company record tables out of documents, [clean] trims and
//! reorders them, [summary] drops survey summary rows, and [merge] combines
//! everything into one dataset. [batch::run_all] chains all four.

pub mod batch;
pub mod classify;
pub mod clean;
pub mod extract;
pub mod filesio;
pub mod merge;
pub mod pdf;
pub mod profile;
pub mod report;
pub mod summary;
pub mod table;
