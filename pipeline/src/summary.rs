//! Removal of survey summary rows from cleaned tables.

use std::path::Path;

use anyhow::Result;

use crate::{
    batch::{StageDirs, file_name_of, has_extension},
    clean::trim_whitespace,
    filesio,
    report::{BatchReport, ItemOutcome},
    table::{Table, TableError, Value, columns},
};

/// Company value of the summary rows in gas cost recovery filings.
pub const GCR_SUMMARY_MARKER: &str = "Gas Utilities Comparison - GCR Companies";

/// Trims whitespace from text cells, then removes the rows whose Company value
/// is exactly `marker`.
///
/// The match is literal, so company names merely containing the marker text
/// are kept. Fails if the table has no Company column.
pub fn drop_summary_rows(mut table: Table, marker: &str) -> Result<Table, TableError> {
    let company = table
        .column_index(columns::COMPANY)
        .ok_or(TableError::MissingColumn(columns::COMPANY))?;

    trim_whitespace(&mut table);
    table.retain_rows(|row| !matches!(&row[company], Some(Value::Text(s)) if s == marker));
    Ok(table)
}

/// Applies [drop_summary_rows] to every file with the given extension in
/// `dirs.input`, writing the results under the same names in `dirs.output`.
pub fn drop_summaries_dir(dirs: &StageDirs, marker: &str, extension: &str) -> Result<BatchReport> {
    let files = dirs.prepare(has_extension(extension))?;
    let mut report = BatchReport::new();

    for path in files {
        let outcome = match drop_summaries_file(&path, &dirs.output, marker) {
            Ok(outcome) => outcome,
            Err(err) => ItemOutcome::Failed(err),
        };
        report.record(&path, outcome, Vec::new());
    }

    Ok(report)
}

fn drop_summaries_file(path: &Path, output_dir: &Path, marker: &str) -> Result<ItemOutcome> {
    let table = filesio::read_table(path)?;
    let before = table.num_rows();
    let table = drop_summary_rows(table, marker)?;
    log::debug!(
        "{:?}: dropped {} summary rows.",
        path,
        before - table.num_rows()
    );

    let out_path = output_dir.join(file_name_of(path));
    filesio::write_table(&out_path, &table)?;
    Ok(ItemOutcome::Written {
        outputs: vec![out_path],
    })
}
