//! Normalizes extracted company record tables into the canonical layout.

use std::path::Path;

use anyhow::Result;

use crate::{
    batch::{StageDirs, file_name_of, has_extension},
    filesio,
    profile::{LayoutProfile, TrimRanges},
    report::{BatchReport, ItemOutcome},
    table::{Table, Value, columns},
};

/// Rows with a larger fraction of missing cells than this are dropped.
pub const MAX_MISSING_FRACTION: f64 = 0.75;

/// Columns moved to the front of a cleaned table, in this order.
pub const PRIORITY_COLUMNS: &[&str] = &[
    columns::COMPANY,
    columns::RATE_CLASSIFICATION,
    columns::USAGE_LEVEL,
    columns::UNIT,
    columns::YEAR,
];

/// Cleans one table, trimming the given boilerplate ranges first.
pub fn clean_table(mut table: Table, trim: TrimRanges) -> Table {
    if let Some(rows) = trim.rows {
        table.remove_rows(rows.to_range());
    }
    if let Some(cols) = trim.columns {
        table.remove_columns(cols.to_range());
    }

    trim_whitespace(&mut table);
    table.drop_empty_columns(&[columns::COMPANY]);
    drop_sparse_rows(&mut table);
    reorder_priority_columns(&mut table);
    table
}

/// Trims leading and trailing whitespace from every text cell.
pub(crate) fn trim_whitespace(table: &mut Table) {
    table.map_cells(|cell| {
        if let Some(Value::Text(s)) = cell {
            let trimmed = s.trim();
            if trimmed.len() != s.len() {
                *s = trimmed.to_string();
            }
        }
    });
}

fn drop_sparse_rows(table: &mut Table) {
    let width = table.num_columns();
    if width == 0 {
        table.retain_rows(|_| false);
        return;
    }
    table.retain_rows(|row| (row.missing_count() as f64) / (width as f64) <= MAX_MISSING_FRACTION);
}

fn reorder_priority_columns(table: &mut Table) {
    let priority: Vec<usize> = PRIORITY_COLUMNS
        .iter()
        .filter_map(|name| table.column_index(name))
        .collect();
    if priority.is_empty() {
        return;
    }

    let order: Vec<usize> = priority
        .iter()
        .copied()
        .chain((0..table.num_columns()).filter(|index| !priority.contains(index)))
        .collect();
    table.select_columns(&order);
}

/// Cleans every file with the given extension in `dirs.input`, writing the
/// results under the same names in `dirs.output`.
pub fn clean_dir(dirs: &StageDirs, layout: &LayoutProfile, extension: &str) -> Result<BatchReport> {
    let files = dirs.prepare(has_extension(extension))?;
    let mut report = BatchReport::new();

    for path in files {
        let outcome = match clean_file(&path, &dirs.output, layout) {
            Ok(outcome) => outcome,
            Err(err) => ItemOutcome::Failed(err),
        };
        report.record(&path, outcome, Vec::new());
    }

    Ok(report)
}

fn clean_file(path: &Path, output_dir: &Path, layout: &LayoutProfile) -> Result<ItemOutcome> {
    let file_name = file_name_of(path);
    let utility = LayoutProfile::utility_hint(file_name);
    log::debug!("{:?}: cleaning as {} table.", path, utility);

    let table = clean_table(filesio::read_table(path)?, layout.trim_for(utility));

    let out_path = output_dir.join(file_name);
    filesio::write_table(&out_path, &table)?;
    Ok(ItemOutcome::Written {
        outputs: vec![out_path],
    })
}
