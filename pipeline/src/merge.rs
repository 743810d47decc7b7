//! Combines many stage files into one dataset tagged with provenance.

use std::path::Path;

use anyhow::{Context, Result};

use crate::{
    batch::{file_name_of, has_extension, list_files},
    filesio,
    report::{BatchReport, ItemOutcome},
    table::{Table, columns, text},
};

/// Concatenates named tables row-wise, tagging each row with the name of the
/// table it came from. Returns `None` if there are no tables.
pub fn merge_tables<I>(tables: I) -> Option<Table>
where
    I: IntoIterator<Item = (String, Table)>,
{
    let tagged: Vec<Table> = tables
        .into_iter()
        .map(|(source, mut table)| {
            table.set_column(columns::SOURCE_FILE, text(source));
            table
        })
        .collect();

    if tagged.is_empty() {
        None
    } else {
        Some(Table::concat(tagged))
    }
}

/// Merges every file with the given extension in `input_dir` into
/// `output_file`.
///
/// Unreadable files are reported and left out. Nothing is written if no file
/// could be read. `output_file` itself is never an input.
pub fn merge_dir(input_dir: &Path, output_file: &Path, extension: &str) -> Result<BatchReport> {
    let own_output = output_file.canonicalize().ok();
    let files = list_files(input_dir, has_extension(extension))?;
    let mut report = BatchReport::new();
    let mut inputs: Vec<(String, Table)> = Vec::with_capacity(files.len());

    for path in files {
        if own_output.is_some() && path.canonicalize().ok() == own_output {
            log::debug!("{:?}: skipping merge output file.", path);
            continue;
        }

        match filesio::read_table(&path) {
            Ok(table) => {
                report.record(
                    &path,
                    ItemOutcome::Merged {
                        rows: table.num_rows(),
                    },
                    Vec::new(),
                );
                inputs.push((file_name_of(&path).to_string(), table));
            }
            Err(err) => report.record(&path, ItemOutcome::Failed(err), Vec::new()),
        }
    }

    let outcome = match merge_tables(inputs) {
        None => {
            log::info!("Nothing to merge in {:?}.", input_dir);
            ItemOutcome::NoData
        }
        Some(merged) => match filesio::write_table(output_file, &merged)
            .with_context(|| format!("writing merged table {:?}", output_file))
        {
            Ok(()) => ItemOutcome::Written {
                outputs: vec![output_file.to_owned()],
            },
            Err(err) => ItemOutcome::Failed(err),
        },
    };
    report.record(output_file, outcome, Vec::new());

    Ok(report)
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;

    use super::*;
    use crate::table::{Cell, Value, int};

    fn single_row(names: &[&str], cells: Vec<Cell>) -> anyhow::Result<Table> {
        Ok(Table::from_rows(
            names.iter().map(|s| s.to_string()).collect(),
            vec![cells],
        )?)
    }

    fn source_files(table: &Table) -> Vec<Cell> {
        table
            .column_cells(columns::SOURCE_FILE)
            .map(|cells| cells.cloned().collect())
            .unwrap_or_default()
    }

    #[gtest]
    fn merge_tables_tags_and_unions() -> anyhow::Result<()> {
        let a = single_row(&["Company", "Rate"], vec![text("Acme"), int(1)])?;
        let b = single_row(&["Company", "Unit"], vec![text("Beta"), text("kwh")])?;

        let merged = merge_tables([("a.xlsx".to_string(), a), ("b.xlsx".to_string(), b)])
            .ok_or_else(|| anyhow::anyhow!("nothing merged"))?;

        expect_that!(
            merged.columns(),
            elements_are![eq("Company"), eq("Rate"), eq("Source File"), eq("Unit")]
        );
        expect_that!(
            source_files(&merged),
            elements_are![eq(&text("a.xlsx")), eq(&text("b.xlsx"))]
        );
        expect_that!(merged.cell(1, "Rate"), some(eq(&None::<Value>)));
        expect_that!(merged.cell(0, "Unit"), some(eq(&None::<Value>)));
        Ok(())
    }

    #[gtest]
    fn existing_source_file_is_overwritten() -> anyhow::Result<()> {
        let a = single_row(&["Source File", "Company"], vec![text("old.xlsx"), text("Acme")])?;

        let merged = merge_tables([("new.xlsx".to_string(), a)])
            .ok_or_else(|| anyhow::anyhow!("nothing merged"))?;

        expect_that!(merged.columns(), elements_are![eq("Source File"), eq("Company")]);
        expect_that!(source_files(&merged), elements_are![eq(&text("new.xlsx"))]);
        Ok(())
    }

    #[gtest]
    fn merge_tables_of_nothing() {
        expect_that!(merge_tables(Vec::new()), none());
    }

    #[gtest]
    #[test_log::test]
    fn merge_dir_round_trip() -> anyhow::Result<()> {
        // GIVEN: two single-row files, a corrupt file, and an earlier merge
        // output in the same directory.
        let dir = tempfile::tempdir()?;
        filesio::write_table(
            &dir.path().join("b.xlsx"),
            &single_row(&["Company"], vec![text("Beta")])?,
        )?;
        filesio::write_table(
            &dir.path().join("a.xlsx"),
            &single_row(&["Company"], vec![text("Acme")])?,
        )?;
        std::fs::write(dir.path().join("c.xlsx"), "junk")?;
        let output_file = dir.path().join("merged_rates.xlsx");
        filesio::write_table(&output_file, &single_row(&["Company"], vec![text("Stale")])?)?;

        // WHEN:
        let report = merge_dir(dir.path(), &output_file, "xlsx")?;

        // THEN:
        let merged = filesio::read_table(&output_file)?;
        expect_that!(merged.num_rows(), eq(2));
        expect_that!(
            source_files(&merged),
            elements_are![eq(&text("a.xlsx")), eq(&text("b.xlsx"))]
        );
        expect_that!(
            report.outcome_for(&dir.path().join("c.xlsx")),
            some(eq(&ItemOutcome::Failed(anyhow::anyhow!("any"))))
        );
        expect_that!(
            report.outcome_for(&output_file),
            some(eq(&ItemOutcome::Written {
                outputs: vec![output_file.clone()],
            }))
        );
        expect_that!(report.summary().merged, eq(2));
        Ok(())
    }

    #[gtest]
    fn merge_dir_of_empty_directory_writes_nothing() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let output_file = dir.path().join("out").join("merged_rates.xlsx");

        let report = merge_dir(dir.path(), &output_file, "xlsx")?;

        expect_that!(output_file.exists(), eq(false));
        expect_that!(
            report.outcome_for(&output_file),
            some(eq(&ItemOutcome::NoData))
        );
        Ok(())
    }

    #[gtest]
    fn merge_dir_honours_extension() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        filesio::write_table(
            &dir.path().join("a.csv"),
            &single_row(&["Company"], vec![text("Acme")])?,
        )?;
        filesio::write_table(
            &dir.path().join("b.xlsx"),
            &single_row(&["Company"], vec![text("Beta")])?,
        )?;
        let output_file = dir.path().join("merged.csv");

        merge_dir(dir.path(), &output_file, "csv")?;

        let merged = filesio::read_table(&output_file)?;
        expect_that!(source_files(&merged), elements_are![eq(&text("a.csv"))]);
        Ok(())
    }
}
