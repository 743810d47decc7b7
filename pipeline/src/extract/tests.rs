use std::path::PathBuf;

use googletest::prelude::*;
use testutils::sorted_file_names;

use super::*;
use crate::{filesio::read_table, pdf::json::JsonPageSource, table::Cell};

const YEAR: i64 = 2019;

fn raw(rows: &[&[Option<&str>]]) -> Vec<Vec<Option<String>>> {
    rows.iter()
        .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
        .collect()
}

fn page(number: u32, text: &str, tables: Vec<Vec<Vec<Option<String>>>>) -> Page {
    Page {
        number,
        text: Some(text.to_string()),
        tables,
    }
}

fn rate_table() -> Vec<Vec<Option<String>>> {
    raw(&[
        &[Some("Rate"), Some("Rate"), None],
        &[Some("1.00"), Some("2.00"), None],
        &[None, None, None],
    ])
}

fn document(pages: Vec<Page>) -> Document {
    Document {
        name: "GCR_2019".to_string(),
        pages,
    }
}

fn column_values(table: &Table, name: &str) -> Vec<Cell> {
    table
        .column_cells(name)
        .map(|cells| cells.cloned().collect())
        .unwrap_or_default()
}

#[gtest]
#[test_log::test]
fn routes_tables_by_company_classification() {
    // GIVEN: one electric, one gas, and one unclassifiable company page.
    let doc = document(vec![
        page(1, "ABC Light & Power\nRates", vec![rate_table()]),
        page(2, "  XYZ Gas Works  \nRates", vec![rate_table()]),
        page(3, "Acme Water Co\nRates", vec![rate_table()]),
    ]);
    let classifier = Classifier::default();

    // WHEN:
    let extracted = Extractor::new(&classifier).extract_document(&doc, YEAR);

    // THEN:
    let electric = extracted.electric.as_ref();
    let gas = extracted.gas.as_ref();
    expect_that!(electric.map(Table::num_rows), some(eq(1)));
    expect_that!(gas.map(Table::num_rows), some(eq(1)));
    expect_that!(
        electric.and_then(|t| t.cell(0, columns::COMPANY)),
        some(eq(&text("ABC Light & Power")))
    );
    expect_that!(
        gas.and_then(|t| t.cell(0, columns::COMPANY)),
        some(eq(&text("XYZ Gas Works")))
    );
    expect_that!(extracted.skipped, is_empty());
}

#[gtest]
#[test_log::test]
fn builds_company_record_columns() -> anyhow::Result<()> {
    let doc = document(vec![page(
        4,
        "ABC Light & Power\nResidential Heating — first 500 kWh per month",
        vec![rate_table()],
    )]);
    let classifier = Classifier::default();

    let extracted = Extractor::new(&classifier).extract_document(&doc, YEAR);
    let table = extracted
        .electric
        .ok_or_else(|| anyhow::anyhow!("no electric table"))?;

    // The all-empty column and the all-empty row are gone; the header repeats
    // are suffixed.
    expect_that!(
        table.columns(),
        elements_are![
            eq("Company"),
            eq("Page"),
            eq("Rate"),
            eq("Rate_1"),
            eq("Year"),
            eq("Rate Classification"),
            eq("Usage Level"),
            eq("Unit"),
        ]
    );
    expect_that!(table.num_rows(), eq(1));
    expect_that!(table.cell(0, columns::PAGE), some(eq(&int(4))));
    expect_that!(table.cell(0, columns::YEAR), some(eq(&int(2019))));
    expect_that!(table.cell(0, "Rate_1"), some(eq(&text("2.00"))));
    expect_that!(
        table.cell(0, columns::RATE_CLASSIFICATION),
        some(eq(&text("Residential Heating")))
    );
    expect_that!(table.cell(0, columns::USAGE_LEVEL), some(eq(&int(500))));
    expect_that!(table.cell(0, columns::UNIT), some(eq(&text("kwh"))));
    Ok(())
}

#[gtest]
fn rate_columns_absent_without_clause() -> anyhow::Result<()> {
    let doc = document(vec![page(1, "XYZ Gas Works\nNo rates here", vec![rate_table()])]);
    let classifier = Classifier::default();

    let table = Extractor::new(&classifier)
        .extract_document(&doc, YEAR)
        .gas
        .ok_or_else(|| anyhow::anyhow!("no gas table"))?;

    expect_that!(table.has_column(columns::RATE_CLASSIFICATION), eq(false));
    expect_that!(table.has_column(columns::USAGE_LEVEL), eq(false));
    expect_that!(table.has_column(columns::UNIT), eq(false));
    Ok(())
}

#[gtest]
#[test_log::test]
fn malformed_tables_are_skipped_and_recorded() -> anyhow::Result<()> {
    // GIVEN: a page with a table whose data row is wider than its header, a
    // table that already has a Company column, and a good table.
    let doc = document(vec![page(
        7,
        "ABC Light & Power",
        vec![
            raw(&[&[Some("a")], &[Some("1"), Some("2")]]),
            raw(&[&[Some("Company"), Some("b")], &[Some("x"), Some("y")]]),
            raw(&[&[Some("a")], &[Some("ok")]]),
        ],
    )]);
    let classifier = Classifier::default();

    // WHEN:
    let extracted = Extractor::new(&classifier).extract_document(&doc, YEAR);

    // THEN: the good table survives and both bad ones are recorded.
    let table = extracted
        .electric
        .ok_or_else(|| anyhow::anyhow!("no electric table"))?;
    expect_that!(column_values(&table, "a"), elements_are![eq(&text("ok"))]);
    expect_that!(
        extracted.skipped,
        elements_are![
            eq(&TableSkip {
                page: 7,
                reason: TableError::ColumnCountMismatch {
                    row: 0,
                    expected: 1,
                    actual: 2,
                }
                .to_string(),
            }),
            eq(&TableSkip {
                page: 7,
                reason: TableError::ColumnExists(columns::COMPANY).to_string(),
            }),
        ]
    );
    Ok(())
}

#[gtest]
#[test_log::test]
fn table_with_only_narrow_rows_is_skipped() {
    // GIVEN: a three-column header whose widest data row has two cells.
    let doc = document(vec![page(
        3,
        "ABC Light & Power",
        vec![raw(&[
            &[Some("a"), Some("b"), Some("c")],
            &[Some("1")],
            &[Some("1"), Some("2")],
        ])],
    )]);
    let classifier = Classifier::default();

    // WHEN:
    let extracted = Extractor::new(&classifier).extract_document(&doc, YEAR);

    // THEN:
    expect_that!(extracted.electric, none());
    expect_that!(
        extracted.skipped,
        elements_are![eq(&TableSkip {
            page: 3,
            reason: TableError::ColumnCountMismatch {
                row: 1,
                expected: 3,
                actual: 2,
            }
            .to_string(),
        })]
    );
}

#[gtest]
fn ragged_rows_are_padded_when_widest_matches_header() -> anyhow::Result<()> {
    let doc = document(vec![page(
        1,
        "ABC Light & Power",
        vec![raw(&[
            &[Some("a"), Some("b")],
            &[Some("a1"), Some("b1")],
            &[Some("a2")],
        ])],
    )]);
    let classifier = Classifier::default();

    let extracted = Extractor::new(&classifier).extract_document(&doc, YEAR);

    let table = extracted
        .electric
        .ok_or_else(|| anyhow::anyhow!("no electric table"))?;
    expect_that!(
        column_values(&table, "b"),
        elements_are![eq(&text("b1")), eq(&None::<crate::table::Value>)]
    );
    expect_that!(extracted.skipped, is_empty());
    Ok(())
}

#[gtest]
fn short_tables_and_textless_pages_yield_nothing() {
    let doc = document(vec![
        page(1, "ABC Light & Power", vec![raw(&[&[Some("header only")]])]),
        page(2, "ABC Light & Power", vec![]),
        Page {
            number: 3,
            text: None,
            tables: vec![rate_table()],
        },
        page(4, "  \n ", vec![rate_table()]),
    ]);
    let classifier = Classifier::default();

    let extracted = Extractor::new(&classifier).extract_document(&doc, YEAR);

    expect_that!(extracted.is_empty(), eq(true));
    expect_that!(extracted, eq(&ExtractedTables::default()));
}

#[gtest]
fn pages_concatenate_with_column_union() -> anyhow::Result<()> {
    let doc = document(vec![
        page(1, "ABC Power", vec![raw(&[&[Some("a")], &[Some("a1")]])]),
        page(
            2,
            "ABC Power",
            vec![raw(&[&[Some("b"), Some("a")], &[Some("b2"), Some("a2")]])],
        ),
    ]);
    let classifier = Classifier::default();

    let table = Extractor::new(&classifier)
        .extract_document(&doc, YEAR)
        .electric
        .ok_or_else(|| anyhow::anyhow!("no electric table"))?;

    expect_that!(
        table.columns(),
        elements_are![eq("Company"), eq("Page"), eq("a"), eq("Year"), eq("b")]
    );
    expect_that!(
        column_values(&table, "b"),
        elements_are![eq(&None::<crate::table::Value>), eq(&text("b2"))]
    );
    expect_that!(
        column_values(&table, columns::PAGE),
        elements_are![eq(&int(1)), eq(&int(2))]
    );
    Ok(())
}

#[gtest]
fn output_file_names() {
    expect_that!(
        output_file_name(UtilityType::Electric, "2019"),
        eq("cleaned_electric_rates_2019.xlsx")
    );
    expect_that!(
        output_file_name(UtilityType::Gas, "07"),
        eq("cleaned_gas_rates_07.xlsx")
    );
}

fn write_dump(dir: &Path, name: &str, json: &str) -> anyhow::Result<PathBuf> {
    let path = dir.join(name);
    std::fs::write(&path, json)?;
    Ok(path)
}

#[gtest]
#[test_log::test]
fn extract_dir_reports_each_document() -> anyhow::Result<()> {
    // GIVEN: page dumps for a good filing, an empty filing, an undated
    // filing, and a corrupt dump.
    let input = tempfile::tempdir()?;
    let output = tempfile::tempdir()?;
    let good = write_dump(
        input.path(),
        "GCR_2019.pages.json",
        r#"{"pages": [
            {"number": 1, "text": "ABC Light & Power", "tables": [[["Rate"], ["1"]]]},
            {"number": 2, "text": "XYZ Gas Works", "tables": [[["Rate"], ["2"]], [["a"], ["1", "2"]]]}
        ]}"#,
    )?;
    let empty = write_dump(
        input.path(),
        "GCR_2020.pages.json",
        r#"{"pages": [{"number": 1, "text": "ABC Light & Power"}]}"#,
    )?;
    let undated = write_dump(input.path(), "undated.pages.json", r#"{"pages": []}"#)?;
    let corrupt = write_dump(input.path(), "GCR_2021.pages.json", "{")?;
    write_dump(input.path(), "notes.txt", "ignored")?;

    // WHEN:
    let dirs = StageDirs::new(input.path(), output.path().join("extracted"));
    let report = extract_dir(&JsonPageSource, &dirs, &Classifier::default())?;

    // THEN:
    let electric_path = dirs.output.join("cleaned_electric_rates_2019.xlsx");
    let gas_path = dirs.output.join("cleaned_gas_rates_2019.xlsx");
    expect_that!(
        report.outcome_for(&good),
        some(eq(&ItemOutcome::Written {
            outputs: vec![electric_path.clone(), gas_path.clone()],
        }))
    );
    expect_that!(report.outcome_for(&empty), some(eq(&ItemOutcome::NoData)));
    expect_that!(
        report.outcome_for(&undated),
        some(eq(&ItemOutcome::Skipped {
            reason: "no year in filename".to_string(),
        }))
    );
    expect_that!(
        report.outcome_for(&corrupt),
        some(eq(&ItemOutcome::Failed(anyhow::anyhow!("any"))))
    );
    expect_that!(report.items.len(), eq(4));
    expect_that!(report.summary().warnings, eq(1));

    expect_that!(
        sorted_file_names(&dirs.output)?,
        elements_are![
            eq("cleaned_electric_rates_2019.xlsx"),
            eq("cleaned_gas_rates_2019.xlsx"),
        ]
    );
    let gas = read_table(&gas_path)?;
    expect_that!(gas.cell(0, columns::YEAR), some(eq(&int(2019))));
    expect_that!(gas.cell(0, "Rate"), some(eq(&text("2"))));
    Ok(())
}
