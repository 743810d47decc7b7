//! Pulls per-page tables out of source documents and routes them by utility
//! type.

mod header;
mod rateclause;
#[cfg(test)]
mod tests;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use header::normalize_header;
pub use rateclause::RateClause;

use crate::{
    batch::{StageDirs, file_name_of},
    classify::{Classifier, UtilityType},
    filesio,
    pdf::{Document, FilingYear, Page, PageSource},
    report::{BatchReport, ItemOutcome},
    table::{Table, TableError, Value, columns, int, text},
};

/// A raw table that could not be turned into a company record table.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableSkip {
    pub page: u32,
    pub reason: String,
}

/// The company record tables extracted from one document.
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedTables {
    pub electric: Option<Table>,
    pub gas: Option<Table>,
    pub skipped: Vec<TableSkip>,
}

impl ExtractedTables {
    /// Returns `true` if neither utility type yielded any table.
    pub fn is_empty(&self) -> bool {
        self.electric.is_none() && self.gas.is_none()
    }
}

/// Extracts company record tables from [Document]s.
pub struct Extractor<'a> {
    classifier: &'a Classifier,
}

impl<'a> Extractor<'a> {
    pub fn new(classifier: &'a Classifier) -> Self {
        Self { classifier }
    }

    /// Extracts the tables of every page, concatenated per utility type.
    /// Tables of companies of [UtilityType::Unknown] are dropped.
    pub fn extract_document(&self, document: &Document, year: i64) -> ExtractedTables {
        let mut electric: Vec<Table> = Vec::new();
        let mut gas: Vec<Table> = Vec::new();
        let mut skipped: Vec<TableSkip> = Vec::new();

        for page in &document.pages {
            let Some((company, page_text)) = page_company(page) else {
                log::debug!(
                    "{}: page {}: no text or no tables, skipping.",
                    document.name,
                    page.number
                );
                continue;
            };

            let utility = self.classifier.classify(company);
            log::debug!(
                "{}: page {}: company {:?} classified as {}.",
                document.name,
                page.number,
                company,
                utility
            );
            let accumulator = match utility {
                UtilityType::Electric => &mut electric,
                UtilityType::Gas => &mut gas,
                UtilityType::Unknown => continue,
            };

            let clause = RateClause::find(page_text);
            for raw in &page.tables {
                let Some((header, data)) = raw.split_first().filter(|(_, data)| !data.is_empty())
                else {
                    continue;
                };
                match build_table(header, data, company, page.number, year, clause.as_ref()) {
                    Ok(table) => accumulator.push(table),
                    Err(err) => {
                        log::warn!(
                            "{}: page {}: skipping malformed table: {}",
                            document.name,
                            page.number,
                            err
                        );
                        skipped.push(TableSkip {
                            page: page.number,
                            reason: err.to_string(),
                        });
                    }
                }
            }
        }

        ExtractedTables {
            electric: concat_nonempty(electric),
            gas: concat_nonempty(gas),
            skipped,
        }
    }
}

/// Returns the company name and text of a page that has both text and
/// tables.
fn page_company(page: &Page) -> Option<(&str, &str)> {
    let text = page.text.as_deref()?;
    if page.tables.is_empty() {
        return None;
    }
    let company = text.trim().lines().next()?.trim();
    if company.is_empty() {
        return None;
    }
    Some((company, text))
}

/// Builds a company record table from a raw table's header and data rows.
fn build_table(
    header: &[Option<String>],
    data: &[Vec<Option<String>>],
    company: &str,
    page: u32,
    year: i64,
    clause: Option<&RateClause>,
) -> Result<Table, TableError> {
    // Ragged rows are padded, but the widest row must match the header.
    let widest = data.iter().map(Vec::len).max().unwrap_or_default();
    if widest != header.len() {
        return Err(TableError::ColumnCountMismatch {
            row: data
                .iter()
                .position(|row| row.len() == widest)
                .unwrap_or_default(),
            expected: header.len(),
            actual: widest,
        });
    }

    let rows = data
        .iter()
        .map(|row| row.iter().map(|cell| cell.clone().map(Value::Text)).collect());
    let mut table = Table::from_rows(normalize_header(header), rows)?;
    table.drop_empty_rows();
    table.drop_empty_columns(&[]);

    table.insert_column(0, columns::COMPANY, text(company))?;
    table.insert_column(1, columns::PAGE, int(i64::from(page)))?;
    table.set_column(columns::YEAR, int(year));

    if let Some(clause) = clause {
        clause.apply(&mut table);
    }
    Ok(table)
}

fn concat_nonempty(tables: Vec<Table>) -> Option<Table> {
    if tables.is_empty() {
        None
    } else {
        Some(Table::concat(tables))
    }
}

/// Name of the extractor output file for a utility type and year.
pub fn output_file_name(utility: UtilityType, year_label: &str) -> String {
    format!("cleaned_{}_rates_{}.xlsx", utility.slug(), year_label)
}

/// Extracts every document in `dirs.input` that `source` accepts, writing
/// per-utility tables to `dirs.output`.
pub fn extract_dir(
    source: &dyn PageSource,
    dirs: &StageDirs,
    classifier: &Classifier,
) -> Result<BatchReport> {
    let files = dirs.prepare(|path| source.accepts(path))?;
    let extractor = Extractor::new(classifier);
    let mut report = BatchReport::new();

    for path in files {
        let (outcome, warnings) = extract_file(source, &extractor, &path, &dirs.output);
        report.record(&path, outcome, warnings);
    }

    Ok(report)
}

fn extract_file(
    source: &dyn PageSource,
    extractor: &Extractor,
    path: &Path,
    output_dir: &Path,
) -> (ItemOutcome, Vec<String>) {
    let Some(year) = FilingYear::from_file_name(file_name_of(path)) else {
        return (
            ItemOutcome::Skipped {
                reason: "no year in filename".to_string(),
            },
            Vec::new(),
        );
    };

    let document = match source.read_document(path) {
        Ok(document) => document,
        Err(err) => return (ItemOutcome::Failed(err), Vec::new()),
    };

    let extracted = extractor.extract_document(&document, year.value);
    let warnings = extracted
        .skipped
        .iter()
        .map(|skip| format!("page {}: skipped table: {}", skip.page, skip.reason))
        .collect();

    if extracted.is_empty() {
        return (ItemOutcome::NoData, warnings);
    }

    let mut outputs: Vec<PathBuf> = Vec::new();
    for (utility, table) in [
        (UtilityType::Electric, &extracted.electric),
        (UtilityType::Gas, &extracted.gas),
    ] {
        let Some(table) = table else {
            continue;
        };
        let out_path = output_dir.join(output_file_name(utility, &year.label));
        if let Err(err) = filesio::write_table(&out_path, table) {
            return (ItemOutcome::Failed(err), warnings);
        }
        outputs.push(out_path);
    }

    (ItemOutcome::Written { outputs }, warnings)
}
