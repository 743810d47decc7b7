use std::path::Path;

use anyhow::{Context, Result, anyhow};

use crate::{
    extract::normalize_header,
    table::{Cell, Table, Value},
};

pub(super) fn read_table(path: &Path) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context("opening CSV reader")?;
    let mut records = reader.records();

    let header: Vec<Option<String>> = match records.next() {
        None => return Ok(Table::default()),
        Some(record) => record
            .context("reading CSV header")?
            .iter()
            .map(|field| Some(field.to_string()))
            .collect(),
    };

    let mut table = Table::new(normalize_header(&header))?;
    for (row_index, record) in records.enumerate() {
        let record = record.with_context(|| format!("reading CSV row {}", row_index + 1))?;
        table.push_row(record.iter().map(field_to_cell).collect())?;
    }
    Ok(table)
}

fn field_to_cell(field: &str) -> Cell {
    if field.is_empty() {
        None
    } else if let Ok(i) = field.parse::<i64>() {
        Some(Value::Int(i))
    } else if let Ok(f) = field.parse::<f64>() {
        Some(Value::Float(f))
    } else {
        Some(Value::Text(field.to_string()))
    }
}

pub(super) fn encode_table(table: &Table) -> Result<Vec<u8>> {
    let mut output = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(Vec::new());

    output
        .write_record(table.columns())
        .context("writing CSV header")?;

    let mut fields: Vec<String> = Vec::with_capacity(table.num_columns());
    for (row_index, row) in table.rows().iter().enumerate() {
        fields.clear();
        fields.extend(row.iter().map(|cell| match cell {
            None => String::new(),
            Some(value) => value.to_string(),
        }));
        output
            .write_record(&fields)
            .with_context(|| format!("writing row index {row_index}"))?;
    }

    output
        .into_inner()
        .map_err(|err| anyhow!("flushing CSV output: {}", err.error()))
}
