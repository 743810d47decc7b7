use std::path::Path;

use anyhow::{Context, Result};
use calamine::{Data, Reader, Xlsx, open_workbook};
use rust_xlsxwriter::Workbook;

use super::TableIoError;
use crate::{
    extract::normalize_header,
    table::{Cell, Table, Value},
};

pub(super) fn read_table(path: &Path) -> Result<Table> {
    let mut workbook: Xlsx<_> = open_workbook(path).context("opening workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(TableIoError::NoWorksheet)?
        .context("reading first worksheet")?;

    // Positions are absolute, so leading empty rows and columns are kept
    // just as they were written.
    let Some((last_row, last_col)) = range.end() else {
        return Ok(Table::default());
    };

    let header: Vec<Option<String>> = (0..=last_col)
        .map(|col| match range.get_value((0, col)) {
            None | Some(Data::Empty) => None,
            Some(data) => Some(data.to_string()),
        })
        .collect();

    let rows = (1..=last_row).map(|row| {
        (0..=last_col)
            .map(|col| range.get_value((row, col)).and_then(data_to_cell))
            .collect::<Vec<Cell>>()
    });

    let mut table = Table::new(normalize_header(&header))?;
    for row in rows {
        table.push_row(row)?;
    }
    Ok(table)
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::Empty => None,
        Data::Int(i) => Some(Value::Int(*i)),
        Data::Float(f) => Some(float_value(*f)),
        Data::String(s) => Some(Value::Text(s.clone())),
        Data::Bool(b) => Some(Value::Bool(*b)),
        other => Some(Value::Text(other.to_string())),
    }
}

/// Numbers are stored as floats, so integral values come back as integers.
fn float_value(f: f64) -> Value {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < (i64::MAX as f64) {
        Value::Int(f as i64)
    } else {
        Value::Float(f)
    }
}

/// Largest magnitude an integer can have and still be stored exactly as a
/// worksheet number. Larger integers are written as text.
const MAX_EXACT_INT: u64 = 1 << 53;

pub(super) fn encode_table(table: &Table) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_index, name) in table.columns().iter().enumerate() {
        let col = u16::try_from(col_index).context("too many columns for a worksheet")?;
        worksheet.write_string(0, col, name.as_str())?;
    }

    for (row_index, row) in table.rows().iter().enumerate() {
        let xl_row = u32::try_from(row_index + 1).context("too many rows for a worksheet")?;
        for (col_index, cell) in row.iter().enumerate() {
            let col = u16::try_from(col_index).context("too many columns for a worksheet")?;
            match cell {
                None => {}
                Some(Value::Text(s)) if s.is_empty() => {}
                Some(Value::Text(s)) => {
                    worksheet.write_string(xl_row, col, s.as_str())?;
                }
                Some(Value::Int(i)) if i.unsigned_abs() > MAX_EXACT_INT => {
                    worksheet.write_string(xl_row, col, i.to_string())?;
                }
                Some(Value::Int(i)) => {
                    worksheet.write_number(xl_row, col, *i as f64)?;
                }
                Some(Value::Float(f)) if f.is_nan() => {}
                Some(Value::Float(f)) => {
                    worksheet.write_number(xl_row, col, *f)?;
                }
                Some(Value::Bool(b)) => {
                    worksheet.write_boolean(xl_row, col, *b)?;
                }
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}
