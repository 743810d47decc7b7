//! Row/column table model shared by every pipeline stage.
//!
//! A [Table] has uniquely named columns and rows that are always exactly as
//! wide as the column list. Row positions are implicit, so any removal leaves
//! the remaining rows densely indexed.


use std::{
    cmp::min,
    fmt::{self, Display},
    ops::{Deref, Range},
};

use hashbrown::{HashMap, HashSet};

/// Names of columns that the pipeline stages give special treatment.
pub mod columns {
    pub const COMPANY: &str = "Company";
    pub const PAGE: &str = "Page";
    pub const YEAR: &str = "Year";
    pub const RATE_CLASSIFICATION: &str = "Rate Classification";
    pub const USAGE_LEVEL: &str = "Usage Level";
    pub const UNIT: &str = "Unit";
    pub const SOURCE_FILE: &str = "Source File";
}

/// Structural problems with building or reshaping a [Table].
#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TableError {
    #[error("data row {row} has {actual} cells but the header has {expected} columns")]
    ColumnCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("header column {index} duplicates an earlier column name")]
    DuplicateColumn { index: usize },
    #[error("column {0:?} is already present")]
    ColumnExists(&'static str),
    #[error("column {0:?} is not present")]
    MissingColumn(&'static str),
}

/// A non-missing cell value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl Value {
    /// Returns the string content of a [Value::Text].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

/// A single table cell. `None` is the missing marker.
pub type Cell = Option<Value>;

/// Returns `true` if the cell counts as missing.
///
/// Blank text is missing as well: a spreadsheet round trip turns it into an
/// empty cell anyway.
pub fn is_missing(cell: &Cell) -> bool {
    match cell {
        None => true,
        Some(Value::Text(s)) => s.trim().is_empty(),
        Some(Value::Float(v)) => v.is_nan(),
        Some(_) => false,
    }
}

/// Creates a text cell.
pub fn text(s: impl Into<String>) -> Cell {
    Some(Value::Text(s.into()))
}

/// Creates an integer cell.
pub fn int(i: i64) -> Cell {
    Some(Value::Int(i))
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Row(Vec<Cell>);

impl Deref for Row {
    type Target = Vec<Cell>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Row {
    /// Returns `true` if every cell in the row is missing.
    pub fn is_empty_row(&self) -> bool {
        self.0.iter().all(is_missing)
    }

    /// Number of missing cells in the row.
    pub fn missing_count(&self) -> usize {
        self.0.iter().filter(|cell| is_missing(cell)).count()
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// Creates an empty table with the given column names.
    pub fn new(columns: Vec<String>) -> Result<Self, TableError> {
        {
            let mut seen: HashSet<&str> = HashSet::with_capacity(columns.len());
            for (index, name) in columns.iter().enumerate() {
                if !seen.insert(name.as_str()) {
                    return Err(TableError::DuplicateColumn { index });
                }
            }
        }

        Ok(Self {
            columns,
            rows: Vec::new(),
        })
    }

    /// Creates a table from a header and data rows.
    ///
    /// Rows shorter than the header are padded with missing cells. Rows longer
    /// than the header are an error.
    pub fn from_rows<R>(columns: Vec<String>, rows: R) -> Result<Self, TableError>
    where
        R: IntoIterator<Item = Vec<Cell>>,
    {
        let mut table = Self::new(columns)?;
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Appends a row, padding it with missing cells to the table width.
    pub fn push_row(&mut self, mut cells: Vec<Cell>) -> Result<(), TableError> {
        let expected = self.columns.len();
        if cells.len() > expected {
            return Err(TableError::ColumnCountMismatch {
                row: self.rows.len(),
                expected,
                actual: cells.len(),
            });
        }
        cells.resize(expected, None);
        self.rows.push(Row(cells));
        Ok(())
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterates over the cells of the named column, if present.
    pub fn column_cells(&self, name: &str) -> Option<impl Iterator<Item = &Cell>> {
        let index = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row.0[index]))
    }

    /// Returns the cell at `row` in the named column.
    pub fn cell(&self, row: usize, name: &str) -> Option<&Cell> {
        let index = self.column_index(name)?;
        self.rows.get(row).map(|row| &row.0[index])
    }

    /// Inserts a new column at `index`, with every row set to `fill`.
    pub fn insert_column(
        &mut self,
        index: usize,
        name: &'static str,
        fill: Cell,
    ) -> Result<(), TableError> {
        if self.has_column(name) {
            return Err(TableError::ColumnExists(name));
        }
        let index = min(index, self.columns.len());
        self.columns.insert(index, name.to_string());
        for row in &mut self.rows {
            row.0.insert(index, fill.clone());
        }
        Ok(())
    }

    /// Sets every row of the named column to `fill`, appending the column if
    /// absent.
    pub fn set_column(&mut self, name: &str, fill: Cell) {
        match self.column_index(name) {
            Some(index) => {
                for row in &mut self.rows {
                    row.0[index] = fill.clone();
                }
            }
            None => {
                self.columns.push(name.to_string());
                for row in &mut self.rows {
                    row.0.push(fill.clone());
                }
            }
        }
    }

    /// Applies `f` to every cell.
    pub fn map_cells<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut Cell),
    {
        for row in &mut self.rows {
            row.0.iter_mut().for_each(&mut f);
        }
    }

    /// Keeps only the rows for which `f` returns `true`.
    pub fn retain_rows<F>(&mut self, f: F)
    where
        F: FnMut(&Row) -> bool,
    {
        self.rows.retain(f);
    }

    /// Removes rows by position. Positions beyond the table are ignored.
    pub fn remove_rows(&mut self, positions: Range<usize>) {
        if let Some(rng) = intersect_range(self.rows.len(), positions) {
            self.rows.drain(rng);
        }
    }

    /// Removes columns by position. Positions beyond the table are ignored.
    pub fn remove_columns(&mut self, positions: Range<usize>) {
        if let Some(rng) = intersect_range(self.columns.len(), positions) {
            self.columns.drain(rng.clone());
            for row in &mut self.rows {
                row.0.drain(rng.clone());
            }
        }
    }

    /// Reorders and/or selects columns by their current positions.
    ///
    /// `order` must not repeat a position.
    pub fn select_columns(&mut self, order: &[usize]) {
        let columns = order.iter().map(|&i| self.columns[i].clone()).collect();
        self.columns = columns;
        for row in &mut self.rows {
            let cells = order.iter().map(|&i| row.0[i].clone()).collect();
            row.0 = cells;
        }
    }

    /// Drops every row whose cells are all missing.
    pub fn drop_empty_rows(&mut self) {
        self.rows.retain(|row| !row.is_empty_row());
    }

    /// Drops every column whose cells are all missing, except those named in
    /// `keep`.
    pub fn drop_empty_columns(&mut self, keep: &[&str]) {
        let order: Vec<usize> = (0..self.columns.len())
            .filter(|&index| {
                keep.contains(&self.columns[index].as_str())
                    || self.rows.iter().any(|row| !is_missing(&row.0[index]))
            })
            .collect();
        if order.len() != self.columns.len() {
            self.select_columns(&order);
        }
    }

    /// Concatenates tables row-wise.
    ///
    /// The resulting columns are the union of all input columns, in order of
    /// first appearance. Cells for columns that an input lacks are missing.
    pub fn concat<I>(tables: I) -> Table
    where
        I: IntoIterator<Item = Table>,
    {
        let mut out = Table::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for table in tables {
            let mapping: Vec<usize> = table
                .columns
                .iter()
                .map(|name| {
                    *positions.entry_ref(name.as_str()).or_insert_with(|| {
                        out.columns.push(name.clone());
                        out.columns.len() - 1
                    })
                })
                .collect();

            for row in table.rows {
                let mut cells: Vec<Cell> = Vec::with_capacity(out.columns.len());
                cells.resize(out.columns.len(), None);
                for (cell, &dest) in row.0.into_iter().zip(&mapping) {
                    cells[dest] = cell;
                }
                out.rows.push(Row(cells));
            }
        }

        // Rows accumulated before later tables introduced new columns are
        // narrower than the final column list.
        let width = out.columns.len();
        for row in &mut out.rows {
            row.0.resize(width, None);
        }

        out
    }
}

/// Clamps `positions` to `0..len`, returning `None` if nothing remains.
fn intersect_range(len: usize, positions: Range<usize>) -> Option<Range<usize>> {
    let from = min(len, positions.start);
    let to = min(len, positions.end);

    if from < to { Some(from..to) } else { None }
}
