//! Reading and writing [Table]s as spreadsheet files.
//!
//! The file extension selects the format. Writes go to a temporary sibling
//! file that is renamed into place on success.

mod csv_file;
mod xlsx_file;

use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;

use crate::table::Table;

/// File extension of the default stage file format.
pub const DEFAULT_EXTENSION: &str = "xlsx";

/// Problems with locating table data in a file.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum TableIoError {
    #[error("unsupported table file extension {0:?}")]
    UnsupportedExtension(String),
    #[error("workbook has no worksheet")]
    NoWorksheet,
}

/// Supported table file formats.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TableFormat {
    Xlsx,
    Csv,
}

impl TableFormat {
    /// Determines the format from the extension of `path`, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, TableIoError> {
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_lowercase();
        match ext.as_str() {
            "xlsx" => Ok(Self::Xlsx),
            "csv" => Ok(Self::Csv),
            _ => Err(TableIoError::UnsupportedExtension(ext)),
        }
    }
}

/// Reads the first sheet of the table file at `path`. The first row is the
/// header.
pub fn read_table(path: &Path) -> Result<Table> {
    let format = TableFormat::from_path(path)?;
    match format {
        TableFormat::Xlsx => xlsx_file::read_table(path),
        TableFormat::Csv => csv_file::read_table(path),
    }
    .with_context(|| format!("reading table from {:?}", path))
}

/// Writes `table` to `path`, replacing any existing file. Parent directories
/// are created as needed.
pub fn write_table(path: &Path, table: &Table) -> Result<()> {
    let format = TableFormat::from_path(path)?;
    let buf = match format {
        TableFormat::Xlsx => xlsx_file::encode_table(table),
        TableFormat::Csv => csv_file::encode_table(table),
    }
    .with_context(|| format!("encoding table for {:?}", path))?;

    write_atomic(path, &buf)
}

/// Creates `dir` and any missing parents.
pub fn create_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).with_context(|| format!("creating directory {:?}", dir))
}

fn write_atomic(path: &Path, buf: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        create_dir(parent)?;
    }

    let mut file =
        AtomicWriteFile::open(path).with_context(|| format!("opening {:?} for writing", path))?;
    file.write_all(buf)
        .with_context(|| format!("writing {:?}", path))?;
    file.commit()
        .with_context(|| format!("committing {:?}", path))
}
