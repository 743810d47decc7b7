//! Source documents as seen by the extractor: per-page text and raw tables.
//!
//! The PDF engine itself sits behind [PageSource]. [json::JsonPageSource]
//! reads page dumps produced by any engine; the `pdf` feature adds
//! [pdfium::PdfiumTabulaSource], which reads PDF files directly.

pub mod json;
#[cfg(feature = "pdf")]
pub mod pdfium;

use std::path::Path;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// A raw table as returned by the PDF engine. The first row is the header.
/// Rows may be ragged and cells may be absent.
pub type RawTable = Vec<Vec<Option<String>>>;

/// A single page of a source document.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct Page {
    /// 1-based page number.
    pub number: u32,
    /// Extracted plain text, if the page had any.
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tables: Vec<RawTable>,
}

/// One source document. Read-only once loaded.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// Identifier derived from the source file name.
    pub name: String,
    pub pages: Vec<Page>,
}

/// Required trait for types that read [Document]s from files.
pub trait PageSource {
    /// Returns `true` if `path` is a file that this source reads.
    fn accepts(&self, path: &Path) -> bool;

    /// Reads the pages of the document at `path`.
    fn read_document(&self, path: &Path) -> Result<Document>;

    /// Releases any resources held by the source.
    fn close(self: Box<Self>) -> Result<()>;
}

/// Year of a filing, taken from the digits in its file name.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FilingYear {
    /// The digits exactly as they appear, used in output file names.
    pub label: String,
    pub value: i64,
}

impl FilingYear {
    /// Derives the year from all digits in `file_name`, truncated to four
    /// characters. Returns `None` if the name has no digits.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        let label: String = file_name
            .chars()
            .filter(char::is_ascii_digit)
            .take(4)
            .collect();
        let value = label.parse().ok()?;
        Some(Self { label, value })
    }
}
