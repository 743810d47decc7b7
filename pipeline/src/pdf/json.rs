//! Reads documents from JSON page dumps.
//!
//! A page dump is the output of a PDF engine saved as
//! `{"pages": [{"number": 1, "text": "...", "tables": [[["h1", null], ...]]}]}`
//! in a file named `<document>.pages.json`.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};

use super::{Document, Page, PageSource};

/// File name suffix of page dumps.
pub const PAGE_DUMP_SUFFIX: &str = ".pages.json";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PageDump {
    pub pages: Vec<Page>,
}

/// [PageSource] over `*.pages.json` page dumps.
#[derive(Debug, Default)]
pub struct JsonPageSource;

impl PageSource for JsonPageSource {
    fn accepts(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| name.to_lowercase().ends_with(PAGE_DUMP_SUFFIX))
    }

    fn read_document(&self, path: &Path) -> Result<Document> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow!("page dump path {:?} has no usable file name", path))?;
        let name = file_name
            .get(..file_name.len().saturating_sub(PAGE_DUMP_SUFFIX.len()))
            .unwrap_or(file_name)
            .to_string();

        let rdr = File::open(path).with_context(|| format!("opening page dump {:?}", path))?;
        let dump: PageDump = serde_json::from_reader(BufReader::new(rdr))
            .with_context(|| format!("parsing page dump {:?}", path))?;

        Ok(Document {
            name,
            pages: dump.pages,
        })
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
