//! Reads PDF files directly: pdfium for page text, Tabula for page tables.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use hashbrown::HashMap;
use pdfium_render::prelude::*;
use serde::Deserialize;

use super::{Document, Page, PageSource, RawTable};

#[derive(Deserialize, Debug)]
#[serde(transparent)]
struct JsonTableSet(Vec<JsonTable>);

#[derive(Deserialize, Debug)]
struct JsonTable {
    page_number: i32,
    data: Vec<JsonRow>,
}

#[derive(Deserialize, Debug)]
struct JsonRow(Vec<JsonCell>);

#[derive(Deserialize, Debug)]
struct JsonCell {
    text: String,
}

impl From<JsonTable> for RawTable {
    fn from(value: JsonTable) -> Self {
        value
            .data
            .into_iter()
            .map(|row| row.0.into_iter().map(|cell| Some(cell.text)).collect())
            .collect()
    }
}

/// Locations of the native libraries needed by [PdfiumTabulaSource].
#[derive(Clone, Debug, Default)]
pub struct PdfEngineConfig {
    /// Directory containing the pdfium shared library. The system library is
    /// used if `None`.
    pub pdfium_lib_dir: Option<PathBuf>,
    /// Path to the Tabula jar.
    pub tabula_jar: PathBuf,
}

/// [PageSource] over `*.pdf` files.
pub struct PdfiumTabulaSource {
    pdfium: Pdfium,
    vm: tabula::TabulaVM,
}

impl PdfiumTabulaSource {
    pub fn new(config: &PdfEngineConfig) -> Result<Self> {
        let bindings = match &config.pdfium_lib_dir {
            Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
            None => Pdfium::bind_to_system_library(),
        }
        .context("binding to pdfium library")?;

        let libpath = config
            .tabula_jar
            .to_str()
            .ok_or_else(|| anyhow!("Tabula jar path {:?} is not valid UTF-8", config.tabula_jar))?;
        let vm = tabula::TabulaVM::new(libpath, false).context("starting TabulaVM")?;

        Ok(Self {
            pdfium: Pdfium::new(bindings),
            vm,
        })
    }

    fn read_text(&self, path: &Path) -> Result<Vec<Option<String>>> {
        let document = self
            .pdfium
            .load_pdf_from_file(path, None)
            .with_context(|| format!("opening PDF {:?}", path))?;

        document
            .pages()
            .iter()
            .enumerate()
            .map(|(index, page)| {
                let text = page
                    .text()
                    .with_context(|| format!("reading text of page {}", index + 1))?
                    .all();
                Ok(if text.trim().is_empty() { None } else { Some(text) })
            })
            .collect()
    }

    fn read_tables(&self, path: &Path) -> Result<HashMap<u32, Vec<RawTable>>> {
        let env = self.vm.attach().context("attaching to TabulaVM")?;

        let tabula = env
            .configure_tabula(
                None,
                None,
                tabula::OutputFormat::Json,
                true,
                tabula::ExtractionMethod::Decide,
                false,
                None,
            )
            .context("configuring Tabula to extract tables")?;

        let extracted_file = tempfile::NamedTempFile::new()
            .context("creating temporary file for extracting PDF table data")?;
        tabula
            .parse_document_into(path, extracted_file.path())
            .context("extracting PDF table data")?;
        let result: JsonTableSet = serde_json::from_reader(extracted_file)
            .context("parsing JSON output from Tabula")?;

        let mut by_page: HashMap<u32, Vec<RawTable>> = HashMap::new();
        for table in result.0 {
            let Ok(page) = u32::try_from(table.page_number) else {
                log::warn!("{:?}: ignoring table with page number {}", path, table.page_number);
                continue;
            };
            by_page.entry(page).or_default().push(table.into());
        }
        Ok(by_page)
    }
}

impl PageSource for PdfiumTabulaSource {
    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }

    fn read_document(&self, path: &Path) -> Result<Document> {
        let name = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .ok_or_else(|| anyhow!("PDF path {:?} has no usable file name", path))?
            .to_string();

        let texts = self.read_text(path)?;
        let mut tables = self.read_tables(path)?;

        let pages = texts
            .into_iter()
            .zip(1u32..)
            .map(|(text, number)| Page {
                number,
                text,
                tables: tables.remove(&number).unwrap_or_default(),
            })
            .collect();

        Ok(Document { name, pages })
    }

    fn close(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}
