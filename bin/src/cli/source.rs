#[cfg(feature = "pdf")]
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, ValueEnum};

use pipeline::pdf::{PageSource, json::JsonPageSource};

/// Kinds of document that can be read.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum SourceKind {
    /// `<name>.pages.json` page dumps.
    Json,
    /// PDF files, read with pdfium and Tabula.
    Pdf,
}

/// Options relating to reading source documents.
#[derive(Args, Debug)]
pub struct SourceArgs {
    /// Kind of source document to read.
    #[arg(long, value_enum, default_value_t = SourceKind::Json)]
    source: SourceKind,

    /// Directory containing the pdfium shared library. Uses the system
    /// library if not given.
    #[cfg(feature = "pdf")]
    #[arg(long)]
    pdfium_lib_dir: Option<PathBuf>,

    /// Path to the Tabula jar file.
    #[cfg(feature = "pdf")]
    #[arg(long, default_value = "tabula.jar")]
    tabula_jar: PathBuf,
}

impl SourceArgs {
    pub fn build(&self) -> Result<Box<dyn PageSource>> {
        match self.source {
            SourceKind::Json => Ok(Box::new(JsonPageSource)),
            SourceKind::Pdf => self.build_pdf(),
        }
    }

    #[cfg(feature = "pdf")]
    fn build_pdf(&self) -> Result<Box<dyn PageSource>> {
        use pipeline::pdf::pdfium::{PdfEngineConfig, PdfiumTabulaSource};

        let config = PdfEngineConfig {
            pdfium_lib_dir: self.pdfium_lib_dir.clone(),
            tabula_jar: self.tabula_jar.clone(),
        };
        Ok(Box::new(PdfiumTabulaSource::new(&config)?))
    }

    #[cfg(not(feature = "pdf"))]
    fn build_pdf(&self) -> Result<Box<dyn PageSource>> {
        anyhow::bail!("reading PDF files requires building with the `pdf` feature")
    }
}
