//! Filing layout knowledge that varies between filing formats.
//!
//! A [Profile] bundles the company classifier rules, the boilerplate trim
//! ranges for each utility type, and the summary marker text. The built-in
//! defaults describe the one observed filing layout; a YAML file can replace
//! any part of it.

use std::{fs::File, ops::Range, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::{classify::Classifier, classify::UtilityType, summary::GCR_SUMMARY_MARKER};

/// Everything about a filing format that the stages need to know.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Profile {
    pub classifier: Classifier,
    pub layout: LayoutProfile,
    pub summary_marker: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            classifier: Classifier::default(),
            layout: LayoutProfile::default(),
            summary_marker: GCR_SUMMARY_MARKER.to_string(),
        }
    }
}

impl Profile {
    /// Loads a profile from a YAML file. Keys absent from the file keep their
    /// built-in defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let rdr = File::open(path).with_context(|| format!("opening profile {:?}", path))?;
        serde_yaml_ng::from_reader(rdr).with_context(|| format!("parsing profile {:?}", path))
    }
}

/// Half-open range of row or column positions, written as `[start, end]` in
/// YAML.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(from = "[usize; 2]")]
pub struct IndexRange {
    pub start: usize,
    pub end: usize,
}

impl IndexRange {
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn to_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<[usize; 2]> for IndexRange {
    fn from([start, end]: [usize; 2]) -> Self {
        Self { start, end }
    }
}

/// Row and column positions holding boilerplate, removed by the cleaner.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct TrimRanges {
    pub rows: Option<IndexRange>,
    pub columns: Option<IndexRange>,
}

/// Named mapping from utility type to [TrimRanges].
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutProfile {
    pub name: String,
    pub gas: TrimRanges,
    pub electric: TrimRanges,
}

impl Default for LayoutProfile {
    /// The layout of the gas and electric rate comparison filings: position 0
    /// is kept, the survey front matter after it is not.
    fn default() -> Self {
        Self {
            name: "standard".to_string(),
            gas: TrimRanges {
                rows: Some(IndexRange::new(1, 41)),
                columns: Some(IndexRange::new(1, 18)),
            },
            electric: TrimRanges {
                rows: Some(IndexRange::new(1, 25)),
                columns: None,
            },
        }
    }
}

impl LayoutProfile {
    /// Returns the trim ranges for the utility type. Nothing is trimmed for
    /// [UtilityType::Unknown].
    pub fn trim_for(&self, utility: UtilityType) -> TrimRanges {
        match utility {
            UtilityType::Electric => self.electric,
            UtilityType::Gas => self.gas,
            UtilityType::Unknown => TrimRanges::default(),
        }
    }

    /// Guesses the utility type of a stage file from its name alone. Any name
    /// without "gas" is treated as electric.
    pub fn utility_hint(file_name: &str) -> UtilityType {
        if file_name.to_lowercase().contains("gas") {
            UtilityType::Gas
        } else {
            UtilityType::Electric
        }
    }
}
