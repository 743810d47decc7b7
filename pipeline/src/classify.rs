//! Routing of company names to a utility type by keyword rules.

use serde::Deserialize;

/// Utility type of a company, derived from keywords in its name.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, strum_macros::Display)]
pub enum UtilityType {
    Electric,
    Gas,
    Unknown,
}

impl UtilityType {
    /// Lower case name used in output file names.
    pub fn slug(self) -> &'static str {
        match self {
            UtilityType::Electric => "electric",
            UtilityType::Gas => "gas",
            UtilityType::Unknown => "unknown",
        }
    }
}

/// Maps a set of keywords to a utility type.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct KeywordRule {
    pub category: UtilityType,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(category: UtilityType, keywords: &[&str]) -> Self {
        Self {
            category,
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn matches(&self, name_lower: &str) -> bool {
        self.keywords.iter().any(|k| name_lower.contains(k.as_str()))
    }
}

/// Ordered keyword rules. The first rule with a keyword contained in the
/// company name decides the [UtilityType].
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(from = "Vec<KeywordRule>")]
pub struct Classifier {
    rules: Vec<KeywordRule>,
}

impl Classifier {
    pub fn new(rules: Vec<KeywordRule>) -> Self {
        let rules = rules
            .into_iter()
            .map(|rule| KeywordRule {
                category: rule.category,
                keywords: rule.keywords.iter().map(|k| k.to_lowercase()).collect(),
            })
            .collect();
        Self { rules }
    }

    /// Classifies a company name, case-insensitively.
    pub fn classify(&self, company_name: &str) -> UtilityType {
        let name_lower = company_name.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matches(&name_lower))
            .map(|rule| rule.category)
            .unwrap_or(UtilityType::Unknown)
    }
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(vec![
            KeywordRule::new(UtilityType::Electric, &["electric", "light", "power", "energy"]),
            KeywordRule::new(UtilityType::Gas, &["gas", "works"]),
        ])
    }
}

impl From<Vec<KeywordRule>> for Classifier {
    fn from(value: Vec<KeywordRule>) -> Self {
        Self::new(value)
    }
}
