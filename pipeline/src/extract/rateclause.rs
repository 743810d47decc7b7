use lazy_regex::regex;

use crate::table::{Table, columns, int, text};

/// A rate tier mentioned in page text, such as "Residential Heating, first
/// 500 kWh".
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RateClause {
    pub classification: String,
    pub usage_level: i64,
    pub unit: String,
}

impl RateClause {
    /// Finds the first rate clause in `page_text`.
    ///
    /// Matching is done on the lower-cased text with whitespace runs collapsed
    /// to single spaces, so clauses split across lines are still found.
    pub fn find(page_text: &str) -> Option<Self> {
        let flat = page_text
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();

        let caps = regex!(r"(residential(?: heating)?)\D*(\d{3,5})\s*(kwh|mcf)").captures(&flat)?;
        let usage_level = caps[2].parse().ok()?;

        Some(Self {
            classification: title_case(&caps[1]),
            usage_level,
            unit: caps[3].to_string(),
        })
    }

    /// Sets the rate columns on every row of `table`.
    pub fn apply(&self, table: &mut Table) {
        table.set_column(columns::RATE_CLASSIFICATION, text(self.classification.as_str()));
        table.set_column(columns::USAGE_LEVEL, int(self.usage_level));
        table.set_column(columns::UNIT, text(self.unit.as_str()));
    }
}

fn title_case(s: &str) -> String {
    s.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use test_casing::test_casing;

    use super::*;

    const CLAUSE_CASES: &[(&str, Option<(&str, i64, &str)>)] = &[
        (
            "Residential Heating — first 500 kWh per month",
            Some(("Residential Heating", 500, "kwh")),
        ),
        (
            "Acme Gas\nRESIDENTIAL service,\n  based on 1000\nMcf annually",
            Some(("Residential", 1000, "mcf")),
        ),
        (
            "residential heating 750kwh and residential 1200 kwh",
            Some(("Residential Heating", 750, "kwh")),
        ),
        ("Residential 50 kWh", None),
        ("Residential rates apply to all customers", None),
        ("Commercial 500 kWh", None),
    ];

    /// Checks the `test_casing` count in `test_find`.
    #[test]
    fn test_find_count() {
        assert_eq!(6, CLAUSE_CASES.iter().count());
    }

    #[test_casing(6, CLAUSE_CASES)]
    fn test_find(page_text: &str, expected: &Option<(&str, i64, &str)>) {
        let expected = expected.map(|(classification, usage_level, unit)| RateClause {
            classification: classification.to_string(),
            usage_level,
            unit: unit.to_string(),
        });
        assert_that!(RateClause::find(page_text), eq(&expected));
    }

    #[gtest]
    fn apply_sets_rate_columns() -> anyhow::Result<()> {
        let mut table = Table::from_rows(vec!["a".to_string()], vec![vec![text("x")]])?;
        let clause = RateClause {
            classification: "Residential".to_string(),
            usage_level: 500,
            unit: "kwh".to_string(),
        };

        clause.apply(&mut table);

        expect_that!(
            table.columns(),
            elements_are![eq("a"), eq("Rate Classification"), eq("Usage Level"), eq("Unit")]
        );
        expect_that!(table.cell(0, columns::USAGE_LEVEL), some(eq(&int(500))));
        Ok(())
    }
}
