//! Filter to remove people already in the hiring process.
//!
//! This is the first filter in the pipeline: there is no point screening
//! someone the team has already talked to.

use crate::config::FilterConfig;
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::{Record, Table};
use std::collections::HashSet;

/// Removes candidates whose full name appears in the past-candidates list.
///
/// ## Algorithm
/// 1. Normalize every listed name (lowercase, trimmed) into a HashSet
/// 2. Build `"{first} {last}"` from the row, each part lowercased and trimmed
/// 3. Exclude on an exact set hit
pub struct PastCandidatesFilter;

pub(crate) fn full_name_key(row: &Record) -> String {
    let part = |column: &str| row.text(column).unwrap_or_default().trim().to_lowercase();
    format!("{} {}", part("first_name"), part("last_name"))
}

impl Filter for PastCandidatesFilter {
    fn name(&self) -> &str {
        "past_candidates"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.past_candidates.is_some()
    }

    fn exclusion_mask(&self, table: &Table, config: &FilterConfig) -> Result<Vec<bool>> {
        let names: HashSet<String> = config
            .past_candidates
            .iter()
            .flatten()
            .map(|name| name.trim().to_lowercase())
            .collect();

        Ok(table
            .iter()
            .map(|row| names.contains(&full_name_key(row)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(first: &str, last: &str) -> Record {
        Record::new().with("first_name", first).with("last_name", last)
    }

    #[test]
    fn test_past_candidates_filter() {
        let table = Table::from_records(vec![
            person("Dana", "Levi"),
            person("  NOA ", "Katz"),
            person("Lior", "Ben David"),
        ]);
        let config = FilterConfig::new()
            .with_past_candidates(vec!["dana levi".to_string(), " Noa Katz ".to_string()]);

        let (filtered, removed) = PastCandidatesFilter.apply(&table, &config).unwrap();

        assert_eq!(removed, 2);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered.rows()[0].text("first_name"), Some("Lior".to_string()));
    }

    #[test]
    fn test_missing_last_name() {
        let row = Record::new().with("first_name", "Dana");
        assert_eq!(full_name_key(&row), "dana ");
    }

    #[test]
    fn test_enabled_by_empty_list() {
        let config = FilterConfig::new().with_past_candidates(Vec::new());
        assert!(PastCandidatesFilter.is_enabled(&config));
        assert!(!PastCandidatesFilter.is_enabled(&FilterConfig::new()));
    }
}
