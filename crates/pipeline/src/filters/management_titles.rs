//! Filter to remove people in management roles.
//!
//! Individual-contributor leadership titles ("Senior", "Tech Lead", ...)
//! are kept even when they also contain a management keyword.

use crate::config::FilterConfig;
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::Table;

/// Title fragments that mark a management role.
pub const EXCLUDE_TITLES: [&str; 12] = [
    "director",
    "head of",
    "vp ",
    "vice president",
    "cto",
    "ceo",
    "coo",
    "chief ",
    "group manager",
    "engineering manager",
    "r&d manager",
    "founder",
];

/// Title fragments that always keep the row. Checked first.
pub const KEEP_TITLES: [&str; 6] = [
    "team lead",
    "tech lead",
    "staff",
    "principal",
    "senior",
    "architect",
];

pub struct ManagementTitlesFilter;

/// Classify a title. Blank titles are never management.
pub fn is_management_title(title: &str) -> bool {
    if title.trim().is_empty() {
        return false;
    }
    let title = title.to_lowercase();
    if KEEP_TITLES.iter().any(|keep| title.contains(keep)) {
        return false;
    }
    EXCLUDE_TITLES.iter().any(|exclude| title.contains(exclude))
}

impl Filter for ManagementTitlesFilter {
    fn name(&self) -> &str {
        "management_titles"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.filter_management
    }

    fn exclusion_mask(&self, table: &Table, _config: &FilterConfig) -> Result<Vec<bool>> {
        Ok(table
            .iter()
            .map(|row| {
                row.text("current_title")
                    .is_some_and(|title| is_management_title(&title))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_loader::Record;

    #[test]
    fn test_keep_words_take_precedence() {
        assert!(!is_management_title("Senior Engineering Manager"));
        assert!(!is_management_title("Principal Architect, Office of the CTO"));
        assert!(is_management_title("Engineering Manager"));
        assert!(is_management_title("VP R&D"));
        assert!(!is_management_title("Backend Engineer"));
        assert!(!is_management_title(""));
    }

    #[test]
    fn test_management_titles_filter() {
        let table = Table::from_records(vec![
            Record::new().with("current_title", "Director of Engineering"),
            Record::new().with("current_title", "Senior Software Engineer"),
            Record::new().with("current_title", "Co-Founder"),
            Record::new(),
        ]);

        let (filtered, removed) = ManagementTitlesFilter
            .apply(&table, &FilterConfig::recommended())
            .unwrap();

        assert_eq!(removed, 2);
        assert_eq!(filtered.len(), 2);
    }
}
