//! Filter to remove candidates currently at blacklisted companies.

use crate::config::FilterConfig;
use crate::matching::{company_matches, normalize_list};
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::Table;

/// Removes candidates whose `current_company` company-matches the blacklist.
pub struct BlacklistFilter;

impl Filter for BlacklistFilter {
    fn name(&self) -> &str {
        "blacklist"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        !config.blacklist.is_empty()
    }

    fn exclusion_mask(&self, table: &Table, config: &FilterConfig) -> Result<Vec<bool>> {
        let blacklist = normalize_list(&config.blacklist);
        Ok(table
            .iter()
            .map(|row| company_matches(row.text("current_company").as_deref(), &blacklist))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use profile_loader::{CellValue, Record};

    #[test]
    fn test_blacklist_filter() {
        let table = Table::from_records(vec![
            Record::new().with("current_company", "Infosys Ltd"),
            Record::new().with("current_company", "Wix"),
            Record::new().with("current_company", CellValue::Missing),
        ]);
        let config = FilterConfig::new().with_blacklist(vec!["  INFOSYS ".to_string()]);

        let (filtered, removed) = BlacklistFilter.apply(&table, &config).unwrap();

        assert_eq!(removed, 1);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered.rows()[0].text("current_company"), Some("Wix".to_string()));
    }

    #[test]
    fn test_disabled_without_list() {
        assert!(!BlacklistFilter.is_enabled(&FilterConfig::new()));
    }
}
