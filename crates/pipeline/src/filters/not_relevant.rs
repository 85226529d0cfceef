//! Filters for companies whose engineers are not relevant to the role.
//!
//! The same not-relevant list is checked twice:
//! - against the current company, with the two-way company match
//! - optionally against the whole `past_positions` text, with a plain
//!   substring search

use crate::config::FilterConfig;
use crate::matching::{company_matches, normalize_list, text_contains_any};
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::Table;

/// Removes candidates currently at a not-relevant company.
pub struct NotRelevantCurrentFilter;

impl Filter for NotRelevantCurrentFilter {
    fn name(&self) -> &str {
        "not_relevant_current"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        !config.not_relevant.is_empty()
    }

    fn exclusion_mask(&self, table: &Table, config: &FilterConfig) -> Result<Vec<bool>> {
        let companies = normalize_list(&config.not_relevant);
        Ok(table
            .iter()
            .map(|row| company_matches(row.text("current_company").as_deref(), &companies))
            .collect())
    }
}

/// Removes candidates whose history mentions a not-relevant company.
///
/// Needs both the `not_relevant_past` toggle and a non-empty list.
pub struct NotRelevantPastFilter;

impl Filter for NotRelevantPastFilter {
    fn name(&self) -> &str {
        "not_relevant_past"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.not_relevant_past && !config.not_relevant.is_empty()
    }

    fn exclusion_mask(&self, table: &Table, config: &FilterConfig) -> Result<Vec<bool>> {
        let companies = normalize_list(&config.not_relevant);
        Ok(table
            .iter()
            .map(|row| text_contains_any(row.text("past_positions").as_deref(), &companies))
            .collect())
    }
}
