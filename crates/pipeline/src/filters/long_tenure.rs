//! Filter to remove candidates who have been in their current role a long time.

use crate::config::FilterConfig;
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::Table;

/// Years in the current role at which a candidate is removed.
pub const LONG_TENURE_YEARS: f64 = 8.0;

/// Removes rows with `current_years_in_role >= 8`.
///
/// A missing or unparseable value never removes the row.
pub struct LongTenureFilter;

impl Filter for LongTenureFilter {
    fn name(&self) -> &str {
        "long_tenure"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.filter_long_tenure
    }

    fn exclusion_mask(&self, table: &Table, _config: &FilterConfig) -> Result<Vec<bool>> {
        Ok(table
            .iter()
            .map(|row| {
                row.get("current_years_in_role")
                    .as_f64()
                    .is_some_and(|years| years >= LONG_TENURE_YEARS)
            })
            .collect())
    }
}
