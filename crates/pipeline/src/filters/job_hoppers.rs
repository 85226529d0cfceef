//! Filter to remove candidates with a history of very short roles.
//!
//! Works off the tenure tags the projector appends to each past position,
//! e.g. `"Engineer at Wix (01 Jan 2020 - 01 Jul 2020) [0.5 yrs]"`.

use crate::config::FilterConfig;
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::Table;
use regex::Regex;
use std::sync::LazyLock;

/// A role shorter than this many years is a short stint.
pub const SHORT_STINT_YEARS: f64 = 1.0;

/// Rows with at least this many short stints are removed.
pub const MAX_SHORT_STINTS: usize = 2;

/// Removes candidates with two or more past roles under a year.
pub struct JobHoppersFilter;

static TENURE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[(\d+\.?\d*)\s*yrs?\]").expect("tenure tag pattern is valid")
});

/// Extract every `[<number> yrs]` tag from a past-positions string.
///
/// Accepts `[2 yrs]`, `[0.5 yrs]`, `[1.yr]` and `[3.0   yrs]`: digits, an
/// optional fractional part, optional whitespace, then `yr` or `yrs`.
pub fn tenure_tags(text: &str) -> Vec<f64> {
    TENURE_TAG
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<f64>().ok())
        .collect()
}

/// Number of tenure tags below [`SHORT_STINT_YEARS`].
pub fn short_stint_count(past_positions: &str) -> usize {
    if past_positions.trim().is_empty() {
        return 0;
    }
    tenure_tags(past_positions)
        .into_iter()
        .filter(|years| *years < SHORT_STINT_YEARS)
        .count()
}

impl Filter for JobHoppersFilter {
    fn name(&self) -> &str {
        "job_hoppers"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.filter_job_hoppers
    }

    fn exclusion_mask(&self, table: &Table, _config: &FilterConfig) -> Result<Vec<bool>> {
        Ok(table
            .iter()
            .map(|row| {
                row.text("past_positions")
                    .map(|text| short_stint_count(&text) >= MAX_SHORT_STINTS)
                    .unwrap_or(false)
            })
            .collect())
    }
}
