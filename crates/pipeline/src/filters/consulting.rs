//! Filter to remove candidates currently at consulting or staffing firms.

use crate::config::FilterConfig;
use crate::matching::company_matches;
use crate::traits::Filter;
use anyhow::Result;
use profile_loader::Table;

/// Known consulting, outsourcing and staffing firms. Not configurable.
pub const CONSULTING_FIRMS: [&str; 16] = [
    "tikal",
    "matrix",
    "ness",
    "sela",
    "malam",
    "bynet",
    "sqlink",
    "john bryce",
    "experis",
    "manpower",
    "infosys",
    "tata",
    "wipro",
    "cognizant",
    "accenture",
    "capgemini",
];

pub struct ConsultingFilter;

impl Filter for ConsultingFilter {
    fn name(&self) -> &str {
        "consulting"
    }

    fn is_enabled(&self, config: &FilterConfig) -> bool {
        config.filter_consulting
    }

    fn exclusion_mask(&self, table: &Table, _config: &FilterConfig) -> Result<Vec<bool>> {
        let firms: Vec<String> = CONSULTING_FIRMS.iter().map(|firm| firm.to_string()).collect();
        Ok(table
            .iter()
            .map(|row| company_matches(row.text("current_company").as_deref(), &firms))
            .collect())
    }
}
