//! Filter configuration: toggles plus optional reference lists.

use serde::{Deserialize, Serialize};

/// Which exclusion filters run, and the lists they match against.
///
/// Every field has a "do nothing" default, so `FilterConfig::default()` runs
/// no stage at all. `FilterConfig::recommended()` mirrors the defaults the
/// screening desk uses: every toggle on, no lists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Names of people already in the hiring process. `Some(vec![])` still
    /// enables the stage (it just removes nobody).
    pub past_candidates: Option<Vec<String>>,
    pub blacklist: Vec<String>,
    pub not_relevant: Vec<String>,
    /// Also search past positions for not-relevant companies.
    pub not_relevant_past: bool,
    pub filter_job_hoppers: bool,
    pub filter_consulting: bool,
    pub filter_long_tenure: bool,
    pub filter_management: bool,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// All toggles on, no reference lists.
    pub fn recommended() -> Self {
        Self {
            not_relevant_past: true,
            filter_job_hoppers: true,
            filter_consulting: true,
            filter_long_tenure: true,
            filter_management: true,
            ..Self::default()
        }
    }

    pub fn with_past_candidates(mut self, names: Vec<String>) -> Self {
        self.past_candidates = Some(names);
        self
    }

    pub fn with_blacklist(mut self, companies: Vec<String>) -> Self {
        self.blacklist = companies;
        self
    }

    pub fn with_not_relevant(mut self, companies: Vec<String>) -> Self {
        self.not_relevant = companies;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_enables_nothing() {
        let config = FilterConfig::default();
        assert!(config.past_candidates.is_none());
        assert!(!config.filter_job_hoppers);
        assert!(!config.filter_management);
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FilterConfig =
            serde_json::from_str(r#"{"blacklist": ["Infosys"], "filter_long_tenure": true}"#).unwrap();

        assert_eq!(config.blacklist, vec!["Infosys".to_string()]);
        assert!(config.filter_long_tenure);
        assert!(!config.filter_consulting);
        assert!(config.not_relevant.is_empty());
    }
}
