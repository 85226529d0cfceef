//! The FilterPipeline orchestrates the exclusion stages.
//!
//! This module provides the main FilterPipeline struct that chains
//! stages together using the builder pattern and keeps per-stage stats.

use crate::config::FilterConfig;
use crate::filters::*;
use crate::stats::FilterStats;
use crate::traits::Filter;
use anyhow::{Context, Result};
use profile_loader::Table;

/// Chains multiple filters together into a processing pipeline.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(BlacklistFilter)
///     .add_filter(JobHoppersFilter);
///
/// let (kept, stats) = pipeline.apply(&table, &config)?;
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// The eight screening stages in their fixed order.
    pub fn standard() -> Self {
        Self::new()
            .add_filter(PastCandidatesFilter)
            .add_filter(BlacklistFilter)
            .add_filter(NotRelevantCurrentFilter)
            .add_filter(NotRelevantPastFilter)
            .add_filter(JobHoppersFilter)
            .add_filter(ConsultingFilter)
            .add_filter(LongTenureFilter)
            .add_filter(ManagementTitlesFilter)
    }

    /// Add a filter to the pipeline (builder pattern).
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Stage names in run order.
    pub fn stage_names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Apply every enabled stage in sequence.
    ///
    /// ## Algorithm
    /// 1. Start with the input table
    /// 2. For each stage in order:
    ///    a. Skip it when the config leaves it disabled (no stat entry)
    ///    b. Apply it to the previous stage's output
    ///    c. Record how many rows it removed
    /// 3. Return the final table and the stats
    ///
    /// # Returns
    /// * `Ok((Table, FilterStats))` - The surviving rows and per-stage counts
    /// * `Err` - If any stage fails; no partial table is returned
    pub fn apply(&self, table: &Table, config: &FilterConfig) -> Result<(Table, FilterStats)> {
        let mut stats = FilterStats::new(table.len());
        let mut current = table.clone();

        for filter in &self.filters {
            if !filter.is_enabled(config) {
                tracing::debug!("Skipping disabled filter: {}", filter.name());
                continue;
            }
            tracing::debug!(
                "Applying filter: {} (input count: {})",
                filter.name(),
                current.len()
            );
            let (kept, removed) = filter
                .apply(&current, config)
                .with_context(|| format!("filter stage '{}' failed", filter.name()))?;
            stats.record_stage(filter.name(), removed);
            tracing::debug!(
                "Filter applied: {} (output count: {}, removed: {})",
                filter.name(),
                kept.len(),
                removed
            );
            current = kept;
        }

        Ok((current, stats))
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}
