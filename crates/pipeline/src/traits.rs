//! Core traits for the filtering pipeline.
//!
//! This module defines the Filter trait that allows composable,
//! independently testable exclusion stages to be chained over a profile
//! table.

use crate::config::FilterConfig;
use anyhow::Result;
use profile_loader::Table;

/// Core trait for exclusion stages.
///
/// All stages must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - A stage never edits a row; it only decides which rows go
/// - `exclusion_mask` is computed against the table the stage receives, so
///   counts are relative to what earlier stages left behind
/// - `Send + Sync` allows a built pipeline to be shared between tasks
pub trait Filter: Send + Sync {
    /// Stat key for this stage (e.g. "blacklist")
    fn name(&self) -> &str;

    /// Whether the configuration switches this stage on.
    fn is_enabled(&self, config: &FilterConfig) -> bool;

    /// One entry per row: `true` means the row is removed.
    fn exclusion_mask(&self, table: &Table, config: &FilterConfig) -> Result<Vec<bool>>;

    /// Apply this stage.
    ///
    /// # Returns
    /// * `Ok((Table, usize))` - A new table without the excluded rows, and
    ///   how many rows were removed
    /// * `Err` - If the stage fails
    fn apply(&self, table: &Table, config: &FilterConfig) -> Result<(Table, usize)> {
        let mask = self.exclusion_mask(table, config)?;
        let removed = mask.iter().filter(|excluded| **excluded).count();
        Ok((table.without_rows(&mask), removed))
    }
}
