//! Per-stage removal statistics for one filter run.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Rows removed by one stage, counted against that stage's input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageStat {
    pub name: String,
    pub removed: usize,
}

/// Ordered statistics for a filter run.
///
/// Stage counts are sequential: a row dropped by an early stage is never
/// seen, and never counted, by a later one. Only stages that ran appear.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterStats {
    pub original: usize,
    pub stages: Vec<StageStat>,
    pub final_count: usize,
    pub total_removed: usize,
}

impl FilterStats {
    pub fn new(original: usize) -> Self {
        Self {
            original,
            stages: Vec::new(),
            final_count: original,
            total_removed: 0,
        }
    }

    pub(crate) fn record_stage(&mut self, name: &str, removed: usize) {
        self.stages.push(StageStat {
            name: name.to_string(),
            removed,
        });
        self.final_count = self.final_count.saturating_sub(removed);
        self.total_removed = self.original - self.final_count;
    }

    /// Rows removed by a named stage, `None` if the stage did not run.
    pub fn removed_by(&self, name: &str) -> Option<usize> {
        self.stages.iter().find(|s| s.name == name).map(|s| s.removed)
    }

    /// Share of the original rows that survived, as a rounded percentage.
    pub fn keep_rate_percent(&self) -> u32 {
        if self.original == 0 {
            return 0;
        }
        ((self.final_count as f64 / self.original as f64) * 100.0).round() as u32
    }
}

impl Serialize for FilterStats {
    /// `{original, <stage>: removed, ..., final, total_removed}`
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.stages.len() + 3))?;
        map.serialize_entry("original", &self.original)?;
        for stage in &self.stages {
            map.serialize_entry(&stage.name, &stage.removed)?;
        }
        map.serialize_entry("final", &self.final_count)?;
        map.serialize_entry("total_removed", &self.total_removed)?;
        map.end()
    }
}
