//! # Screening Orchestrator
//!
//! This module coordinates one screening run:
//! 1. Prepare: project raw exports onto the screening schema
//! 2. Prefilter: run the standard exclusion chain and log its stats
//! 3. Screen: score the survivors one at a time against the job description
//! 4. Persist: upsert rows and verdicts into the profile store
//!
//! Every network step is sequential with a fixed pause between calls, and
//! no single profile can fail the run.

use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{info, warn};

use pipeline::{needs_projection, ColumnProjector, FilterConfig, FilterPipeline, FilterStats};
use profile_loader::Table;
use profile_store::ProfileStore;
use screening_client::{screen_profile, ScoringEngine, ScreenedCandidate};

use crate::report::ScreeningReport;

/// Pause between consecutive scoring calls.
pub const SCREENING_PAUSE: Duration = Duration::from_millis(500);

/// Profiles screened when the caller gives no count.
pub const DEFAULT_SCREEN_COUNT: usize = 5;

/// Outcome of writing rows or verdicts to the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PersistStats {
    pub stored: usize,
    pub failed: usize,
}

/// Upsert every row of a flat table. Failures are counted and logged.
pub async fn persist_profiles(table: &Table, store: &ProfileStore) -> PersistStats {
    let mut stats = PersistStats::default();
    for (i, row) in table.iter().enumerate() {
        match store.upsert_profile(row).await {
            Ok(_) => stats.stored += 1,
            Err(e) => {
                warn!("Could not store row {}: {}", i + 1, e);
                stats.failed += 1;
            }
        }
    }
    info!("Stored {} profiles ({} failed)", stats.stored, stats.failed);
    stats
}

/// Main orchestrator that coordinates a screening run
pub struct ScreeningOrchestrator<E: ScoringEngine> {
    engine: E,
    projector: ColumnProjector,
    pipeline: FilterPipeline,
    pause: Duration,
}

impl<E: ScoringEngine> ScreeningOrchestrator<E> {
    /// Create an orchestrator with today's projector and the standard chain.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            projector: ColumnProjector::today(),
            pipeline: FilterPipeline::standard(),
            pause: SCREENING_PAUSE,
        }
    }

    pub fn with_projector(mut self, projector: ColumnProjector) -> Self {
        self.projector = projector;
        self
    }

    pub fn with_pause(mut self, pause: Duration) -> Self {
        self.pause = pause;
        self
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Project raw exports; flat tables pass through unchanged.
    pub fn prepare(&self, table: &Table) -> Table {
        if needs_projection(table) {
            info!("Projecting {} raw profiles onto the screening schema", table.len());
        }
        self.projector.project(table)
    }

    /// Run the standard filter chain.
    pub fn prefilter(&self, table: &Table, config: &FilterConfig) -> Result<(Table, FilterStats)> {
        let (kept, stats) = self.pipeline.apply(table, config)?;
        for stage in &stats.stages {
            info!("Filter {}: removed {}", stage.name, stage.removed);
        }
        info!(
            "Prefilter kept {} of {} profiles ({}%)",
            stats.final_count,
            stats.original,
            stats.keep_rate_percent()
        );
        Ok((kept, stats))
    }

    /// Screen the first `limit` rows, in order, one call at a time.
    pub async fn screen(&self, table: &Table, job_description: &str, limit: usize) -> ScreeningReport {
        let start_time = Instant::now();
        let total = limit.min(table.len());
        let mut screened = Vec::with_capacity(total);

        for (i, row) in table.iter().take(total).enumerate() {
            info!("Screening profile {}/{}...", i + 1, total);
            let profile = row.to_json();
            let result = screen_profile(&self.engine, &profile, job_description).await;
            if result.is_error() {
                warn!("Profile {} could not be screened: {}", i + 1, result.summary);
            }
            screened.push(ScreenedCandidate::from_profile(&profile, i + 1, result));

            if i + 1 < total && !self.pause.is_zero() {
                tokio::time::sleep(self.pause).await;
            }
        }

        let report = ScreeningReport::new(screened);
        info!("{} in {:.2?}", report.summary_line(), start_time.elapsed());
        report
    }

    /// Upsert every row. Failures are counted and logged.
    pub async fn persist(&self, table: &Table, store: &ProfileStore) -> PersistStats {
        persist_profiles(table, store).await
    }

    /// Record verdicts against their profiles. Candidates without a URL
    /// count as failed.
    pub async fn persist_screening(&self, report: &ScreeningReport, store: &ProfileStore) -> PersistStats {
        let mut stats = PersistStats::default();
        for candidate in report.candidates() {
            if candidate.linkedin_url.is_empty() {
                warn!("No profile URL for {}, verdict not stored", candidate.name);
                stats.failed += 1;
                continue;
            }
            match store.update_screening(&candidate.linkedin_url, &candidate.result).await {
                Ok(_) => stats.stored += 1,
                Err(e) => {
                    warn!("Could not store verdict for {}: {}", candidate.name, e);
                    stats.failed += 1;
                }
            }
        }
        stats
    }
}
