//! Screening crate for the recruiting pipeline.
//!
//! This crate contains the orchestrator that coordinates projection,
//! prefiltering, scoring and persistence, plus the application config and
//! the screening report exports.

pub mod config;
pub mod orchestrator;
pub mod report;

pub use config::AppConfig;
pub use orchestrator::{persist_profiles, PersistStats, ScreeningOrchestrator, DEFAULT_SCREEN_COUNT, SCREENING_PAUSE};
pub use report::ScreeningReport;
