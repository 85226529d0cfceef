//! Projection and pre-screening filters for candidate profile tables.
//!
//! This crate provides:
//! - ColumnProjector for turning raw scraped tables into the screening schema
//! - Filter trait and the eight exclusion stages
//! - FilterPipeline for composing stages, with per-stage FilterStats
//!
//! ## Architecture
//! A batch goes through two steps:
//! 1. The projector derives current role, tenure, history, education and
//!    skills from numbered source columns (raw input only)
//! 2. Filters remove candidates not worth screening, in a fixed order,
//!    each counted against what the previous stage left
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{ColumnProjector, FilterConfig, FilterPipeline};
//!
//! let table = ColumnProjector::today().project(&raw);
//! let config = FilterConfig::recommended().with_blacklist(blacklist);
//! let (kept, stats) = FilterPipeline::standard().apply(&table, &config)?;
//! ```

pub mod config;
pub mod filter_pipeline;
pub mod filters;
pub mod matching;
pub mod projector;
pub mod stats;
pub mod tenure;
pub mod traits;

// Re-export main types
pub use config::FilterConfig;
pub use filter_pipeline::FilterPipeline;
pub use projector::{needs_projection, ColumnProjector, SCREENING_COLUMNS};
pub use stats::{FilterStats, StageStat};
pub use traits::Filter;
