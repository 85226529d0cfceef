//! Exclusion stages for the pre-screening pipeline.
//!
//! This module contains all the concrete stages that can be composed into a
//! FilterPipeline. `FilterPipeline::standard()` chains them in the order
//! they are listed here.

pub mod past_candidates;
pub mod blacklist;
pub mod not_relevant;
pub mod job_hoppers;
pub mod consulting;
pub mod long_tenure;
pub mod management_titles;

// Re-export for convenience
pub use past_candidates::PastCandidatesFilter;
pub use blacklist::BlacklistFilter;
pub use not_relevant::{NotRelevantCurrentFilter, NotRelevantPastFilter};
pub use job_hoppers::JobHoppersFilter;
pub use consulting::ConsultingFilter;
pub use long_tenure::LongTenureFilter;
pub use management_titles::ManagementTitlesFilter;
