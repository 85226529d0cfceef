//! Persistence for candidate profiles in a Supabase `profiles` table.
//!
//! This crate provides:
//! - `SupabaseClient`, a thin PostgREST client (select/insert/upsert/update/
//!   delete/count)
//! - `ProfileStore`, the profile operations the pipeline needs, keyed by
//!   normalized LinkedIn URL
//! - Pure payload builders and the enrichment refresh rule
//!
//! ## Refresh rule
//! A profile is re-enriched when it never was, or when `enriched_at` is more
//! than `ENRICHMENT_REFRESH_MONTHS × 30` days old.

pub mod client;
pub mod error;
pub mod records;
pub mod store;

pub use client::{parse_content_range, SupabaseClient};
pub use error::{Result, StoreError};
pub use records::{
    is_stale, normalize_linkedin_url, refresh_cutoff, search_payload, ProfileStatus, ENRICHMENT_REFRESH_MONTHS,
};
pub use store::{DedupStats, ALL_PROFILES_LIMIT, ProfileStore, UpsertStats};
