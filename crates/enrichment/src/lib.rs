//! # Enrichment Crate
//!
//! Fetches full LinkedIn profile data for a list of profile URLs from the
//! Crust Data person-enrichment API.
//!
//! ## Components
//!
//! ### CrustDataClient
//! One request per batch of comma-joined URLs. A failed batch yields one
//! `{error, linkedin_url}` record per URL instead of an error, so callers
//! always get a record for every URL they sent.
//!
//! ### Batching
//! `enrich_all` walks the URL list in fixed-size batches with a pause
//! between them to stay inside the API's rate limits.
//!
//! ## Example Usage
//!
//! ```ignore
//! use enrichment::{CrustDataClient, BATCH_PAUSE};
//!
//! let client = CrustDataClient::new(api_key)?;
//! let records = client.enrich_all(&urls, 10, BATCH_PAUSE).await;
//! ```

pub mod batch;
pub mod client;

pub use batch::{batch_count, enrich_in_batches, BATCH_PAUSE, DEFAULT_BATCH_SIZE};
pub use client::{error_records, CrustDataClient};
