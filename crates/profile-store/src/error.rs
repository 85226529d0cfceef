//! Error types for the profile-store crate.
//!
//! Per-profile problems inside a bulk upsert are counted, not raised. What
//! reaches the caller as an error is a failed HTTP call or a profile with no
//! key to store it under.

use thiserror::Error;

/// Errors that can occur while talking to the profile store
#[derive(Error, Debug)]
pub enum StoreError {
    /// Neither `linkedin_url` nor `public_url` is set
    #[error("linkedin_url is required")]
    MissingLinkedinUrl,

    /// The request never got a response
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The REST API answered with a non-success status
    #[error("Store API returned {status}: {body}")]
    Api { status: u16, body: String },

    /// A response body could not be parsed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, StoreError>;
