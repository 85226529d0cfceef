//! Scoring-engine client for screening candidate profiles.
//!
//! This crate provides:
//! - The `ScoringEngine` trait every screening backend implements
//! - `OpenAiScorer`, a chat-completions implementation
//! - `screen_profile`, which turns any failure into an error verdict so a
//!   batch never stops on one profile
//! - The verdict types shared with the store and the reports

pub mod openai;
pub mod prompt;
pub mod types;

use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use tracing::warn;

pub use openai::{parse_verdict, OpenAiScorer};
pub use prompt::screening_prompt;
pub use types::{FitLevel, ScreenedCandidate, ScreeningResult};

/// Errors that can occur when talking to a scoring engine
#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Scoring API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid response from scoring engine: {0}")]
    InvalidResponse(String),
}

/// Anything that can judge a profile against a job description.
pub trait ScoringEngine: Send + Sync {
    fn score(
        &self,
        profile: &Value,
        job_description: &str,
    ) -> impl Future<Output = Result<ScreeningResult, ScreeningError>> + Send;
}

/// Screen one profile, never failing.
///
/// Errors are logged and come back as [`ScreeningResult::error`].
pub async fn screen_profile<E: ScoringEngine>(
    engine: &E,
    profile: &Value,
    job_description: &str,
) -> ScreeningResult {
    match engine.score(profile, job_description).await {
        Ok(result) => result,
        Err(e) => {
            warn!("Screening failed: {}", e);
            ScreeningResult::error(e)
        }
    }
}
