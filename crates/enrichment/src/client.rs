//! Crust Data person-enrichment client.

use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};

pub const DEFAULT_BASE_URL: &str = "https://api.crustdata.com";
const ENRICH_PATH: &str = "/screener/person/enrich";

/// Client for the person-enrichment endpoint.
pub struct CrustDataClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// One `{error, linkedin_url}` record per URL, for a batch that failed.
pub fn error_records(urls: &[String], message: &str) -> Vec<Value> {
    urls.iter()
        .map(|url| json!({ "error": message, "linkedin_url": url }))
        .collect()
}

/// Normalize a 200 response body: a list is kept, anything else is wrapped.
pub fn response_records(body: Value) -> Vec<Value> {
    match body {
        Value::Array(records) => records,
        other => vec![other],
    }
}

impl CrustDataClient {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Enrich one batch of profile URLs.
    ///
    /// Never fails: a transport error or non-200 status comes back as one
    /// error record per URL.
    #[instrument(skip(self, urls), fields(batch_size = urls.len()))]
    pub async fn enrich_batch(&self, urls: &[String]) -> Vec<Value> {
        match self.fetch(urls).await {
            Ok(records) => records,
            Err(e) => {
                error!("Enrichment batch failed: {:#}", e);
                error_records(urls, &format!("{:#}", e))
            }
        }
    }

    async fn fetch(&self, urls: &[String]) -> Result<Vec<Value>> {
        let joined = urls.join(",");
        debug!("Requesting enrichment for {} profiles", urls.len());

        let response = self
            .client
            .get(format!("{}{}", self.base_url, ENRICH_PATH))
            .query(&[("linkedin_profile_url", joined.as_str())])
            .header("Authorization", format!("Token {}", self.api_key))
            .send()
            .await
            .context("Failed to send request to Crust Data")?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Crust Data returned {}: {}", status, body);
            return Ok(error_records(urls, &body));
        }

        let body: Value = response
            .json()
            .await
            .context("Failed to parse Crust Data response")?;
        Ok(response_records(body))
    }
}
