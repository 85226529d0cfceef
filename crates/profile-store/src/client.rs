//! Minimal PostgREST client for a Supabase project.
//!
//! Filters are passed straight through as query parameters in PostgREST
//! syntax (`("status", "eq.enriched")`, `("enriched_at", "is.null")`).

use crate::error::{Result, StoreError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};

const RETURN_REPRESENTATION: &str = "return=representation";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";
const COUNT_EXACT: &str = "count=exact";

/// Total from a `Content-Range` header such as `0-24/3573` or `*/0`.
/// An unknown total (`*`) or unparseable value counts as zero.
pub fn parse_content_range(header: &str) -> u64 {
    header
        .rsplit('/')
        .next()
        .and_then(|total| total.trim().parse().ok())
        .unwrap_or(0)
}

/// `eq.` filters for update and delete.
pub fn eq_filters(filters: &[(&str, &str)]) -> Vec<(String, String)> {
    filters
        .iter()
        .map(|(column, value)| (column.to_string(), format!("eq.{value}")))
        .collect()
}

fn rows(body: &str) -> Result<Vec<Value>> {
    if body.trim().is_empty() {
        return Ok(Vec::new());
    }
    match serde_json::from_str(body)? {
        Value::Array(rows) => Ok(rows),
        other => Ok(vec![other]),
    }
}

/// Client for `{url}/rest/v1/{table}`.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    key: String,
}

impl SupabaseClient {
    pub fn new(url: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            base_url: url.into().trim_end_matches('/').to_string(),
            key: key.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, table: &str, prefer: &'static str) -> RequestBuilder {
        let mut headers = HeaderMap::new();
        if let Ok(key) = HeaderValue::from_str(&self.key) {
            headers.insert("apikey", key);
        }
        headers.insert("Prefer", HeaderValue::from_static(prefer));

        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .headers(headers)
            .bearer_auth(&self.key)
    }

    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("Store API error {}: {}", status, body);
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_for_rows(request: RequestBuilder) -> Result<Vec<Value>> {
        let response = Self::check(request.send().await?).await?;
        rows(&response.text().await?)
    }

    /// Select rows. `filters` are PostgREST expressions.
    pub async fn select(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, String)],
        limit: Option<usize>,
    ) -> Result<Vec<Value>> {
        debug!("select {} from {} ({} filters)", columns, table, filters.len());
        let mut query: Vec<(String, String)> = vec![("select".to_string(), columns.to_string())];
        query.extend(filters.iter().map(|(k, v)| (k.to_string(), v.clone())));
        if let Some(limit) = limit {
            query.push(("limit".to_string(), limit.to_string()));
        }
        Self::send_for_rows(self.request(Method::GET, table, RETURN_REPRESENTATION).query(&query)).await
    }

    pub async fn insert(&self, table: &str, data: &Value) -> Result<Vec<Value>> {
        Self::send_for_rows(self.request(Method::POST, table, RETURN_REPRESENTATION).json(data)).await
    }

    /// Insert or merge on the `on_conflict` column.
    pub async fn upsert(&self, table: &str, data: &Value, on_conflict: Option<&str>) -> Result<Vec<Value>> {
        let request = match on_conflict {
            Some(column) => self
                .request(Method::POST, table, MERGE_DUPLICATES)
                .query(&[("on_conflict", column)]),
            None => self.request(Method::POST, table, RETURN_REPRESENTATION),
        };
        Self::send_for_rows(request.json(data)).await
    }

    pub async fn update(&self, table: &str, data: &Value, filters: &[(&str, &str)]) -> Result<Vec<Value>> {
        let request = self
            .request(Method::PATCH, table, RETURN_REPRESENTATION)
            .query(&eq_filters(filters))
            .json(data);
        Self::send_for_rows(request).await
    }

    pub async fn delete(&self, table: &str, filters: &[(&str, &str)]) -> Result<Vec<Value>> {
        let request = self
            .request(Method::DELETE, table, RETURN_REPRESENTATION)
            .query(&eq_filters(filters));
        Self::send_for_rows(request).await
    }

    /// Exact row count, read from the `Content-Range` header.
    pub async fn count(&self, table: &str, filters: &[(&str, String)]) -> Result<u64> {
        let mut query: Vec<(String, String)> = vec![("select".to_string(), "id".to_string())];
        query.extend(filters.iter().map(|(k, v)| (k.to_string(), v.clone())));

        let response = self
            .request(Method::GET, table, COUNT_EXACT)
            .header("Range-Unit", "items")
            .query(&query)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let total = response
            .headers()
            .get("Content-Range")
            .and_then(|value| value.to_str().ok())
            .map(parse_content_range)
            .unwrap_or(0);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range("0-24/3573"), 3573);
        assert_eq!(parse_content_range("*/0"), 0);
        assert_eq!(parse_content_range("0-9/*"), 0);
        assert_eq!(parse_content_range("garbage"), 0);
    }

    #[test]
    fn test_eq_filters() {
        assert_eq!(
            eq_filters(&[("linkedin_url", "https://linkedin.com/in/a")]),
            vec![("linkedin_url".to_string(), "eq.https://linkedin.com/in/a".to_string())]
        );
    }

    #[test]
    fn test_rows_from_body() {
        assert!(rows("").unwrap().is_empty());
        assert_eq!(rows(r#"[{"id": 1}, {"id": 2}]"#).unwrap().len(), 2);
        assert_eq!(rows(r#"{"id": 1}"#).unwrap(), vec![json!({"id": 1})]);
        assert!(rows("not json").is_err());
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = SupabaseClient::new("https://abc.supabase.co/", "key").unwrap();
        assert_eq!(client.base_url(), "https://abc.supabase.co");
    }
}
