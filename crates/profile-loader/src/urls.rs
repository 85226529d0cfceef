//! Pull LinkedIn profile URLs out of an upload.
//!
//! Used to build the input list for enrichment. Uploads come from many tools,
//! so the URL may live under one of several keys or column names.

use crate::error::{LoadError, Result};
use crate::parser::{extension, open};
use std::path::Path;

/// Object keys checked, in order, in a JSON upload.
const JSON_URL_KEYS: [&str; 5] = ["url", "linkedin_url", "profile_url", "linkedinUrl", "public_url"];

/// Column names checked, in order, in a CSV upload.
const CSV_URL_COLUMNS: [&str; 9] = [
    "url",
    "linkedin_url",
    "profile_url",
    "URL",
    "LinkedIn URL",
    "linkedinUrl",
    "LinkedIn",
    "linkedin",
    "public_url",
];

/// Extract LinkedIn URLs from a CSV or JSON upload.
///
/// Non-LinkedIn values are dropped and scheme-less URLs get `https://`.
pub fn extract_urls(path: &Path) -> Result<Vec<String>> {
    let raw = match extension(path).as_deref() {
        Some("json") => urls_from_json(path)?,
        Some("csv") => urls_from_csv(path)?,
        _ => {
            return Err(LoadError::UnsupportedFormat {
                path: path.display().to_string(),
            });
        }
    };
    Ok(raw.iter().filter_map(|u| normalize_profile_url(u)).collect())
}

fn urls_from_json(path: &Path) -> Result<Vec<String>> {
    let document: serde_json::Value = serde_json::from_reader(open(path)?)?;
    let Some(items) = document.as_array() else {
        return Ok(Vec::new());
    };

    let urls = items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(object) => JSON_URL_KEYS
                .iter()
                .filter_map(|key| object.get(*key).and_then(|v| v.as_str()))
                .find(|s| !s.is_empty())
                .map(|s| s.to_string()),
            _ => None,
        })
        .collect();
    Ok(urls)
}

fn urls_from_csv(path: &Path) -> Result<Vec<String>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(open(path)?);
    let headers = reader.headers()?.clone();

    let column = CSV_URL_COLUMNS
        .iter()
        .find_map(|name| headers.iter().position(|h| h == *name));

    let mut urls = Vec::new();
    for result in reader.records() {
        let record = result?;
        // Fall back to the first column when no known header is present
        if let Some(value) = record.get(column.unwrap_or(0)) {
            if !value.is_empty() {
                urls.push(value.to_string());
            }
        }
    }
    Ok(urls)
}

/// Keep only LinkedIn URLs and make sure they carry a scheme.
pub fn normalize_profile_url(raw: &str) -> Option<String> {
    if !raw.contains("linkedin.com") {
        return None;
    }
    let url = raw.trim();
    if url.starts_with("http") {
        Some(url.to_string())
    } else {
        Some(format!("https://{}", url))
    }
}
