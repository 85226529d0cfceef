//! Row payloads for the `profiles` table.
//!
//! Everything here is pure: the store module sends what these functions
//! build. Timestamps are passed in so payloads are reproducible in tests.

use crate::error::{Result, StoreError};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use profile_loader::{CellValue, Record};
use screening_client::ScreeningResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Profiles enriched more recently than this are not enriched again.
pub const ENRICHMENT_REFRESH_MONTHS: u32 = 6;

/// Where a profile is in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProfileStatus {
    Scraped,
    Enriched,
    Screened,
}

impl ProfileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProfileStatus::Scraped => "scraped",
            ProfileStatus::Enriched => "enriched",
            ProfileStatus::Screened => "screened",
        }
    }
}

impl fmt::Display for ProfileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Canonical form of a profile URL, used as the store key.
///
/// Trims surrounding whitespace and trailing slashes, then drops the query
/// string and lowercases. A slash before the query is kept, so
/// `.../in/dana/?trk=x` keys as `.../in/dana/`, matching rows already stored.
pub fn normalize_linkedin_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    let url = url.split('?').next().unwrap_or(url);
    url.to_lowercase()
}

/// Start of the freshness window: `months × 30` days before `now`.
pub fn refresh_cutoff(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now - Duration::days(i64::from(months) * 30)
}

/// Whether a profile enriched at `enriched_at` is due for another pass.
pub fn is_stale(enriched_at: Option<DateTime<Utc>>, now: DateTime<Utc>, months: u32) -> bool {
    match enriched_at {
        None => true,
        Some(at) => at < refresh_cutoff(now, months),
    }
}

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Columns copied from a table row by `profile_payload`.
pub const PROFILE_FIELDS: [&str; 10] = [
    "first_name",
    "last_name",
    "headline",
    "location",
    "current_title",
    "current_company",
    "current_years_in_role",
    "skills",
    "summary",
    "email",
];

fn has_content(cell: &CellValue) -> bool {
    match cell {
        CellValue::Missing => false,
        CellValue::Text(s) => !s.trim().is_empty(),
        CellValue::Float(f) => !f.is_nan(),
        _ => true,
    }
}

/// The key for a table row: `linkedin_url`, else `public_url`, normalized.
pub fn record_key(record: &Record) -> Option<String> {
    ["linkedin_url", "public_url"]
        .iter()
        .filter_map(|column| record.text(column))
        .map(|url| normalize_linkedin_url(&url))
        .find(|url| !url.is_empty())
}

/// Upsert payload for one projected table row.
pub fn profile_payload(record: &Record, now: DateTime<Utc>) -> Result<Value> {
    let key = record_key(record).ok_or(StoreError::MissingLinkedinUrl)?;

    let mut data = Map::new();
    data.insert("linkedin_url".into(), Value::String(key));
    data.insert("updated_at".into(), Value::String(timestamp(now)));
    for field in PROFILE_FIELDS {
        let cell = record.get(field);
        if has_content(cell) {
            data.insert(field.into(), cell.to_json());
        }
    }
    Ok(Value::Object(data))
}

fn str_field<'a>(profile: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| profile.get(*key))
        .find(|value| match value {
            Value::Null => false,
            Value::String(s) => !s.is_empty(),
            _ => true,
        })
}

/// Key for a scraped profile: `linkedin_url`, `public_url` or
/// `defaultProfileUrl`, normalized.
pub fn scraped_key(profile: &Value) -> Option<String> {
    str_field(profile, &["linkedin_url", "public_url", "defaultProfileUrl"])
        .and_then(Value::as_str)
        .map(normalize_linkedin_url)
        .filter(|url| !url.is_empty())
}

/// Upsert payload for a scraper export row.
///
/// Scrapers use camelCase for some fields; both spellings are accepted. The
/// raw profile is kept under `phantombuster_data`. An existing status is kept,
/// new rows start as `scraped` with a `created_at`.
pub fn scraped_payload(
    key: &str,
    profile: &Value,
    existing_status: Option<&str>,
    now: DateTime<Utc>,
) -> Value {
    let mut data = Map::new();
    data.insert("linkedin_url".into(), Value::String(key.to_string()));

    let fields: [(&str, &[&str]); 9] = [
        ("first_name", &["first_name", "firstName"]),
        ("last_name", &["last_name", "lastName"]),
        ("headline", &["headline"]),
        ("location", &["location"]),
        ("current_title", &["current_title", "title"]),
        ("current_company", &["current_company", "company"]),
        ("current_years_in_role", &["current_years_in_role"]),
        ("skills", &["skills"]),
        ("summary", &["summary"]),
    ];
    for (column, sources) in fields {
        if let Some(value) = str_field(profile, sources) {
            data.insert(column.into(), value.clone());
        }
    }

    data.insert("phantombuster_data".into(), profile.clone());
    data.insert("updated_at".into(), Value::String(timestamp(now)));
    match existing_status {
        Some(status) => {
            data.insert("status".into(), Value::String(status.to_string()));
        }
        None => {
            data.insert("status".into(), Value::String(ProfileStatus::Scraped.to_string()));
            data.insert("created_at".into(), Value::String(timestamp(now)));
        }
    }
    Value::Object(data)
}

/// Upsert payload after enrichment. Identity fields and the current role are
/// lifted from the response when present.
pub fn enrichment_payload(linkedin_url: &str, response: &Value, now: DateTime<Utc>) -> Value {
    let mut data = Map::new();
    data.insert("linkedin_url".into(), Value::String(normalize_linkedin_url(linkedin_url)));
    data.insert("crustdata_data".into(), response.clone());
    data.insert("enriched_at".into(), Value::String(timestamp(now)));
    data.insert("status".into(), Value::String(ProfileStatus::Enriched.to_string()));

    let mut lift = |column: &str, value: Option<&Value>| {
        if let Some(value) = value.filter(|v| !v.is_null()) {
            data.insert(column.to_string(), value.clone());
        }
    };
    for column in ["first_name", "last_name", "headline", "location", "summary"] {
        lift(column, response.get(column));
    }
    if let Some(current) = response
        .get("positions")
        .and_then(Value::as_array)
        .and_then(|positions| positions.first())
    {
        lift("current_title", current.get("title"));
        lift("current_company", current.get("company_name"));
    }
    Value::Object(data)
}

/// Upsert payload after screening. The recommendation is stored as the
/// reasoning.
pub fn screening_payload(linkedin_url: &str, result: &ScreeningResult, now: DateTime<Utc>) -> Value {
    serde_json::json!({
        "linkedin_url": normalize_linkedin_url(linkedin_url),
        "screening_score": result.score,
        "screening_fit_level": result.fit.as_str(),
        "screening_summary": result.summary,
        "screening_reasoning": result.recommendation,
        "screened_at": timestamp(now),
        "status": ProfileStatus::Screened.as_str(),
    })
}

/// Insert payload for a `searches` row. Absent fields are sent as null.
pub fn search_payload(name: &str, agent_id: Option<&str>, search_url: Option<&str>) -> Value {
    let mut data = Map::new();
    data.insert("name".into(), Value::String(name.to_string()));
    data.insert("phantombuster_agent_id".into(), agent_id.map_or(Value::Null, |id| Value::String(id.to_string())));
    data.insert("search_url".into(), search_url.map_or(Value::Null, |url| Value::String(url.to_string())));
    Value::Object(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_normalize_linkedin_url() {
        assert_eq!(
            normalize_linkedin_url("  https://www.LinkedIn.com/in/Dana-Levi?trk=search "),
            "https://www.linkedin.com/in/dana-levi"
        );
        assert_eq!(normalize_linkedin_url("https://linkedin.com/in/a/"), "https://linkedin.com/in/a");
        assert_eq!(normalize_linkedin_url("   "), "");
    }

    #[test]
    fn test_slash_before_query_is_kept() {
        assert_eq!(
            normalize_linkedin_url("https://www.LinkedIn.com/in/Dana/?trk=abc"),
            "https://www.linkedin.com/in/dana/"
        );
        assert_eq!(
            normalize_linkedin_url("https://www.linkedin.com/in/dana/?a=1/"),
            "https://www.linkedin.com/in/dana/"
        );
    }

    #[test]
    fn test_refresh_cutoff_and_staleness() {
        let cutoff = refresh_cutoff(now(), ENRICHMENT_REFRESH_MONTHS);
        assert_eq!(cutoff, Utc.with_ymd_and_hms(2024, 1, 3, 12, 0, 0).unwrap());

        assert!(is_stale(None, now(), 6));
        assert!(is_stale(Some(Utc.with_ymd_and_hms(2023, 12, 1, 0, 0, 0).unwrap()), now(), 6));
        assert!(!is_stale(Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()), now(), 6));
    }

    #[test]
    fn test_profile_payload() {
        let record = Record::new()
            .with("public_url", "https://linkedin.com/in/Dana/")
            .with("first_name", "Dana")
            .with("headline", "")
            .with("current_years_in_role", CellValue::Float(4.0))
            .with("past_positions", "ignored");

        let payload = profile_payload(&record, now()).unwrap();

        assert_eq!(
            payload,
            json!({
                "linkedin_url": "https://linkedin.com/in/dana",
                "updated_at": "2024-07-01T12:00:00.000000Z",
                "first_name": "Dana",
                "current_years_in_role": 4.0
            })
        );
    }

    #[test]
    fn test_profile_payload_requires_key() {
        let record = Record::new().with("first_name", "Dana").with("linkedin_url", "  ");
        assert!(matches!(
            profile_payload(&record, now()),
            Err(StoreError::MissingLinkedinUrl)
        ));
    }

    #[test]
    fn test_scraped_payload_new_and_existing() {
        let profile = json!({
            "defaultProfileUrl": "https://linkedin.com/in/noa?x=1",
            "firstName": "Noa",
            "company": "Wix",
            "headline": null
        });
        let key = scraped_key(&profile).unwrap();

        let fresh = scraped_payload(&key, &profile, None, now());
        let existing = scraped_payload(&key, &profile, Some("enriched"), now());

        assert_eq!(key, "https://linkedin.com/in/noa");
        assert_eq!(fresh["first_name"], "Noa");
        assert_eq!(fresh["current_company"], "Wix");
        assert!(fresh.get("headline").is_none());
        assert_eq!(fresh["status"], "scraped");
        assert!(fresh.get("created_at").is_some());
        assert_eq!(existing["status"], "enriched");
        assert!(existing.get("created_at").is_none());
        assert_eq!(existing["phantombuster_data"], profile);
    }

    #[test]
    fn test_enrichment_payload() {
        let response = json!({
            "first_name": "Omer",
            "summary": null,
            "positions": [{"title": "Engineer", "company_name": "Gong"}, {"title": "Intern"}]
        });

        let payload = enrichment_payload("https://linkedin.com/in/Omer/", &response, now());

        assert_eq!(payload["linkedin_url"], "https://linkedin.com/in/omer");
        assert_eq!(payload["status"], "enriched");
        assert_eq!(payload["current_title"], "Engineer");
        assert_eq!(payload["current_company"], "Gong");
        assert!(payload.get("summary").is_none());
        assert_eq!(payload["crustdata_data"], response);
    }

    #[test]
    fn test_screening_payload() {
        let payload = screening_payload("https://linkedin.com/in/a", &ScreeningResult::error("x"), now());

        assert_eq!(payload["screening_score"], 0);
        assert_eq!(payload["screening_fit_level"], "Error");
        assert_eq!(payload["screening_reasoning"], "Could not screen");
        assert_eq!(payload["status"], "screened");
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(serde_json::to_string(&ProfileStatus::Enriched).unwrap(), "\"enriched\"");
    }

    #[test]
    fn test_search_payload() {
        assert_eq!(
            search_payload("Backend TLV", Some("agent-7"), None),
            json!({"name": "Backend TLV", "phantombuster_agent_id": "agent-7", "search_url": null})
        );
    }
}
