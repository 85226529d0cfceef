//! Profile operations on top of the REST client.

use crate::client::SupabaseClient;
use crate::error::Result;
use crate::records::{
    enrichment_payload, normalize_linkedin_url, profile_payload, refresh_cutoff, scraped_key,
    scraped_payload, screening_payload, search_payload, timestamp, ProfileStatus, ENRICHMENT_REFRESH_MONTHS,
};
use chrono::Utc;
use profile_loader::Record;
use screening_client::{FitLevel, ScreeningResult};
use serde::Serialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

const PROFILES: &str = "profiles";
const SEARCHES: &str = "searches";
const PIPELINE_STATS: &str = "pipeline_stats";
const KEY_COLUMN: &str = "linkedin_url";
const URL_LIST_LIMIT: usize = 50_000;

/// Row cap for `all_profiles` when the caller has no better bound.
pub const ALL_PROFILES_LIMIT: usize = 10_000;

/// Outcome of a bulk scraper upsert.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UpsertStats {
    pub inserted: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// What a dedup pass against the store would skip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DedupStats {
    pub total_profiles: u64,
    pub recently_enriched: u64,
    pub will_skip: u64,
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn urls_of(rows: Vec<Value>) -> Vec<String> {
    rows.into_iter()
        .filter_map(|row| {
            row.get(KEY_COLUMN)
                .and_then(Value::as_str)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
        })
        .collect()
}

/// The `profiles` table, keyed by normalized LinkedIn URL.
pub struct ProfileStore {
    client: SupabaseClient,
}

impl ProfileStore {
    pub fn new(client: SupabaseClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &SupabaseClient {
        &self.client
    }

    async fn upsert_row(&self, data: &Value) -> Result<Option<Value>> {
        let rows = self.client.upsert(PROFILES, data, Some(KEY_COLUMN)).await?;
        Ok(rows.into_iter().next())
    }

    /// Insert or merge one table row. Fails when the row has no URL.
    pub async fn upsert_profile(&self, record: &Record) -> Result<Option<Value>> {
        let data = profile_payload(record, Utc::now())?;
        self.upsert_row(&data).await
    }

    /// Bulk upsert of scraper output. Never fails the batch: rows without a
    /// URL are skipped and failed rows are counted.
    ///
    /// With a `search_id`, the search's `profiles_found` is set to the number
    /// of profiles stored. A failed count update is logged, not raised.
    pub async fn upsert_scraped_profiles(&self, profiles: &[Value], search_id: Option<&str>) -> UpsertStats {
        let mut stats = UpsertStats::default();

        for profile in profiles {
            let Some(key) = scraped_key(profile) else {
                stats.skipped += 1;
                continue;
            };
            match self.upsert_scraped(&key, profile).await {
                Ok(true) => stats.updated += 1,
                Ok(false) => stats.inserted += 1,
                Err(e) => {
                    warn!("Error upserting profile {}: {}", key, e);
                    stats.errors += 1;
                }
            }
        }

        info!(
            "Scraped upsert: {} inserted, {} updated, {} skipped, {} errors",
            stats.inserted, stats.updated, stats.skipped, stats.errors
        );
        if let Some(search_id) = search_id {
            let found = (stats.inserted + stats.updated) as u64;
            if let Err(e) = self.update_search_count(search_id, found).await {
                warn!("Could not update profile count for search {}: {}", search_id, e);
            }
        }
        stats
    }

    /// Returns whether the profile already existed.
    async fn upsert_scraped(&self, key: &str, profile: &Value) -> Result<bool> {
        let existing = self
            .client
            .select(PROFILES, "id,enriched_at,status", &[(KEY_COLUMN, eq(key))], None)
            .await?;
        let existing_status = existing.first().map(|row| {
            row.get("status")
                .and_then(Value::as_str)
                .unwrap_or(ProfileStatus::Scraped.as_str())
                .to_string()
        });

        let data = scraped_payload(key, profile, existing_status.as_deref(), Utc::now());
        self.upsert_row(&data).await?;
        Ok(existing_status.is_some())
    }

    pub async fn update_enrichment(&self, linkedin_url: &str, response: &Value) -> Result<Option<Value>> {
        self.upsert_row(&enrichment_payload(linkedin_url, response, Utc::now())).await
    }

    pub async fn update_screening(&self, linkedin_url: &str, result: &ScreeningResult) -> Result<Option<Value>> {
        self.upsert_row(&screening_payload(linkedin_url, result, Utc::now())).await
    }

    pub async fn update_email(&self, linkedin_url: &str, email: &str, source: &str) -> Result<Value> {
        let key = normalize_linkedin_url(linkedin_url);
        self.client
            .update(
                PROFILES,
                &json!({ "email": email, "email_source": source }),
                &[(KEY_COLUMN, key.as_str())],
            )
            .await?;
        Ok(json!({ "linkedin_url": key, "email": email }))
    }

    pub async fn get_profile(&self, linkedin_url: &str) -> Result<Option<Value>> {
        let key = normalize_linkedin_url(linkedin_url);
        let rows = self.client.select(PROFILES, "*", &[(KEY_COLUMN, eq(&key))], None).await?;
        Ok(rows.into_iter().next())
    }

    /// Never-enriched profiles first, then stale ones, up to `limit`.
    pub async fn profiles_needing_enrichment(&self, limit: usize) -> Result<Vec<Value>> {
        let cutoff = timestamp(refresh_cutoff(Utc::now(), ENRICHMENT_REFRESH_MONTHS));

        let mut rows = self
            .client
            .select(PROFILES, "*", &[("enriched_at", "is.null".to_string())], Some(limit))
            .await?;
        let remaining = limit.saturating_sub(rows.len());
        if remaining > 0 {
            let stale = self
                .client
                .select(PROFILES, "*", &[("enriched_at", format!("lt.{cutoff}"))], Some(remaining))
                .await?;
            rows.extend(stale);
        }
        Ok(rows)
    }

    /// Enriched profiles without a screening score.
    pub async fn profiles_needing_screening(&self, limit: usize) -> Result<Vec<Value>> {
        let filters = [
            ("status", eq(ProfileStatus::Enriched.as_str())),
            ("screening_score", "is.null".to_string()),
        ];
        self.client.select(PROFILES, "*", &filters, Some(limit)).await
    }

    pub async fn profiles_by_status(&self, status: ProfileStatus, limit: usize) -> Result<Vec<Value>> {
        self.client
            .select(PROFILES, "*", &[("status", eq(status.as_str()))], Some(limit))
            .await
    }

    pub async fn profiles_by_fit_level(&self, fit: FitLevel, limit: usize) -> Result<Vec<Value>> {
        self.client
            .select(PROFILES, "*", &[("screening_fit_level", eq(fit.as_str()))], Some(limit))
            .await
    }

    pub async fn all_profiles(&self, limit: usize) -> Result<Vec<Value>> {
        self.client.select(PROFILES, "*", &[], Some(limit)).await
    }

    /// Funnel counts from the `pipeline_stats` view. Empty when the view is
    /// missing or unreachable.
    pub async fn pipeline_stats(&self) -> Map<String, Value> {
        match self.client.select(PIPELINE_STATS, "*", &[], None).await {
            Ok(rows) => match rows.into_iter().next() {
                Some(Value::Object(stats)) => stats,
                _ => Map::new(),
            },
            Err(e) => {
                warn!("Pipeline stats unavailable: {}", e);
                Map::new()
            }
        }
    }

    /// Record a new scraper search. Returns the stored row.
    pub async fn create_search(
        &self,
        name: &str,
        agent_id: Option<&str>,
        search_url: Option<&str>,
    ) -> Result<Option<Value>> {
        let rows = self
            .client
            .insert(SEARCHES, &search_payload(name, agent_id, search_url))
            .await?;
        Ok(rows.into_iter().next())
    }

    pub async fn update_search_count(&self, search_id: &str, count: u64) -> Result<()> {
        self.client
            .update(SEARCHES, &json!({ "profiles_found": count }), &[("id", search_id)])
            .await?;
        Ok(())
    }

    /// Case-insensitive search on company, then first name.
    pub async fn search_profiles(&self, query: &str, limit: usize) -> Result<Vec<Value>> {
        let pattern = format!("ilike.%{query}%");
        let mut rows = self
            .client
            .select(PROFILES, "*", &[("current_company", pattern.clone())], Some(limit))
            .await?;
        if rows.len() < limit {
            let more = self
                .client
                .select(PROFILES, "*", &[("first_name", pattern)], Some(limit - rows.len()))
                .await?;
            rows.extend(more);
        }
        Ok(rows)
    }

    pub async fn all_linkedin_urls(&self) -> Result<Vec<String>> {
        let rows = self.client.select(PROFILES, KEY_COLUMN, &[], Some(URL_LIST_LIMIT)).await?;
        Ok(urls_of(rows))
    }

    /// URLs enriched inside the last `months` (30-day months).
    pub async fn recently_enriched_urls(&self, months: u32) -> Result<Vec<String>> {
        let cutoff = timestamp(refresh_cutoff(Utc::now(), months));
        let rows = self
            .client
            .select(PROFILES, KEY_COLUMN, &[("enriched_at", format!("gte.{cutoff}"))], Some(URL_LIST_LIMIT))
            .await?;
        Ok(urls_of(rows))
    }

    pub async fn dedup_stats(&self) -> Result<DedupStats> {
        let total_profiles = self.client.count(PROFILES, &[]).await?;
        let cutoff = timestamp(refresh_cutoff(Utc::now(), ENRICHMENT_REFRESH_MONTHS));
        let recently_enriched = self
            .client
            .count(PROFILES, &[("enriched_at", format!("gte.{cutoff}"))])
            .await?;

        Ok(DedupStats {
            total_profiles,
            recently_enriched,
            will_skip: recently_enriched,
        })
    }

    /// True when a one-row select succeeds.
    pub async fn check_connection(&self) -> bool {
        match self.client.select(PROFILES, "id", &[], Some(1)).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Store connection check failed: {}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls_of_skips_blank() {
        let rows = vec![
            json!({"linkedin_url": "https://linkedin.com/in/a"}),
            json!({"linkedin_url": ""}),
            json!({"linkedin_url": null}),
            json!({"id": 4}),
        ];
        assert_eq!(urls_of(rows), vec!["https://linkedin.com/in/a"]);
    }

    #[test]
    fn test_dedup_stats_serialization() {
        let stats = DedupStats {
            total_profiles: 120,
            recently_enriched: 30,
            will_skip: 30,
        };
        assert_eq!(
            serde_json::to_value(stats).unwrap(),
            json!({"total_profiles": 120, "recently_enriched": 30, "will_skip": 30})
        );
    }

    #[tokio::test]
    async fn test_check_connection_unreachable() {
        let store = ProfileStore::new(SupabaseClient::new("http://127.0.0.1:9", "key").unwrap());
        assert!(!store.check_connection().await);
    }

    #[tokio::test]
    async fn test_pipeline_stats_degrade_to_empty() {
        let store = ProfileStore::new(SupabaseClient::new("http://127.0.0.1:9", "key").unwrap());
        assert!(store.pipeline_stats().await.is_empty());
    }

    #[tokio::test]
    async fn test_search_operations_surface_errors() {
        let store = ProfileStore::new(SupabaseClient::new("http://127.0.0.1:9", "key").unwrap());
        assert!(store.create_search("Backend TLV", None, None).await.is_err());
        assert!(store.update_search_count("search-1", 12).await.is_err());
        assert!(store.all_profiles(ALL_PROFILES_LIMIT).await.is_err());
    }

    #[tokio::test]
    async fn test_scraped_upsert_counts_failures() {
        let store = ProfileStore::new(SupabaseClient::new("http://127.0.0.1:9", "key").unwrap());
        let profiles = vec![
            json!({"linkedin_url": "https://linkedin.com/in/a"}),
            json!({"firstName": "No URL"}),
        ];

        let stats = store.upsert_scraped_profiles(&profiles, Some("search-1")).await;

        assert_eq!(
            stats,
            UpsertStats {
                inserted: 0,
                updated: 0,
                skipped: 1,
                errors: 1
            }
        );
    }
}
