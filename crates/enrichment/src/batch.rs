//! Batched enrichment with a fixed pause between batches.

use crate::client::CrustDataClient;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::info;

pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Pause between consecutive batches.
pub const BATCH_PAUSE: Duration = Duration::from_secs(2);

/// Number of batches needed for `total` URLs.
pub fn batch_count(total: usize, batch_size: usize) -> usize {
    total.div_ceil(batch_size.max(1))
}

/// Run `enrich` over `urls` in order, `batch_size` at a time.
///
/// Sleeps for `pause` between batches but not after the last one. A zero
/// batch size is treated as one.
pub async fn enrich_in_batches<F, Fut>(
    urls: &[String],
    batch_size: usize,
    pause: Duration,
    mut enrich: F,
) -> Vec<Value>
where
    F: FnMut(Vec<String>) -> Fut,
    Fut: Future<Output = Vec<Value>>,
{
    let batch_size = batch_size.max(1);
    let total = batch_count(urls.len(), batch_size);
    let mut results = Vec::with_capacity(urls.len());

    for (i, batch) in urls.chunks(batch_size).enumerate() {
        info!("Processing batch {}/{} ({} profiles)", i + 1, total, batch.len());
        results.extend(enrich(batch.to_vec()).await);
        if i + 1 < total && !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }

    info!("Enrichment complete: {} records", results.len());
    results
}

impl CrustDataClient {
    /// Enrich every URL, batch by batch.
    pub async fn enrich_all(&self, urls: &[String], batch_size: usize, pause: Duration) -> Vec<Value> {
        enrich_in_batches(urls, batch_size, pause, |batch| async move {
            self.enrich_batch(&batch).await
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn urls(n: usize) -> Vec<String> {
        (1..=n).map(|i| format!("https://linkedin.com/in/p{i}")).collect()
    }

    #[test]
    fn test_batch_count() {
        assert_eq!(batch_count(0, 10), 0);
        assert_eq!(batch_count(10, 10), 1);
        assert_eq!(batch_count(11, 10), 2);
        assert_eq!(batch_count(3, 0), 3);
    }

    #[tokio::test]
    async fn test_batches_in_order() {
        let mut seen = Vec::new();

        let results = enrich_in_batches(&urls(7), 3, Duration::ZERO, |batch| {
            seen.push(batch.len());
            async move { batch.into_iter().map(|url| json!({ "linkedin_url": url })).collect() }
        })
        .await;

        assert_eq!(seen, vec![3, 3, 1]);
        assert_eq!(results.len(), 7);
        assert_eq!(results[6]["linkedin_url"], "https://linkedin.com/in/p7");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_pause_after_last_batch() {
        let start = tokio::time::Instant::now();

        enrich_in_batches(&urls(4), 2, Duration::from_secs(2), |batch| async move {
            batch.into_iter().map(Value::String).collect()
        })
        .await;

        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(2) && elapsed < Duration::from_secs(4));
    }
}
