use super::util::{RetryPolicy, get_body};
use crate::core::asset::parse_dataset;
use crate::core::cache::Cache;
use crate::core::{DatasetSnapshot, DatasetSource};
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{error, info};

/// Fetches the dataset from an HTTP endpoint returning a JSON array of raw
/// records.
///
/// A snapshot is served from memory until `revalidate_after` elapses, then
/// fetched again. The cache lives in the source, so it only pays off for
/// callers that keep one `HttpSource` across refreshes. A one-shot
/// `coinview table` run builds a fresh source and always fetches.
pub struct HttpSource {
    url: String,
    revalidate_after: Duration,
    retry: RetryPolicy,
    cache: Cache<String, DatasetSnapshot>,
}

impl HttpSource {
    pub fn new(url: &str, revalidate_after: Duration) -> Self {
        Self {
            url: url.to_string(),
            revalidate_after,
            retry: RetryPolicy::default(),
            cache: Cache::new(),
        }
    }

    pub fn with_retries(mut self, retries: usize, delay_ms: u64) -> Self {
        self.retry = RetryPolicy::new(retries, delay_ms);
        self
    }
}

#[async_trait]
impl DatasetSource for HttpSource {
    async fn fetch_dataset(&self) -> anyhow::Result<DatasetSnapshot> {
        if let Some(cached) = self.cache.get(&self.url).await {
            return Ok(cached);
        }

        let response_text = get_body(&self.url, self.retry)
            .await
            .context("Dataset request failed")?;

        let records = match parse_dataset(&response_text) {
            Ok(data) => data,
            Err(e) => {
                error!(
                    error = ?e,
                    response = %response_text,
                    "Failed to parse dataset response"
                );
                return Err(e).context("Failed to parse dataset response");
            }
        };

        let snapshot = DatasetSnapshot::new(records);
        info!(url = %self.url, records = snapshot.records.len(), "Revalidated dataset");
        self.cache
            .put(self.url.clone(), snapshot.clone(), Some(self.revalidate_after))
            .await;
        Ok(snapshot)
    }
}
