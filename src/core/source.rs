//! Dataset source abstractions

use crate::core::asset::RawAssetRecord;
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A full dataset as delivered by a source. Each snapshot replaces the
/// previous one entirely.
#[derive(Debug, Clone)]
pub struct DatasetSnapshot {
    pub records: Vec<RawAssetRecord>,
    pub fetched_at: DateTime<Utc>,
}

impl DatasetSnapshot {
    pub fn new(records: Vec<RawAssetRecord>) -> Self {
        Self {
            records,
            fetched_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait DatasetSource: Send + Sync {
    async fn fetch_dataset(&self) -> Result<DatasetSnapshot>;
}
