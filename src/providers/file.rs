use crate::core::asset::parse_dataset;
use crate::core::{DatasetSnapshot, DatasetSource};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Reads a JSON array of raw asset records from disk on every fetch.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    async fn fetch_dataset(&self) -> Result<DatasetSnapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read dataset file: {}", self.path.display()))?;
        let records = parse_dataset(&content)
            .with_context(|| format!("Failed to parse dataset file: {}", self.path.display()))?;
        debug!(path = %self.path.display(), records = records.len(), "Loaded dataset");
        Ok(DatasetSnapshot::new(records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_fetch_dataset_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "bitcoin", "name": "Bitcoin", "symbol": "btc",
                "market_cap": {{"usd": 1.0}}, "total_volume": {{"usd": 2.0}},
                "current_price": {{"usd": 3.0}}, "change24h": {{"usd": 4.0}},
                "change7d": {{"usd": 5.0}}, "sparklines": [1, 2]}}]"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let snapshot = source.fetch_dataset().await.unwrap();

        assert_eq!(snapshot.records.len(), 1);
        assert_eq!(snapshot.records[0].name, "Bitcoin");
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let source = FileSource::new(dir.path().join("missing.json"));

        let err = source.fetch_dataset().await.unwrap_err();
        assert!(err.to_string().contains("Failed to read dataset file"));
    }

    #[tokio::test]
    async fn test_invalid_json_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{not json").unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch_dataset().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse dataset file"));
    }

    #[tokio::test]
    async fn test_wrong_typed_record_keeps_the_rest() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "bitcoin", "name": "Bitcoin", "symbol": "btc",
                "market_cap": {{"usd": 1.0}}, "total_volume": {{"usd": 2.0}},
                "current_price": {{"usd": 3.0}}, "change24h": {{"usd": 4.0}},
                "change7d": {{"usd": 5.0}}}},
               {{"id": "odd", "name": null, "market_cap_rank": 1.5,
                "market_cap": "n/a", "sparklines": "x"}}]"#
        )
        .unwrap();

        let source = FileSource::new(file.path());
        let snapshot = source.fetch_dataset().await.unwrap();

        assert_eq!(snapshot.records.len(), 2);
        assert_eq!(snapshot.records[0].name, "Bitcoin");
        assert_eq!(snapshot.records[1].id.as_deref(), Some("odd"));
        assert!(snapshot.records[1].market_cap.is_none());
    }
}
