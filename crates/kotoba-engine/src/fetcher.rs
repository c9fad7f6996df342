use std::time::Duration;

use async_trait::async_trait;
use kotoba_types::DictionaryDataset;

use crate::error::LoadError;

/// Remote dataset source. Seam for tests and offline bundles.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<DictionaryDataset, LoadError>;
}

/// HTTP fetcher for the versioned JSON payload
pub struct HttpFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            timeout,
        }
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<DictionaryDataset, LoadError> {
        tracing::info!(%url, "fetching dictionary dataset");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| LoadError::Fetch(e.to_string()))?
            .error_for_status()
            .map_err(|e| LoadError::Fetch(e.to_string()))?;

        let dataset = response
            .json::<DictionaryDataset>()
            .await
            .map_err(|e| LoadError::Parse(e.to_string()))?;

        tracing::info!(
            version = %dataset.version,
            entries = dataset.entries.len(),
            "dataset fetched"
        );
        Ok(dataset)
    }
}
