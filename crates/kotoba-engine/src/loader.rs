use std::sync::Arc;

use kotoba_store::{CacheRecord, DatasetCache, DATASET_KEY};
use kotoba_types::DictionaryDataset;

use crate::error::LoadError;
use crate::fetcher::DatasetFetcher;

/// Decides between the cached dataset and a fresh network fetch, and writes
/// fetched datasets back to the cache best-effort.
pub struct DatasetLoader {
    cache: Option<Box<dyn DatasetCache>>,
    fetcher: Arc<dyn DatasetFetcher>,
}

impl DatasetLoader {
    pub fn new(cache: Option<Box<dyn DatasetCache>>, fetcher: Arc<dyn DatasetFetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Serve from cache when the version constraint allows it, otherwise
    /// fetch. Fetch and parse failures propagate; cache failures never do.
    pub async fn load(
        &self,
        url: &str,
        expected_version: Option<&str>,
    ) -> Result<DictionaryDataset, LoadError> {
        if let Some(record) = self.cached() {
            match expected_version {
                None => {
                    tracing::info!(version = %record.version, "serving dataset from cache");
                    return Ok(record.dataset);
                }
                Some(expected) if record.version == expected => {
                    tracing::info!(version = %record.version, "serving dataset from cache");
                    return Ok(record.dataset);
                }
                Some(expected) => {
                    tracing::info!(
                        cached = %record.version,
                        expected = %expected,
                        "cached dataset version mismatch, refetching"
                    );
                }
            }
        }

        let dataset = self.fetcher.fetch(url).await?;

        // Cache write failure is deliberately non-fatal: the fetched dataset
        // is returned either way and the next run simply fetches again.
        if let Some(cache) = &self.cache {
            let record = CacheRecord::new(dataset);
            if let Err(e) = cache.put(DATASET_KEY, &record) {
                tracing::warn!(error = %e, "dataset cache write failed, continuing uncached");
            }
            return Ok(record.dataset);
        }

        Ok(dataset)
    }

    /// Cache read; corruption and read errors degrade to a miss
    fn cached(&self) -> Option<CacheRecord> {
        let cache = self.cache.as_ref()?;
        match cache.get(DATASET_KEY) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!(error = %e, "dataset cache read failed, treating as miss");
                None
            }
        }
    }
}
