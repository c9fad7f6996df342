use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use kotoba_types::DictionaryDataset;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The single key the whole dataset blob lives under
pub const DATASET_KEY: &str = "jmdict-dataset";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to open cache: {0}")]
    Open(String),

    #[error("cache read failed: {0}")]
    Read(String),

    #[error("cache write failed: {0}")]
    Write(String),

    #[error("corrupt cache record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// One cached dataset with its version tag and write timestamp
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CacheRecord {
    pub version: String,
    pub timestamp: u64,
    pub dataset: DictionaryDataset,
}

impl CacheRecord {
    pub fn new(dataset: DictionaryDataset) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            version: dataset.version.clone(),
            timestamp,
            dataset,
        }
    }
}

/// Persistence boundary for the dataset cache. Missing keys are absence, not
/// errors; `delete` of a missing key succeeds.
pub trait DatasetCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<CacheRecord>, StoreError>;
    fn put(&self, key: &str, record: &CacheRecord) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// sled-backed dataset store; records are JSON blobs
pub struct DatasetStore {
    db: sled::Db,
}

impl DatasetStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        tracing::debug!(path = %path.display(), "opening dataset store");
        let db = sled::open(path).map_err(sled_error_map)?;
        Ok(Self { db })
    }

    /// In-memory store backed by a temp dir, dropped on close
    pub fn temporary() -> Result<Self, StoreError> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(sled_error_map)?;
        Ok(Self { db })
    }
}

impl DatasetCache for DatasetStore {
    fn get(&self, key: &str) -> Result<Option<CacheRecord>, StoreError> {
        let bytes = self
            .db
            .get(key.as_bytes())
            .map_err(|e| StoreError::Read(e.to_string()))?;

        match bytes {
            Some(bytes) => {
                let record = serde_json::from_slice(&bytes)?;
                Ok(Some(record))
            }
            None => Ok(None),
        }
    }

    fn put(&self, key: &str, record: &CacheRecord) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(record)?;
        self.db
            .insert(key.as_bytes(), bytes)
            .map_err(|e| StoreError::Write(e.to_string()))?;
        self.db
            .flush()
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| StoreError::Write(e.to_string()))?;
        Ok(())
    }
}

#[inline]
fn sled_error_map(error: sled::Error) -> StoreError {
    StoreError::Open(error.to_string())
}
