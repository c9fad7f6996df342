use std::env;

use serde::{Deserialize, Serialize};

/// Dataset source endpoint
#[derive(Serialize, Deserialize, Clone)]
pub struct NetworkConfig {
    /// URL of the versioned dictionary dataset payload
    pub dataset_url: String,
    /// Pin the dataset to this version; a cached record with a different
    /// version forces a fresh fetch
    pub dataset_version: Option<String>,
    /// Per-request fetch timeout in seconds
    pub fetch_timeout_secs: u64,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let dataset_url = env::var("KOTOBA_DATASET_URL")
            .unwrap_or_else(|_| "https://data.kotoba.dev/jmdict-eng-common.json".to_string());

        let dataset_version = env::var("KOTOBA_DATASET_VERSION").ok();

        let fetch_timeout_secs = env::var("KOTOBA_FETCH_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30); // 30 seconds default

        Self {
            dataset_url,
            dataset_version,
            fetch_timeout_secs,
        }
    }
}
