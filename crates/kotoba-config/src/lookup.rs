use std::env;

use serde::{Deserialize, Serialize};

/// Search dispatch bounds
#[derive(Serialize, Deserialize, Clone)]
pub struct LookupConfig {
    /// Per-query response deadline; an unanswered search resolves empty
    pub search_timeout_ms: u64,
    /// Upper bound on shaped results per query
    pub max_results: usize,
}

impl LookupConfig {
    pub fn new() -> Self {
        let search_timeout_ms = env::var("KOTOBA_SEARCH_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(2000); // 2 seconds default

        let max_results = env::var("KOTOBA_MAX_RESULTS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(5);

        Self {
            search_timeout_ms,
            max_results,
        }
    }
}
