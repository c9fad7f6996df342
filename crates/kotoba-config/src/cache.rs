use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

/// Persistent dataset cache location
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct CacheConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Explicit cache directory; falls back to the platform cache dir
    #[serde(default)]
    pub dir: Option<String>,
}

impl CacheConfig {
    pub fn new() -> Self {
        let enabled = env::var("KOTOBA_CACHE_ENABLED")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(true);

        let dir = env::var("KOTOBA_CACHE_DIR").ok();

        Self { enabled, dir }
    }

    /// Directory the dataset store lives in, `None` when caching is off or no
    /// platform cache dir exists
    pub fn resolve_dir(&self) -> Option<PathBuf> {
        if !self.enabled {
            return None;
        }
        if let Some(dir) = &self.dir {
            return Some(PathBuf::from(dir));
        }
        dirs::cache_dir().map(|d| d.join("kotoba"))
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            dir: None,
        }
    }
}
