use serde::{Deserialize, Serialize};

use self::cache::CacheConfig;
use self::lookup::LookupConfig;
use self::network::NetworkConfig;

pub mod cache;
pub mod lookup;
pub mod network;

#[derive(Serialize, Deserialize)]
pub struct Config {
    pub network: NetworkConfig,
    pub cache: CacheConfig,
    pub lookup: LookupConfig,
}

impl Config {
    pub fn new() -> Self {
        Config {
            network: NetworkConfig::new(),
            cache: CacheConfig::new(),
            lookup: LookupConfig::new(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
