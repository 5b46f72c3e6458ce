//! Resolver configuration

use serde::{Deserialize, Serialize};

/// Default number of cached resolutions
pub const DEFAULT_CACHE_CAPACITY: usize = 10_000;
/// Default budget for cached values, in bytes
pub const DEFAULT_CACHE_MAX_COST: usize = 1 << 20;
/// Default bound on reference chain length
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Token resolver settings (`[resolver]` in swatch.toml)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ResolverConfig {
    /// Maximum number of cached resolutions
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Maximum total bytes of cached values
    #[serde(default = "default_cache_max_cost")]
    pub cache_max_cost: usize,
    /// Maximum number of hops in one reference chain
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_cache_capacity() -> usize {
    DEFAULT_CACHE_CAPACITY
}

fn default_cache_max_cost() -> usize {
    DEFAULT_CACHE_MAX_COST
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            cache_max_cost: DEFAULT_CACHE_MAX_COST,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
