//! Evaluator configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Condition evaluator limits (`[manager.condition]` in swatch.toml)
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ConditionConfig {
    /// Evaluation time limit per expression, in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Maximum logical nesting depth
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Maximum comparisons per expression
    #[serde(default = "default_max_conditions")]
    pub max_conditions: usize,
    /// Number of compiled expressions kept
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_max_depth() -> usize {
    10
}

fn default_max_conditions() -> usize {
    100
}

fn default_cache_capacity() -> usize {
    1_000
}

impl ConditionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for ConditionConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_depth: default_max_depth(),
            max_conditions: default_max_conditions(),
            cache_capacity: default_cache_capacity(),
        }
    }
}
