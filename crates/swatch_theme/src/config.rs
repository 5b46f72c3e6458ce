//! Configuration file handling (swatch.toml)

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use swatch_condition::ConditionConfig;
use swatch_tokens::ResolverConfig;

use crate::error::ThemeError;

/// Top-level configuration
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
pub struct SwatchConfig {
    #[serde(default)]
    pub resolver: ResolverConfig,
    #[serde(default)]
    pub manager: ThemeManagerConfig,
}

/// Theme manager behavior
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct ThemeManagerConfig {
    /// Cache resolved themes
    #[serde(default = "default_true")]
    pub enable_caching: bool,
    /// Maximum number of cached resolved themes
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Cost budget for cached themes, in bytes of token data
    #[serde(default = "default_cache_max_cost")]
    pub cache_max_cost: usize,
    /// Run full validation before registering
    #[serde(default = "default_true")]
    pub validate_on_register: bool,
    /// Theme served when a requested id is unknown
    #[serde(default)]
    pub default_theme_id: Option<String>,
    #[serde(default)]
    pub condition: ConditionConfig,
}

fn default_true() -> bool {
    true
}

fn default_cache_capacity() -> usize {
    1_000
}

fn default_cache_max_cost() -> usize {
    100 << 20
}

impl Default for ThemeManagerConfig {
    fn default() -> Self {
        Self {
            enable_caching: default_true(),
            cache_capacity: default_cache_capacity(),
            cache_max_cost: default_cache_max_cost(),
            validate_on_register: default_true(),
            default_theme_id: None,
            condition: ConditionConfig::default(),
        }
    }
}

impl SwatchConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ThemeError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ThemeError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ThemeError> {
        toml::from_str(content).map_err(|e| ThemeError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, ThemeError> {
        toml::to_string_pretty(self).map_err(|e| ThemeError::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_file_uses_defaults() {
        let config = SwatchConfig::from_toml_str("").unwrap();
        assert_eq!(config, SwatchConfig::default());
        assert_eq!(config.resolver.max_depth, 32);
        assert_eq!(config.manager.condition.timeout_ms, 5_000);
        assert!(config.manager.enable_caching);
    }

    #[test]
    fn sections_override_individual_fields() {
        let config = SwatchConfig::from_toml_str(
            r#"
[resolver]
max_depth = 8

[manager]
default_theme_id = "default"
enable_caching = false

[manager.condition]
max_conditions = 4
"#,
        )
        .unwrap();

        assert_eq!(config.resolver.max_depth, 8);
        assert_eq!(config.resolver.cache_capacity, 10_000);
        assert_eq!(config.manager.default_theme_id.as_deref(), Some("default"));
        assert!(!config.manager.enable_caching);
        assert_eq!(config.manager.condition.max_conditions, 4);
        assert_eq!(config.manager.condition.max_depth, 10);
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = SwatchConfig::default();
        config.manager.default_theme_id = Some("corporate".into());
        let text = config.to_toml_string().unwrap();
        assert_eq!(SwatchConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn malformed_toml_is_a_config_error() {
        let err = SwatchConfig::from_toml_str("[manager\n").unwrap_err();
        assert_eq!(err.code(), "invalid_config");
    }
}
