//! Theme model
//!
//! A [`Theme`] bundles one [`DesignTokens`] set with an optional dark-mode
//! overlay, conditional overrides, accessibility settings and metadata.
//! Serialized field names are camelCase in both JSON and YAML.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use swatch_tokens::{reference, DesignTokens, ResolverConfig, TokenResolver};

use crate::error::ThemeError;

/// Upper bound for `customCSS` and `customJS`, in bytes
pub const MAX_CUSTOM_CODE_SIZE: usize = 1 << 20;

const DARK_MODE_STRATEGIES: [&str; 3] = ["class", "media", "auto"];
const ARIA_LIVE_VALUES: [&str; 3] = ["off", "polite", "assertive"];

/// Light or dark presentation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens: Option<DesignTokens>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<DarkModeConfig>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<ThemeCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<AccessibilityConfig>,

    #[serde(rename = "customCSS", default, skip_serializing_if = "String::is_empty")]
    pub custom_css: String,
    #[serde(rename = "customJS", default, skip_serializing_if = "String::is_empty")]
    pub custom_js: String,

    #[serde(default, alias = "metadata", skip_serializing_if = "Option::is_none")]
    pub meta: Option<ThemeMeta>,

    #[serde(skip)]
    created_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    updated_at: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DarkModeConfig {
    pub enabled: bool,
    /// Start in dark mode
    #[serde(default)]
    pub default: bool,
    /// `class`, `media` or `auto`; empty means unspecified
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub strategy: String,
    /// Partial token set merged over the base tokens in dark mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dark_tokens: Option<DesignTokens>,
}

/// Token overrides applied when `expression` matches the evaluation data
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeCondition {
    pub id: String,
    pub expression: String,
    /// Lower priorities apply first; the highest priority wins conflicts
    #[serde(default)]
    pub priority: i32,
    #[serde(default, alias = "overrides")]
    pub token_overrides: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccessibilityConfig {
    pub high_contrast: bool,
    pub min_contrast_ratio: f64,
    pub focus_indicator: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub focus_outline_color: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub focus_outline_width: String,
    pub keyboard_nav: bool,
    pub reduced_motion: bool,
    #[serde(alias = "screenReader")]
    pub screen_reader_optimized: bool,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub aria_live: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ThemeMeta {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub repository: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub homepage: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub preview: String,
    #[serde(skip_serializing_if = "serde_json::Map::is_empty")]
    pub custom_data: serde_json::Map<String, serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Theme {
    pub fn new(id: impl Into<String>, name: impl Into<String>, tokens: DesignTokens) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            tokens: Some(tokens),
            ..Self::default()
        }
    }

    /// Check identity, tokens, dark mode, conditions, accessibility and
    /// custom code size
    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.id.trim().is_empty() {
            return Err(ThemeError::EmptyId);
        }
        if self.name.trim().is_empty() {
            return Err(ThemeError::EmptyName);
        }
        self.tokens.as_ref().ok_or(ThemeError::NilTokens)?.validate()?;

        if let Some(dark) = &self.dark_mode {
            dark.validate()?;
        }

        for (index, condition) in self.conditions.iter().enumerate() {
            condition.validate().map_err(|source| ThemeError::Condition {
                index,
                id: condition.id.clone(),
                source: Box::new(source),
            })?;
        }

        if let Some(a11y) = &self.accessibility {
            a11y.validate()?;
        }

        if self.custom_css.len() > MAX_CUSTOM_CODE_SIZE {
            return Err(ThemeError::CustomCssTooLarge {
                size: self.custom_css.len(),
                max: MAX_CUSTOM_CODE_SIZE,
            });
        }
        if self.custom_js.len() > MAX_CUSTOM_CODE_SIZE {
            return Err(ThemeError::CustomJsTooLarge {
                size: self.custom_js.len(),
                max: MAX_CUSTOM_CODE_SIZE,
            });
        }
        Ok(())
    }

    /// The base tokens, or the base merged with the dark overlay when `scheme`
    /// is dark and dark mode is enabled
    pub fn tokens_for_scheme(&self, scheme: ColorScheme) -> Result<DesignTokens, ThemeError> {
        let base = self.tokens.as_ref().ok_or(ThemeError::NilTokens)?;
        let overlay = match (scheme, &self.dark_mode) {
            (ColorScheme::Dark, Some(dark)) if dark.enabled => dark.dark_tokens.as_ref(),
            _ => None,
        };
        Ok(match overlay {
            Some(overlay) => base.overlaid(overlay),
            None => base.clone(),
        })
    }

    /// A resolver over [`Theme::tokens_for_scheme`]
    pub fn resolver(&self, scheme: ColorScheme, config: ResolverConfig) -> Result<TokenResolver, ThemeError> {
        let tokens = self.tokens_for_scheme(scheme)?;
        Ok(TokenResolver::with_config(tokens, config)?)
    }

    /// Set one token in this theme's token tree
    pub fn apply_override(&mut self, path: &str, value: &str) -> Result<(), ThemeError> {
        let tokens = self.tokens.as_mut().ok_or(ThemeError::NilTokens)?;
        tokens.set_token(path, value)?;
        Ok(())
    }

    /// Conditions in application order: ascending priority, ties kept in
    /// declaration order
    pub fn conditions_by_priority(&self) -> Vec<&ThemeCondition> {
        let mut ordered: Vec<&ThemeCondition> = self.conditions.iter().collect();
        ordered.sort_by_key(|c| c.priority);
        ordered
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        self.updated_at
    }

    /// Record registration time. The creation stamp is only set once.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        let created = *self.created_at.get_or_insert(now);
        self.updated_at = Some(now);
        if let Some(meta) = &mut self.meta {
            meta.created_at.get_or_insert(created);
            meta.updated_at = Some(now);
        }
    }

    pub fn to_json(&self) -> Result<String, ThemeError> {
        serde_json::to_string_pretty(self).map_err(|e| ThemeError::Parse(e.to_string()))
    }

    /// Parse and validate a JSON theme document
    pub fn from_json(json: &str) -> Result<Self, ThemeError> {
        let theme: Self = serde_json::from_str(json).map_err(|e| ThemeError::Parse(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }

    pub fn to_yaml(&self) -> Result<String, ThemeError> {
        serde_yaml::to_string(self).map_err(|e| ThemeError::Parse(e.to_string()))
    }

    /// Parse and validate a YAML theme document
    pub fn from_yaml(yaml: &str) -> Result<Self, ThemeError> {
        let theme: Self = serde_yaml::from_str(yaml).map_err(|e| ThemeError::Parse(e.to_string()))?;
        theme.validate()?;
        Ok(theme)
    }
}

impl DarkModeConfig {
    pub fn validate(&self) -> Result<(), ThemeError> {
        if !self.strategy.is_empty() && !DARK_MODE_STRATEGIES.contains(&self.strategy.as_str()) {
            return Err(ThemeError::InvalidDarkModeStrategy(self.strategy.clone()));
        }
        if let Some(tokens) = &self.dark_tokens {
            tokens.validate().map_err(ThemeError::DarkTokens)?;
        }
        Ok(())
    }
}

impl ThemeCondition {
    pub fn new(id: impl Into<String>, expression: impl Into<String>, priority: i32) -> Self {
        Self {
            id: id.into(),
            expression: expression.into(),
            priority,
            ..Self::default()
        }
    }

    /// Builder-style override
    pub fn with_override(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.token_overrides.insert(path.into(), value.into());
        self
    }

    pub fn validate(&self) -> Result<(), ThemeError> {
        if self.id.trim().is_empty() {
            return Err(ThemeError::EmptyConditionId);
        }
        if self.expression.trim().is_empty() {
            return Err(ThemeError::EmptyExpression(self.id.clone()));
        }
        if self.token_overrides.is_empty() {
            return Err(ThemeError::EmptyOverrides(self.id.clone()));
        }
        for (path, value) in &self.token_overrides {
            if path.trim().is_empty() {
                return Err(ThemeError::EmptyOverridePath(self.id.clone()));
            }
            reference::validate(value).map_err(|source| ThemeError::OverrideValue {
                path: path.clone(),
                source,
            })?;
        }
        Ok(())
    }
}

impl AccessibilityConfig {
    pub fn validate(&self) -> Result<(), ThemeError> {
        if !(0.0..=21.0).contains(&self.min_contrast_ratio) {
            return Err(ThemeError::InvalidContrastRatio(self.min_contrast_ratio));
        }
        if !self.aria_live.is_empty() && !ARIA_LIVE_VALUES.contains(&self.aria_live.as_str()) {
            return Err(ThemeError::InvalidAriaLive(self.aria_live.clone()));
        }
        Ok(())
    }
}
