use swatch_core::Interrupted;
use swatch_tokens::TokenError;
use thiserror::Error;

/// Failures reported by a [`crate::ThemeStorage`] backend
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum StorageError {
    #[error("theme '{0}' not found in storage")]
    NotFound(String),

    #[error("storage backend failure: {0}")]
    Backend(String),

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl StorageError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "theme_not_found",
            Self::Backend(_) => "storage_error",
            Self::Interrupted(inner) => inner.code(),
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    #[error("theme id cannot be empty")]
    EmptyId,

    #[error("theme name cannot be empty")]
    EmptyName,

    #[error("theme tokens are missing")]
    NilTokens,

    #[error("invalid tokens: {0}")]
    Tokens(#[from] TokenError),

    #[error("invalid dark mode strategy '{0}' (must be class, media or auto)")]
    InvalidDarkModeStrategy(String),

    #[error("invalid dark tokens: {0}")]
    DarkTokens(#[source] TokenError),

    #[error("condition id cannot be empty")]
    EmptyConditionId,

    #[error("condition '{0}' has an empty expression")]
    EmptyExpression(String),

    #[error("condition '{0}' has no token overrides")]
    EmptyOverrides(String),

    #[error("condition '{0}' has an empty override path")]
    EmptyOverridePath(String),

    #[error("invalid override value for '{path}': {source}")]
    OverrideValue {
        path: String,
        #[source]
        source: TokenError,
    },

    #[error("invalid condition {index} ('{id}'): {source}")]
    Condition {
        index: usize,
        id: String,
        #[source]
        source: Box<ThemeError>,
    },

    #[error("contrast ratio must be between 0 and 21, got {0}")]
    InvalidContrastRatio(f64),

    #[error("invalid aria-live value '{0}' (must be off, polite or assertive)")]
    InvalidAriaLive(String),

    #[error("custom CSS is {size} bytes, exceeding the {max} byte limit")]
    CustomCssTooLarge { size: usize, max: usize },

    #[error("custom JS is {size} bytes, exceeding the {max} byte limit")]
    CustomJsTooLarge { size: usize, max: usize },

    #[error("theme not found: {0}")]
    NotFound(String),

    #[error("invalid theme document: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("storage: {0}")]
    Storage(#[from] StorageError),

    #[error("theme manager is closed")]
    Closed,

    #[error(transparent)]
    Interrupted(#[from] Interrupted),
}

impl ThemeError {
    /// Stable snake_case error kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::EmptyId => "empty_theme_id",
            Self::EmptyName => "empty_theme_name",
            Self::NilTokens => "nil_tokens",
            Self::Tokens(inner) | Self::DarkTokens(inner) => inner.code(),
            Self::InvalidDarkModeStrategy(_) => "invalid_dark_mode_strategy",
            Self::EmptyConditionId => "empty_condition_id",
            Self::EmptyExpression(_) => "empty_expression",
            Self::EmptyOverrides(_) => "empty_overrides",
            Self::EmptyOverridePath(_) => "empty_override_path",
            Self::OverrideValue { source, .. } => source.code(),
            Self::Condition { source, .. } => source.code(),
            Self::InvalidContrastRatio(_) => "invalid_contrast_ratio",
            Self::InvalidAriaLive(_) => "invalid_aria_live",
            Self::CustomCssTooLarge { .. } => "custom_css_too_large",
            Self::CustomJsTooLarge { .. } => "custom_js_too_large",
            Self::NotFound(_) => "theme_not_found",
            Self::Parse(_) => "invalid_document",
            Self::Config(_) => "invalid_config",
            Self::Storage(inner) => inner.code(),
            Self::Closed => "closed",
            Self::Interrupted(inner) => inner.code(),
        }
    }
}
