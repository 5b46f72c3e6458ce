//! Swatch Themes
//!
//! Named themes over three-tier design tokens, with dark-mode overlays,
//! conditional token overrides and multi-tenant isolation.
//!
//! # Overview
//!
//! - [`Theme`]: tokens plus dark mode, conditions, accessibility and metadata
//! - [`ThemeManager`]: global and per-tenant pools, default-theme fallback,
//!   a cache of resolved themes keyed by tenant, id and evaluation data
//! - [`ThemeStorage`]: async persistence contract, with [`MemoryThemeStorage`]
//! - [`SwatchConfig`]: `swatch.toml` loading
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use serde_json::json;
//! use swatch_core::CallContext;
//! use swatch_theme::{default_theme, TenantId, ThemeManager};
//!
//! let manager = ThemeManager::default();
//! let ctx = CallContext::new();
//! let acme = TenantId::new("acme");
//!
//! manager.register_theme(&ctx, Some(&acme), default_theme()).await?;
//! let data = json!({ "user": { "preferences": { "highContrast": true } } });
//! let theme = manager.get_theme(&ctx, Some(&acme), "default", Some(&data)).await?;
//! ```

pub mod config;
pub mod defaults;
pub mod error;
pub mod manager;
pub mod storage;
pub mod tenant;
pub mod theme;

pub use config::{SwatchConfig, ThemeManagerConfig};
pub use defaults::{default_theme, DEFAULT_THEME_ID};
pub use error::{StorageError, ThemeError};
pub use manager::ThemeManager;
pub use storage::{MemoryThemeStorage, ThemeStorage};
pub use tenant::{Scope, TenantId};
pub use theme::{
    AccessibilityConfig, ColorScheme, DarkModeConfig, Theme, ThemeCondition, ThemeMeta,
    MAX_CUSTOM_CODE_SIZE,
};
