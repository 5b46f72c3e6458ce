//! Swatch design tokens
//!
//! Three-tier design tokens and their resolution:
//!
//! - [`TokenReference`]: classifies a value as a literal (`#3b82f6`, `1rem`,
//!   `calc(100% - 2rem)`) or a dotted path to another token
//! - [`DesignTokens`]: primitives, semantic and component tiers with
//!   validation, lookup, overrides and overlay merging
//! - [`TokenResolver`]: cycle-safe, depth-bounded resolution with a bounded
//!   result cache
//! - CSS custom property export
//!
//! # Example
//!
//! ```rust,ignore
//! use swatch_core::CallContext;
//! use swatch_tokens::{default_tokens, TokenReference, TokenResolver};
//!
//! let resolver = TokenResolver::new(default_tokens())?;
//! let ctx = CallContext::new();
//! let primary = resolver.resolve(&ctx, &TokenReference::from("semantic.colors.primary"))?;
//! assert_eq!(primary, "hsl(217, 91%, 60%)");
//! ```

pub mod config;
pub mod css;
pub mod defaults;
pub mod error;
pub mod reference;
pub mod resolver;
pub mod store;

pub use config::ResolverConfig;
pub use css::{css_variable_name, to_css_block, to_css_variable_map};
pub use defaults::default_tokens;
pub use error::TokenError;
pub use reference::{is_reference, TokenReference};
pub use resolver::TokenResolver;
pub use store::{
    validate_tokens, ComponentTokens, ComponentVariants, DesignTokens, StyleProperties,
    Tier, TokenCategories, TokenMap,
};
