//! Token resolution
//!
//! [`TokenResolver`] turns references into literal values by walking the
//! reference chain across tiers. The token snapshot is immutable and shared,
//! so walks never take a lock; only the result cache is synchronised.

use std::sync::Arc;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use swatch_core::{BoundedCache, CacheStats, CallContext};

use crate::config::ResolverConfig;
use crate::error::TokenError;
use crate::reference::{is_reference, TokenReference};
use crate::store::DesignTokens;

/// Paths on the walk currently in progress, in order
#[derive(Default)]
struct Trail<'a> {
    chain: SmallVec<[&'a str; 8]>,
    seen: FxHashSet<&'a str>,
}

pub struct TokenResolver {
    tokens: Arc<DesignTokens>,
    cache: BoundedCache<String, String>,
    max_depth: usize,
}

impl TokenResolver {
    /// Validate `tokens` and build a resolver with default settings
    pub fn new(tokens: DesignTokens) -> Result<Self, TokenError> {
        Self::with_config(tokens, ResolverConfig::default())
    }

    pub fn with_config(tokens: DesignTokens, config: ResolverConfig) -> Result<Self, TokenError> {
        Self::from_shared(Arc::new(tokens), config)
    }

    /// Build a resolver over an already shared snapshot
    pub fn from_shared(tokens: Arc<DesignTokens>, config: ResolverConfig) -> Result<Self, TokenError> {
        tokens.validate()?;
        tracing::debug!(
            tokens = tokens.token_count(),
            cache_capacity = config.cache_capacity,
            max_depth = config.max_depth,
            "token resolver created"
        );
        Ok(Self {
            tokens,
            cache: BoundedCache::new(config.cache_capacity, config.cache_max_cost),
            max_depth: config.max_depth.max(1),
        })
    }

    pub fn tokens(&self) -> &DesignTokens {
        &self.tokens
    }

    pub fn shared_tokens(&self) -> Arc<DesignTokens> {
        Arc::clone(&self.tokens)
    }

    /// Resolve a single token value.
    ///
    /// Literals are returned unchanged. References are walked until a literal
    /// is reached and the result is cached under the reference path.
    pub fn resolve(&self, ctx: &CallContext, reference: &TokenReference) -> Result<String, TokenError> {
        if !reference.is_reference() {
            return Ok(reference.as_str().to_owned());
        }
        self.resolve_path(ctx, reference.path())
    }

    /// Resolve a raw value that may be compound (`1px solid semantic.colors.border`).
    ///
    /// Whitespace-separated words that are references are resolved in place;
    /// everything else is kept as written.
    pub fn resolve_value(&self, ctx: &CallContext, value: &str) -> Result<String, TokenError> {
        let trimmed = value.trim();
        if is_reference(trimmed) {
            return self.resolve_path(ctx, trimmed);
        }
        if !trimmed.split_whitespace().any(is_reference) {
            return Ok(value.to_owned());
        }

        let mut out = String::with_capacity(trimmed.len());
        for (i, word) in trimmed.split_whitespace().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            if is_reference(word) {
                out.push_str(&self.resolve_path(ctx, word)?);
            } else {
                out.push_str(word);
            }
        }
        Ok(out)
    }

    fn resolve_path(&self, ctx: &CallContext, path: &str) -> Result<String, TokenError> {
        ctx.check()?;

        if let Some(hit) = self.cache.get(path) {
            tracing::trace!(token = path, "token cache hit");
            return Ok(hit);
        }

        let value = self.walk(ctx, path)?;
        self.cache.insert(path.to_owned(), value.clone());
        Ok(value)
    }

    /// Follow references from `path` until a literal is reached
    fn walk(&self, ctx: &CallContext, path: &str) -> Result<String, TokenError> {
        let mut trail = Trail::default();
        self.walk_from(ctx, path, &mut trail)
    }

    /// Walk one chain, expanding reference words of a compound terminal
    /// value inside the same trail so cycles through them are caught too
    fn walk_from<'a>(
        &'a self,
        ctx: &CallContext,
        path: &'a str,
        trail: &mut Trail<'a>,
    ) -> Result<String, TokenError> {
        let base = trail.chain.len();
        let mut current = path;

        let value = loop {
            ctx.check()?;

            if !trail.seen.insert(current) {
                trail.chain.push(current);
                let chain: Vec<String> = trail.chain.iter().map(|p| (*p).to_owned()).collect();
                tracing::debug!(token = path, chain = %chain.join(" -> "), "circular token reference");
                return Err(TokenError::Circular { chain });
            }
            trail.chain.push(current);
            if trail.chain.len() > self.max_depth {
                return Err(TokenError::MaxDepthExceeded {
                    path: trail.chain[0].to_owned(),
                    max_depth: self.max_depth,
                });
            }

            let value = self.tokens.get_token(current)?;
            let next = value.trim();
            if is_reference(next) {
                current = next;
                continue;
            }
            if !next.split_whitespace().any(is_reference) {
                break value.to_owned();
            }

            let mut out = String::with_capacity(next.len());
            for (i, word) in next.split_whitespace().enumerate() {
                if i > 0 {
                    out.push(' ');
                }
                if is_reference(word) {
                    out.push_str(&self.walk_from(ctx, word, trail)?);
                } else {
                    out.push_str(word);
                }
            }
            break out;
        };

        for done in trail.chain.drain(base..) {
            trail.seen.remove(done);
        }
        Ok(value)
    }

    /// Resolve every semantic and component value.
    ///
    /// Primitives are copied unchanged. The first failure is returned, wrapped
    /// with the path of the token that failed.
    pub fn resolve_all(&self, ctx: &CallContext) -> Result<DesignTokens, TokenError> {
        let mut resolved = DesignTokens::clone(&self.tokens);

        if let Some(semantic) = resolved.semantic.as_mut() {
            for (category, tokens) in semantic.iter_mut() {
                for (key, value) in tokens.iter_mut() {
                    *value = self
                        .resolve_value(ctx, value)
                        .map_err(|e| e.at(format!("semantic.{category}.{key}")))?;
                }
            }
        }

        if let Some(components) = resolved.components.as_mut() {
            for (component, variants) in components.iter_mut() {
                for (variant, props) in variants.iter_mut() {
                    for (property, value) in props.iter_mut() {
                        *value = self.resolve_value(ctx, value).map_err(|e| {
                            e.at(format!("components.{component}.{variant}.{property}"))
                        })?;
                    }
                }
            }
        }

        Ok(resolved)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Drop cached state. The resolver stays usable and will repopulate the
    /// cache on demand.
    pub fn close(&self) {
        let stats = self.cache.stats();
        self.cache.clear();
        tracing::debug!(hits = stats.hits, misses = stats.misses, "token resolver closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::{Duration, Instant};

    fn tokens(json: &str) -> DesignTokens {
        serde_json::from_str(json).unwrap()
    }

    fn resolver(json: &str) -> TokenResolver {
        TokenResolver::new(tokens(json)).unwrap()
    }

    fn chain() -> TokenResolver {
        resolver(
            r##"{
                "primitives": { "colors": { "primary": "#3b82f6" }, "spacing": { "sm": "0.5rem", "md": "1rem" } },
                "semantic": {
                    "colors": {
                        "background": "primitives.colors.primary",
                        "surface": "semantic.colors.background",
                        "missing": "primitives.colors.nope"
                    }
                },
                "components": {
                    "button": {
                        "primary": {
                            "background-color": "semantic.colors.surface",
                            "padding": "primitives.spacing.sm  primitives.spacing.md",
                            "border": "1px solid semantic.colors.background"
                        }
                    }
                }
            }"##,
        )
    }

    fn resolve(r: &TokenResolver, path: &str) -> Result<String, TokenError> {
        r.resolve(&CallContext::new(), &TokenReference::from(path))
    }

    #[test]
    fn literal_is_returned_unchanged() {
        let r = chain();
        assert_eq!(resolve(&r, "hsl(217, 91%, 60%)").unwrap(), "hsl(217, 91%, 60%)");
        assert_eq!(r.cache_stats().misses, 0);
    }

    #[test]
    fn semantic_resolves_to_primitive() {
        let r = chain();
        assert_eq!(resolve(&r, "semantic.colors.background").unwrap(), "#3b82f6");
        assert_eq!(
            resolve(&r, "components.button.primary.background-color").unwrap(),
            "#3b82f6"
        );
    }

    #[test]
    fn second_resolution_is_a_cache_hit() {
        let r = chain();
        let first = resolve(&r, "semantic.colors.surface").unwrap();
        let second = resolve(&r, "semantic.colors.surface").unwrap();
        assert_eq!(first, second);

        let stats = r.cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));

        r.clear_cache();
        assert_eq!(r.cache_stats().entries, 0);
        assert_eq!(resolve(&r, "semantic.colors.surface").unwrap(), "#3b82f6");
    }

    #[test]
    fn missing_leaf_is_reported() {
        let r = chain();
        let err = resolve(&r, "semantic.colors.missing").unwrap_err();
        assert_eq!(err, TokenError::NotFound("primitives.colors.nope".into()));
        assert_eq!(
            resolve(&r, "semantic.colors.unknown").unwrap_err().code(),
            "token_not_found"
        );
        assert_eq!(
            resolve(&r, "palette.colors.primary").unwrap_err().code(),
            "invalid_tier"
        );
    }

    #[test]
    fn self_reference_is_circular() {
        let r = resolver(r#"{ "semantic": { "colors": { "a": "semantic.colors.a" } } }"#);
        assert_eq!(
            resolve(&r, "semantic.colors.a").unwrap_err(),
            TokenError::Circular {
                chain: vec!["semantic.colors.a".into(), "semantic.colors.a".into()],
            }
        );
    }

    #[test]
    fn three_step_cycle_reports_the_chain() {
        let r = resolver(
            r#"{ "semantic": { "colors": {
                "a": "semantic.colors.b",
                "b": "semantic.colors.c",
                "c": "semantic.colors.a"
            } } }"#,
        );
        let err = resolve(&r, "semantic.colors.a").unwrap_err();
        assert_eq!(err.code(), "circular_reference");
        assert!(err.to_string().contains("circular"));
        assert!(err.to_string().contains(
            "semantic.colors.a -> semantic.colors.b -> semantic.colors.c -> semantic.colors.a"
        ));
    }

    #[test]
    fn long_chains_are_bounded() {
        let mut colors = serde_json::Map::new();
        for i in 0..10 {
            colors.insert(format!("c{i}"), format!("semantic.colors.c{}", i + 1).into());
        }
        colors.insert("c10".into(), "#000".into());
        let json = serde_json::json!({ "semantic": { "colors": colors } }).to_string();

        let shallow = TokenResolver::with_config(
            tokens(&json),
            ResolverConfig {
                max_depth: 4,
                ..ResolverConfig::default()
            },
        )
        .unwrap();
        assert_eq!(
            resolve(&shallow, "semantic.colors.c0").unwrap_err().code(),
            "max_depth_exceeded"
        );
        assert_eq!(resolve(&resolver(&json), "semantic.colors.c0").unwrap(), "#000");
    }

    #[test]
    fn cancelled_context_stops_resolution() {
        let r = chain();
        let ctx = CallContext::new();
        ctx.cancel();
        let err = r
            .resolve(&ctx, &TokenReference::from("semantic.colors.background"))
            .unwrap_err();
        assert_eq!(err.code(), "cancelled");

        // Literals never consult the context
        assert_eq!(r.resolve(&ctx, &TokenReference::from("1rem")).unwrap(), "1rem");
    }

    #[test]
    fn expired_deadline_stops_resolution() {
        let r = chain();
        let ctx = CallContext::new().with_deadline(Instant::now() - Duration::from_millis(1));
        let err = r
            .resolve(&ctx, &TokenReference::from("semantic.colors.background"))
            .unwrap_err();
        assert_eq!(err.code(), "deadline_exceeded");
    }

    #[test]
    fn compound_values_resolve_per_word() {
        let r = chain();
        let ctx = CallContext::new();
        assert_eq!(
            r.resolve_value(&ctx, "1px solid semantic.colors.background").unwrap(),
            "1px solid #3b82f6"
        );
        assert_eq!(
            r.resolve_value(&ctx, "0 1px 2px rgba(0, 0, 0, 0.05)").unwrap(),
            "0 1px 2px rgba(0, 0, 0, 0.05)"
        );
    }

    #[test]
    fn resolve_all_replaces_references() {
        let r = chain();
        let resolved = r.resolve_all(&CallContext::new()).unwrap_err();
        // `semantic.colors.missing` points nowhere
        assert_eq!(resolved.code(), "token_not_found");
        assert!(resolved.to_string().starts_with("semantic.colors.missing: "));

        let r = resolver(
            r##"{
                "primitives": { "colors": { "primary": "#3b82f6" }, "spacing": { "sm": "0.5rem", "md": "1rem" } },
                "semantic": { "colors": { "background": "primitives.colors.primary" } },
                "components": { "button": { "primary": {
                    "background-color": "semantic.colors.background",
                    "padding": "primitives.spacing.sm primitives.spacing.md"
                } } }
            }"##,
        );
        let resolved = r.resolve_all(&CallContext::new()).unwrap();
        assert_eq!(resolved.get_token("semantic.colors.background"), Ok("#3b82f6"));
        assert_eq!(
            resolved.get_token("components.button.primary.padding"),
            Ok("0.5rem 1rem")
        );
        assert_eq!(resolved.primitives, r.tokens().primitives);
        // The shared snapshot is untouched
        assert_eq!(
            r.tokens().get_token("semantic.colors.background"),
            Ok("primitives.colors.primary")
        );
    }

    #[test]
    fn alias_of_a_compound_value_is_fully_resolved() {
        let r = resolver(
            r##"{
                "primitives": { "colors": { "border": "#ccc" } },
                "semantic": { "borders": {
                    "base": "1px solid primitives.colors.border",
                    "alias": "semantic.borders.base"
                } }
            }"##,
        );
        assert_eq!(resolve(&r, "semantic.borders.alias").unwrap(), "1px solid #ccc");

        let all = r.resolve_all(&CallContext::new()).unwrap();
        assert_eq!(all.get_token("semantic.borders.base"), Ok("1px solid #ccc"));
        assert_eq!(all.get_token("semantic.borders.alias"), Ok("1px solid #ccc"));
    }

    #[test]
    fn cycle_through_a_compound_value_is_detected() {
        let r = resolver(
            r#"{ "semantic": { "borders": {
                "a": "1px solid semantic.borders.b",
                "b": "semantic.borders.a"
            } } }"#,
        );
        assert_eq!(
            resolve(&r, "semantic.borders.b").unwrap_err(),
            TokenError::Circular {
                chain: vec![
                    "semantic.borders.b".into(),
                    "semantic.borders.a".into(),
                    "semantic.borders.b".into(),
                ],
            }
        );
        assert_eq!(
            r.resolve_all(&CallContext::new()).unwrap_err().code(),
            "circular_reference"
        );
    }

    #[test]
    fn repeated_words_in_a_compound_value_are_not_cycles() {
        let r = resolver(
            r#"{
                "primitives": { "spacing": { "sm": "4px" } },
                "semantic": { "spacing": {
                    "inset": "primitives.spacing.sm primitives.spacing.sm",
                    "card": "semantic.spacing.inset"
                } }
            }"#,
        );
        assert_eq!(resolve(&r, "semantic.spacing.card").unwrap(), "4px 4px");
    }

    #[test]
    fn invalid_tokens_are_rejected_up_front() {
        let err = TokenResolver::new(tokens(
            r#"{ "primitives": { "colors": { "a": "semantic.colors.b" } } }"#,
        ))
        .err()
        .unwrap();
        assert_eq!(err.code(), "primitive_reference");
    }
}
