//! End-to-end resolution scenarios

use std::sync::Arc;
use std::thread;

use pretty_assertions::assert_eq;
use swatch_core::CallContext;
use swatch_tokens::{default_tokens, DesignTokens, TokenReference, TokenResolver};

fn tokens(json: &str) -> DesignTokens {
    serde_json::from_str(json).unwrap()
}

fn resolve(resolver: &TokenResolver, path: &str) -> Result<String, swatch_tokens::TokenError> {
    resolver.resolve(&CallContext::new(), &TokenReference::from(path))
}

#[test]
fn semantic_background_resolves_through_primitive() {
    let resolver = TokenResolver::new(tokens(
        r##"{
            "primitives": { "colors": { "primary": "#3b82f6" } },
            "semantic": { "colors": { "background": "primitives.colors.primary" } }
        }"##,
    ))
    .unwrap();

    assert_eq!(resolve(&resolver, "semantic.colors.background").unwrap(), "#3b82f6");
}

#[test]
fn cycles_of_any_length_terminate() {
    let cases = [
        r#"{ "semantic": { "colors": { "a": "semantic.colors.a" } } }"#,
        r#"{ "semantic": { "colors": { "a": "semantic.colors.b", "b": "semantic.colors.a" } } }"#,
        r#"{ "semantic": { "colors": {
            "a": "semantic.colors.b", "b": "semantic.colors.c", "c": "semantic.colors.a"
        } } }"#,
    ];
    for json in cases {
        let resolver = TokenResolver::new(tokens(json)).unwrap();
        let err = resolve(&resolver, "semantic.colors.a").unwrap_err();
        assert_eq!(err.code(), "circular_reference", "{json}");
        assert!(err.to_string().contains("circular"));
    }
}

#[test]
fn cycles_through_components_are_detected() {
    let resolver = TokenResolver::new(tokens(
        r#"{
            "semantic": { "colors": { "surface": "components.card.base.background" } },
            "components": { "card": { "base": { "background": "semantic.colors.surface" } } }
        }"#,
    ))
    .unwrap();
    let err = resolve(&resolver, "components.card.base.background").unwrap_err();
    assert_eq!(err.code(), "circular_reference");
}

#[test]
fn two_segment_lookup_is_an_invalid_path() {
    let err = default_tokens().get_token("primitives.colors").unwrap_err();
    assert_eq!(err.code(), "invalid_token_path");
}

#[test]
fn resolution_is_idempotent_and_cached() {
    let resolver = TokenResolver::new(default_tokens()).unwrap();
    let path = "components.card.base.border-radius";

    let first = resolve(&resolver, path).unwrap();
    let misses = resolver.cache_stats().misses;
    let second = resolve(&resolver, path).unwrap();

    assert_eq!(first, "0.75rem");
    assert_eq!(first, second);
    assert_eq!(resolver.cache_stats().misses, misses);
    assert_eq!(resolver.cache_stats().hits, 1);
}

#[test]
fn tiny_cache_stays_bounded_and_correct() {
    let resolver = TokenResolver::with_config(
        default_tokens(),
        swatch_tokens::ResolverConfig {
            cache_capacity: 4,
            cache_max_cost: 64,
            ..Default::default()
        },
    )
    .unwrap();
    let expected = resolver.resolve_all(&CallContext::new()).unwrap();

    for _ in 0..3 {
        for (path, _) in default_tokens().iter().filter(|(p, _)| p.starts_with("semantic.")) {
            let value = resolve(&resolver, &path).unwrap();
            assert_eq!(Ok(value.as_str()), expected.get_token(&path));
        }
    }
    let stats = resolver.cache_stats();
    assert!(stats.entries <= 4);
    assert!(stats.cost <= 64);
}

#[test]
fn concurrent_resolution_agrees() {
    let resolver = Arc::new(TokenResolver::new(default_tokens()).unwrap());
    let expected = resolver.resolve_all(&CallContext::new()).unwrap();
    resolver.clear_cache();

    let paths: Vec<String> = default_tokens()
        .iter()
        .map(|(path, _)| path)
        .filter(|path| path.starts_with("semantic."))
        .collect();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let resolver = Arc::clone(&resolver);
            let paths = paths.clone();
            thread::spawn(move || {
                let ctx = CallContext::new();
                paths
                    .iter()
                    .map(|p| resolver.resolve(&ctx, &TokenReference::from(p.as_str())).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        let values = handle.join().unwrap();
        for (path, value) in paths.iter().zip(values) {
            assert_eq!(expected.get_token(path), Ok(value.as_str()));
        }
    }
}

#[test]
fn aliases_of_compound_values_match_the_target() {
    let resolver = TokenResolver::new(tokens(
        r##"{
            "primitives": { "colors": { "border": "#ccc" }, "sizes": { "hairline": "1px" } },
            "semantic": { "borders": {
                "base": "primitives.sizes.hairline solid primitives.colors.border",
                "alias": "semantic.borders.base",
                "alias-of-alias": "semantic.borders.alias"
            } },
            "components": { "card": { "default": { "border": "semantic.borders.alias-of-alias" } } }
        }"##,
    ))
    .unwrap();
    let ctx = CallContext::new();

    assert_eq!(resolve(&resolver, "semantic.borders.alias").unwrap(), "1px solid #ccc");

    let all = resolver.resolve_all(&ctx).unwrap();
    for path in [
        "semantic.borders.base",
        "semantic.borders.alias",
        "semantic.borders.alias-of-alias",
        "components.card.default.border",
    ] {
        let value = all.get_token(path).unwrap();
        assert_eq!(value, "1px solid #ccc", "{path}");
        assert!(!value.split_whitespace().any(swatch_tokens::is_reference), "{path}");
    }
}
