use criterion::{black_box, criterion_group, criterion_main, Criterion};
use swatch_core::CallContext;
use swatch_tokens::{default_tokens, is_reference, TokenReference, TokenResolver};

fn bench_classify(c: &mut Criterion) {
    let values = [
        "#3b82f6",
        "hsl(217, 91%, 60%)",
        "-0.025em",
        "semantic.colors.primary",
        "components.button.primary.background-color",
    ];
    c.bench_function("is_reference", |b| {
        b.iter(|| {
            for value in values {
                black_box(is_reference(black_box(value)));
            }
        })
    });
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = TokenResolver::new(default_tokens()).expect("default tokens are valid");
    let ctx = CallContext::new();
    let reference = TokenReference::from("components.button.primary.background-color");

    c.bench_function("resolve_cached", |b| {
        b.iter(|| resolver.resolve(&ctx, black_box(&reference)))
    });

    c.bench_function("resolve_uncached", |b| {
        b.iter(|| {
            resolver.clear_cache();
            resolver.resolve(&ctx, black_box(&reference))
        })
    });

    c.bench_function("resolve_all_defaults", |b| {
        b.iter(|| {
            resolver.clear_cache();
            resolver.resolve_all(&ctx)
        })
    });
}

criterion_group!(benches, bench_classify, bench_resolve);
criterion_main!(benches);
