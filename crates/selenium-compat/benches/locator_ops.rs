//! Locator Operations Benchmarks
//!
//! Benchmarks for legacy locator translation, role fallback and chain handling.
//!
//! Run with: `cargo bench --bench locator_ops`

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use selenium_compat::prelude::*;

fn bench_translation(c: &mut Criterion) {
    let mut group = c.benchmark_group("translation");
    let translator = LocatorTranslator::new();

    let locators = vec![
        ("id", "id=submit"),
        ("css", "css=div.container > button.primary"),
        ("xpath_implicit", "//form//input[@type='text']"),
        ("default", "username"),
        ("spaced_separator", "name : q"),
        ("data", "data=test-id:save"),
        ("late_strategy", "element=abc-123"),
    ];

    for (name, locator) in locators {
        group.bench_with_input(BenchmarkId::from_parameter(name), &locator, |bench, raw| {
            bench.iter(|| {
                let spec = translator.translate(black_box(raw)).unwrap();
                black_box(spec);
            });
        });
    }

    group.finish();
}

fn bench_chains(c: &mut Criterion) {
    let mut group = c.benchmark_group("chains");
    let translator = LocatorTranslator::new();

    for depth in [1usize, 2, 4, 8] {
        let chain = vec!["css=div.panel"; depth].join(" >> ");
        group.bench_with_input(BenchmarkId::new("depth", depth), &chain, |bench, raw| {
            bench.iter(|| {
                let spec = translator.translate(black_box(raw)).unwrap();
                black_box(spec);
            });
        });
    }

    group.finish();
}

fn bench_role_fallback(c: &mut Criterion) {
    let mut group = c.benchmark_group("role_fallback");
    let translator = LocatorTranslator::new();
    let resolver = RoleLocatorResolver::new();
    let spec = translator.translate("Save changes").unwrap();
    let quoted = translator.translate(r#"Say "hi" it's fine"#).unwrap();

    for role in [Role::Button, Role::Input, Role::Image, Role::Link, Role::List] {
        group.bench_with_input(BenchmarkId::new("plain", role), &role, |bench, role| {
            bench.iter(|| black_box(resolver.for_role(black_box(&spec), *role)));
        });
    }
    group.bench_function("mixed_quotes", |bench| {
        bench.iter(|| black_box(resolver.for_role(black_box(&quoted), Role::Button)));
    });

    group.finish();
}

criterion_group!(benches, bench_translation, bench_chains, bench_role_fallback);
criterion_main!(benches);
