//! Benchmarks for the managed model pipeline.
//!
//! Measures the stages a rule engine hits on every build:
//! - Schema extraction of small and wide types
//! - Cached schema lookup through a session
//! - Binding and instance creation
//! - Accessor dispatch on an instance
//! - Canonical type name parsing

extern crate modelcore;

use std::{hint::black_box, sync::Arc};

use criterion::{criterion_group, criterion_main, Criterion};
use modelcore::prelude::*;

fn members(ty: &TypeDescriptor, properties: usize) -> Vec<MemberRc> {
    let mut declaration = TypeDeclaration::new(ty.clone());
    for index in 0..properties {
        declaration = declaration.property(&format!("Property{index}"), TypeDescriptor::string());
    }
    declaration.build().into_iter().map(Arc::new).collect()
}

/// Benchmark extracting a type with two properties.
fn bench_extract_small(c: &mut Criterion) {
    let ty = TypeDescriptor::named("Person");
    let members = members(&ty, 2);
    let extractor = SchemaExtractor::new();

    c.bench_function("extract_small", |b| {
        b.iter(|| {
            let schema = extractor.extract(black_box(&ty), black_box(&members)).unwrap();
            black_box(schema)
        });
    });
}

/// Benchmark extracting a type with 64 properties.
fn bench_extract_wide(c: &mut Criterion) {
    let ty = TypeDescriptor::named("Settings");
    let members = members(&ty, 64);
    let extractor = SchemaExtractor::new();

    c.bench_function("extract_wide", |b| {
        b.iter(|| {
            let schema = extractor.extract(black_box(&ty), black_box(&members)).unwrap();
            black_box(schema)
        });
    });
}

/// Benchmark a schema cache hit.
fn bench_session_cache_hit(c: &mut Criterion) {
    let session = ModelSession::default();
    let ty = TypeDescriptor::named("Settings");
    let members = members(&ty, 64);
    session.extract(&ty, &members).unwrap();

    c.bench_function("session_cache_hit", |b| {
        b.iter(|| {
            let schema = session.extract(black_box(&ty), black_box(&members)).unwrap();
            black_box(schema)
        });
    });
}

/// Benchmark binding a 64-property schema.
fn bench_bind(c: &mut Criterion) {
    let ty = TypeDescriptor::named("Settings");
    let members = members(&ty, 64);
    let schema = Arc::new(SchemaExtractor::new().extract(&ty, &members).unwrap());
    let binder = PropertyBinder::new();

    c.bench_function("bind_wide", |b| {
        b.iter(|| {
            let binding = binder.bind(black_box(&schema)).unwrap();
            black_box(binding)
        });
    });
}

/// Benchmark a setter/getter round trip through the dispatch table.
fn bench_invoke_round_trip(c: &mut Criterion) {
    let ty = TypeDescriptor::named("Settings");
    let members = members(&ty, 64);
    let schema = Arc::new(SchemaExtractor::new().extract(&ty, &members).unwrap());
    let binding = Arc::new(PropertyBinder::new().bind(&schema).unwrap());
    let mut instance = InstanceFactory::default().create(&binding, &[]).unwrap();

    c.bench_function("invoke_round_trip", |b| {
        b.iter(|| {
            instance
                .invoke(black_box("setProperty31"), vec![Value::from("value")])
                .unwrap();
            black_box(instance.invoke(black_box("getProperty31"), vec![]).unwrap())
        });
    });
}

/// Benchmark parsing a nested generic type name.
fn bench_parse_type_name(c: &mut Criterion) {
    c.bench_function("parse_type_name", |b| {
        b.iter(|| {
            let ty = TypeDescriptor::parse(black_box("List<Pair<String, Set<long>>>")).unwrap();
            black_box(ty)
        });
    });
}

criterion_group!(
    benches,
    bench_extract_small,
    bench_extract_wide,
    bench_session_cache_hit,
    bench_bind,
    bench_invoke_round_trip,
    bench_parse_type_name,
);
criterion_main!(benches);
