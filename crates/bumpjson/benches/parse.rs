//! Benchmark – `bumpjson::Parser` against `serde_json::Value`
#![allow(missing_docs)]

use std::{fmt::Write, time::Duration};

use bumpjson::{IterSource, Parser, Value};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A deterministic document of `records` objects mixing every value type.
fn make_records(records: usize) -> String {
    let mut s = String::from("[");
    for i in 0..records {
        if i > 0 {
            s.push(',');
        }
        write!(
            s,
            r#"{{"id":{i},"name":"record é {i}","score":{}.{:03},"tags":["a","b","c"],"active":{},"parent":null}}"#,
            i * 7,
            i % 1000,
            i % 2 == 0,
        )
        .unwrap();
    }
    s.push(']');
    s
}

/// Nested arrays `depth` levels deep.
fn make_nested(depth: usize) -> String {
    let mut s = "[".repeat(depth);
    s.push('1');
    s.push_str(&"]".repeat(depth));
    s
}

fn count(value: Value<'_>) -> usize {
    match value {
        Value::Array(items) => 1 + items.iter().map(|v| count(*v)).sum::<usize>(),
        Value::Object(obj) => 1 + obj.values().iter().map(|v| count(*v)).sum::<usize>(),
        _ => 1,
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    for &records in &[10usize, 1_000, 10_000] {
        let payload = make_records(records);
        group.throughput(Throughput::Bytes(payload.len() as u64));

        group.bench_with_input(BenchmarkId::new("slice", records), &payload, |b, p| {
            b.iter(|| {
                let mut parser = Parser::from_slice(black_box(p.as_bytes()));
                black_box(count(parser.parse().unwrap()));
            });
        });

        group.bench_with_input(BenchmarkId::new("iter", records), &payload, |b, p| {
            b.iter(|| {
                let mut parser = Parser::new(IterSource::new(black_box(p.bytes())));
                black_box(count(parser.parse().unwrap()));
            });
        });

        group.bench_with_input(BenchmarkId::new("serde_json", records), &payload, |b, p| {
            b.iter(|| {
                let value: serde_json::Value = serde_json::from_str(black_box(p)).unwrap();
                black_box(value);
            });
        });
    }
    group.finish();

    let nested = make_nested(500);
    c.bench_function("parse_nested_500", |b| {
        b.iter(|| {
            let mut parser = Parser::from_slice(black_box(nested.as_bytes()));
            black_box(count(parser.parse().unwrap()));
        });
    });
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_parse }
criterion_main!(benches);
