//! Performance benchmarks for querylens
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use querylens::decorate::decorate;
use querylens::highlight::project;
use querylens::query::{PatternKind, ScanOptions, parse, scan};

const QUERIES: &[&str] = &[
    "simple",
    "repo:foo lang:go bar",
    "(hello there) file:x",
    "a and (b or c) and not d",
    r"repo:^github\.com/gorilla/mux$ -file:_test\.go (Router or Route)",
    r"(foo|bar)+?\d{2,3}[a-z\W] or ^start.*end$",
];

fn regexp_options() -> ScanOptions {
    ScanOptions {
        pattern_kind: PatternKind::Regexp,
        ..ScanOptions::default()
    }
}

fn bench_scanning(c: &mut Criterion) {
    let options = regexp_options();
    let mut group = c.benchmark_group("scan");
    for query in QUERIES {
        group.bench_with_input(BenchmarkId::from_parameter(query), query, |b, &q| {
            b.iter(|| scan(black_box(q), &options))
        });
    }
    group.finish();
}

fn bench_parsing(c: &mut Criterion) {
    let options = regexp_options();
    let mut group = c.benchmark_group("parse");
    for query in QUERIES {
        let Ok(sequence) = scan(query, &options) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(query), &sequence, |b, s| {
            b.iter(|| parse(black_box(s)))
        });
    }
    group.finish();
}

fn bench_decoration(c: &mut Criterion) {
    let options = regexp_options();
    let mut group = c.benchmark_group("decorate_and_project");
    for query in QUERIES {
        let Ok(sequence) = scan(query, &options) else {
            continue;
        };
        group.bench_with_input(BenchmarkId::from_parameter(query), &sequence, |b, s| {
            b.iter(|| project(&decorate(black_box(s))))
        });
    }
    group.finish();
}

fn bench_long_query(c: &mut Criterion) {
    // Long alternation chains stress the flattening loops
    let long = (0..200)
        .map(|i| format!("repo:r{} term{}", i, i))
        .collect::<Vec<_>>()
        .join(" or ");
    let options = ScanOptions::default();

    c.bench_function("long_query_pipeline", |b| {
        b.iter(|| {
            let sequence = scan(black_box(&long), &options).ok()?;
            parse(&sequence).ok()
        })
    });
}

criterion_group!(
    benches,
    bench_scanning,
    bench_parsing,
    bench_decoration,
    bench_long_query,
);
criterion_main!(benches);
