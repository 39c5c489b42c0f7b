//! Criterion benchmark for the boolean expression evaluator.
//!
//! Run with: `cargo bench -p logfilter-engine --bench evaluator_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use logfilter_engine::expr::build_ast;

const HAYSTACK: &str = "2026-01-08 10:03:12 WARN connection reset by peer while \
                         flushing buffer for session 88af; retrying with backoff";

fn bench_single_term(c: &mut Criterion) {
    let ast = build_ast("connection", false).unwrap();
    let evaluator = logfilter_engine::expr::Evaluator::new(&ast);

    let mut group = c.benchmark_group("evaluator_single_term");
    group.throughput(Throughput::Bytes(HAYSTACK.len() as u64));
    group.bench_function("matches", |b| {
        b.iter(|| evaluator.matches(black_box(HAYSTACK)));
    });
    group.finish();
}

fn bench_by_expression_complexity(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluator_by_complexity");

    for &(label, expr) in &[
        ("term", "connection"),
        ("and", "connection AND reset"),
        ("or_chain", "connection OR timeout OR refused OR reset"),
        (
            "mixed",
            r#"(connection AND reset) OR (NOT warn AND "backoff")"#,
        ),
    ] {
        let ast = build_ast(expr, false).unwrap();
        let evaluator = logfilter_engine::expr::Evaluator::new(&ast);
        group.throughput(Throughput::Bytes(HAYSTACK.len() as u64));
        group.bench_with_input(BenchmarkId::new("expr", label), &evaluator, |b, evaluator| {
            b.iter(|| evaluator.matches(black_box(HAYSTACK)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_single_term, bench_by_expression_complexity);
criterion_main!(benches);
