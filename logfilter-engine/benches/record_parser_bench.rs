//! Criterion benchmark for multi-line record reconstruction.
//!
//! Run with: `cargo bench -p logfilter-engine --bench record_parser_bench`

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use logfilter_engine::record::RecordParser;

/// Builds a synthetic log with `records` headers, each followed by
/// `continuation_lines` stack-trace-style lines.
fn generate_log(records: usize, continuation_lines: usize) -> Vec<Vec<u8>> {
    let mut lines = Vec::with_capacity(records * (continuation_lines + 1));
    for i in 0..records {
        lines.push(format!("2026-01-08 10:{:02}:{:02} ERROR request failed", (i / 60) % 60, i % 60).into_bytes());
        for j in 0..continuation_lines {
            lines.push(format!("    at com.example.Service.handle(Service.java:{j})").into_bytes());
        }
    }
    lines
}

fn bench_by_record_shape(c: &mut Criterion) {
    let mut group = c.benchmark_group("record_parser_by_shape");

    for &(label, records, continuation_lines) in &[
        ("single_line_records", 2000, 0),
        ("short_stack_traces", 500, 5),
        ("long_stack_traces", 100, 40),
    ] {
        let lines = generate_log(records, continuation_lines);
        let total_bytes: u64 = lines.iter().map(|l| l.len() as u64 + 1).sum();
        group.throughput(Throughput::Bytes(total_bytes));

        group.bench_with_input(BenchmarkId::new("feed", label), &lines, |b, lines| {
            b.iter(|| {
                let mut parser = RecordParser::new("bench.log", 1024 * 1024);
                let mut matched = 0usize;
                for (i, line) in lines.iter().enumerate() {
                    for event in parser.feed(i as u64 + 1, black_box(line)) {
                        if matches!(event, logfilter_engine::record::RecordEvent::Record(_)) {
                            matched += 1;
                        }
                    }
                }
                parser.finalize();
                matched
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_by_record_shape);
criterion_main!(benches);
