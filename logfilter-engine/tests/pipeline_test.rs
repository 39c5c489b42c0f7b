//! End-to-end scenarios driving the full scan → worker → writer pipeline
//! against real temp-directory fixtures.

use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::AtomicBool;

use logfilter_core::config::FilterConfig;
use logfilter_core::events::NoOpEventHandler;
use logfilter_engine::pipeline::{self, RunStatus};

fn base_config(root: &Path, expression: &str) -> FilterConfig {
    FilterConfig {
        expression: expression.to_string(),
        search_root: root.to_path_buf(),
        output_file: Some(root.join("out.txt")),
        overwrite: Some(true),
        deterministic_order: Some(true),
        max_workers: Some(2),
        ..Default::default()
    }
}

fn run_and_read_output(config: &FilterConfig) -> (String, logfilter_engine::pipeline::RunSummary) {
    let stop = AtomicBool::new(false);
    let summary = pipeline::run(config, &stop, &NoOpEventHandler).expect("pipeline run");
    let output = config
        .output_file
        .as_ref()
        .map(|p| fs::read_to_string(p).unwrap_or_default())
        .unwrap_or_default();
    (output, summary)
}

#[test]
fn simple_and_matches_only_the_error_record() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.log"),
        "2026-01-08 10:30:45 ERROR db connection timeout\n2026-01-08 10:31:12 INFO  retry succeeded\n",
    )
    .unwrap();

    let config = base_config(dir.path(), "ERROR AND db");
    let (output, summary) = run_and_read_output(&config);

    assert_eq!(summary.status, RunStatus::Success);
    assert_eq!(summary.stats.files_scanned, 1);
    assert_eq!(summary.stats.records_total, 2);
    assert_eq!(summary.stats.records_matched, 1);
    assert!(output.contains("db connection timeout"));
    assert!(!output.contains("retry succeeded"));
}

#[test]
fn or_with_grouping_and_negation() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.log"),
        "2026-01-08 10:30:45 ERROR db connection timeout\n2026-01-08 10:31:12 INFO  retry succeeded\n",
    )
    .unwrap();

    let config = base_config(dir.path(), "(ERROR OR WARN) AND NOT retry");
    let (output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.records_matched, 1);
    assert!(output.contains("db connection timeout"));
    assert!(!output.contains("retry succeeded"));
}

#[test]
fn multi_line_record_matches_and_reports_its_line_range() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.log"),
        "2026-01-08 10:30:45 ERROR boom\n  at mod.fn(x.py:1)\n  caused by: timeout\n2026-01-08 10:30:46 INFO ok\n",
    )
    .unwrap();

    let config = base_config(dir.path(), "caused by");
    let (output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.records_matched, 1);
    assert!(output.contains("=== "));
    assert!(output.contains("(lines 1-3)"));
    assert!(output.contains("caused by: timeout"));
}

#[test]
fn gzip_input_produces_the_same_match_as_plain_text() {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let dir = tempfile::tempdir().unwrap();
    let content = "2026-01-08 10:30:45 ERROR db connection timeout\n2026-01-08 10:31:12 INFO  retry succeeded\n";

    let f = fs::File::create(dir.path().join("a.log.gz")).unwrap();
    let mut enc = GzEncoder::new(f, Compression::default());
    enc.write_all(content.as_bytes()).unwrap();
    enc.finish().unwrap();

    let config = base_config(dir.path(), "ERROR AND db");
    let (output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.files_scanned, 1);
    assert_eq!(summary.stats.records_matched, 1);
    assert!(output.contains("db connection timeout"));
}

#[test]
fn date_window_admits_only_the_in_range_file() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.log"),
        "2026-01-08 09:00:00 ERROR out of range\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("b.log"),
        "2026-01-10 09:00:00 ERROR in range\n",
    )
    .unwrap();

    let mut config = base_config(dir.path(), "ERROR");
    config.date_from = chrono::NaiveDate::from_ymd_opt(2026, 1, 9);
    config.date_to = chrono::NaiveDate::from_ymd_opt(2026, 1, 11);

    let (output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.files_scanned, 2);
    assert_eq!(summary.stats.records_matched, 1);
    assert!(output.contains("in range"));
    assert!(!output.contains("out of range"));
}

#[test]
fn oversize_line_is_truncated_and_counted_once() {
    let dir = tempfile::tempdir().unwrap();
    let overflow = "x".repeat(150);
    fs::write(
        dir.path().join("a.log"),
        format!("2026-01-08 10:30:45 ERROR {overflow}\n2026-01-08 10:30:46 INFO next\n"),
    )
    .unwrap();

    let mut config = base_config(dir.path(), "ERROR");
    config.max_record_size = Some(50);

    let (_output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.records_oversize, 1);
    assert_eq!(summary.stats.records_matched, 1);
}

#[test]
fn empty_file_yields_no_records_and_no_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("empty.log"), "").unwrap();

    let config = base_config(dir.path(), "anything");
    let (_output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.files_scanned, 1);
    assert_eq!(summary.stats.files_errored, 0);
    assert_eq!(summary.stats.records_total, 0);
}

#[test]
fn dry_run_matches_records_but_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("a.log"),
        "2026-01-08 10:30:45 ERROR db connection timeout\n2026-01-08 10:31:12 INFO  retry succeeded\n",
    )
    .unwrap();

    let mut config = base_config(dir.path(), "ERROR AND db");
    config.dry_run = Some(true);
    let (output, summary) = run_and_read_output(&config);

    assert_eq!(summary.stats.records_matched, 1);
    assert!(output.is_empty());
}

#[test]
fn dry_run_details_reports_estimates_without_reading_file_content() {
    let dir = tempfile::tempdir().unwrap();
    let content = "2026-01-08 10:30:45 ERROR db connection timeout\n2026-01-08 10:31:12 INFO  retry succeeded\n";
    fs::write(dir.path().join("a.log"), content).unwrap();

    let mut config = base_config(dir.path(), "ERROR AND db");
    config.dry_run_details = Some(true);
    let (output, summary) = run_and_read_output(&config);

    assert!(output.is_empty());
    assert_eq!(summary.stats.files_scanned, 1);
    // Nothing was evaluated against the filter chain; only an estimate was reported.
    assert_eq!(summary.stats.records_matched, 0);
    assert_eq!(summary.stats.bytes_read, content.len() as u64);
}

#[test]
fn cancellation_before_scan_reports_cancelled_status() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.log"), "2026-01-08 10:30:45 ERROR x\n").unwrap();

    let config = base_config(dir.path(), "ERROR");
    let stop = AtomicBool::new(true);
    let summary = pipeline::run(&config, &stop, &NoOpEventHandler).unwrap();

    assert_eq!(summary.status, RunStatus::Cancelled);
}
