//! Drives handler → record parser → filter chain for one file, submits
//! matches to the writer, and reports per-file counters.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;
use std::time::Instant;

use logfilter_core::config::EncodingErrors;
use logfilter_core::errors::file_error::FileErrorKind;

use crate::decode::decode;
use crate::expr::ast::TermNode;
use crate::files::open_line_source;
use crate::filter::FilterChain;
use crate::highlight::highlight;
use crate::record::{RecordEvent, RecordParser};
use crate::stats::FileReport;
use crate::writer::OutputWriter;

pub struct RenderOptions<'a> {
    pub include_path: bool,
    pub highlight: bool,
    pub positive_terms: &'a [&'a TermNode],
    pub encoding_errors: EncodingErrors,
    /// Whether a date or time window filter is configured. Records with no
    /// recognized timestamp pass such filters by default but are still
    /// counted for visibility.
    pub has_temporal_filter: bool,
}

/// Runs the per-file loop for `path`/`file_seq`, submitting matches to
/// `writer`. Returns the file's report; a worker panic inside the loop is
/// caught and converted into `FileError::Internal` rather than taking
/// down the whole pool.
pub fn process_file(
    path: &Path,
    file_seq: u64,
    max_record_size: usize,
    filter_chain: &FilterChain<'_>,
    render: &RenderOptions<'_>,
    writer: &OutputWriter,
) -> FileReport {
    let start = Instant::now();
    let outcome = catch_unwind(AssertUnwindSafe(|| {
        run_file(path, file_seq, max_record_size, filter_chain, render, writer)
    }));

    let mut report = match outcome {
        Ok(report) => report,
        Err(_) => FileReport {
            error: Some(FileErrorKind::Internal),
            ..Default::default()
        },
    };
    report.duration_ns = start.elapsed().as_nanos() as u64;
    // Always signal completion, even on panic/error, or a deterministic-mode
    // writer would wait forever for this file's slot.
    writer.file_done(file_seq);
    report
}

fn run_file(
    path: &Path,
    file_seq: u64,
    max_record_size: usize,
    filter_chain: &FilterChain<'_>,
    render: &RenderOptions<'_>,
    writer: &OutputWriter,
) -> FileReport {
    let mut report = FileReport::default();

    let mut source = match open_line_source(path) {
        Ok(s) => s,
        Err(e) => {
            report.error = Some(e.kind);
            return report;
        }
    };

    let mut parser = RecordParser::new(path, max_record_size);

    loop {
        match source.next_line() {
            Ok(Some((line_no, bytes))) => {
                report.bytes_read += bytes.len() as u64 + 1;
                for event in parser.feed(line_no, &bytes) {
                    handle_event(event, file_seq, filter_chain, render, writer, &mut report);
                }
            }
            Ok(None) => break,
            Err(e) => {
                report.error = Some(e.kind);
                break;
            }
        }
    }

    if let Some(record) = parser.finalize() {
        emit_if_matched(record, file_seq, filter_chain, render, writer, &mut report);
    }

    report
}

fn handle_event(
    event: RecordEvent,
    file_seq: u64,
    filter_chain: &FilterChain<'_>,
    render: &RenderOptions<'_>,
    writer: &OutputWriter,
    report: &mut FileReport,
) {
    match event {
        RecordEvent::Record(record) => emit_if_matched(record, file_seq, filter_chain, render, writer, report),
        RecordEvent::Warning(warning) => {
            use logfilter_core::errors::record_error::RecordErrorKind;
            match warning.kind {
                RecordErrorKind::OversizeTruncated => report.oversize_truncated += 1,
                RecordErrorKind::OrphanContinuation => report.orphan_continuations += 1,
            }
        }
    }
}

fn emit_if_matched(
    record: crate::record::LogRecord,
    file_seq: u64,
    filter_chain: &FilterChain<'_>,
    render: &RenderOptions<'_>,
    writer: &OutputWriter,
    report: &mut FileReport,
) {
    report.records_total += 1;

    if render.has_temporal_filter && record.timestamp.is_none() {
        report.absent_timestamp += 1;
    }

    let content = match decode(&record.content, render.encoding_errors) {
        Ok(c) => c,
        Err(_) => return,
    };

    if !filter_chain.accept(&record, &content) {
        return;
    }

    report.records_matched += 1;

    let body = if render.highlight {
        highlight(&content, render.positive_terms)
    } else {
        content.into_owned()
    };

    let mut out = Vec::with_capacity(body.len() + 64);
    if render.include_path {
        out.extend_from_slice(
            format!(
                "=== {} (lines {}-{}) ===\n",
                record.source_path.display(),
                record.line_start,
                record.line_end
            )
            .as_bytes(),
        );
    }
    out.extend_from_slice(body.as_bytes());
    if !out.ends_with(b"\n") {
        out.push(b'\n');
    }

    if writer.submit(file_seq, out).is_err() {
        report.error = Some(FileErrorKind::IoError);
    }
}
