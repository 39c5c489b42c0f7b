//! Streaming multi-line record reconstruction.
//!
//! `RecordParser` is fed one `(line_number, line_bytes)` pair at a time
//! and yields at most one `LogRecord` per call, plus whatever `finalize()`
//! produces at end of stream. It never buffers more than one pending
//! record.

use std::path::{Path, PathBuf};

use logfilter_core::errors::record_error::{RecordError, RecordErrorKind};

use super::header::HeaderRecognizer;
use super::types::LogRecord;

enum State {
    Idle,
    Accumulating(Pending),
    /// Oversize continuations are discarded until the next header line.
    SkippingToHeader,
}

struct Pending {
    content: Vec<u8>,
    timestamp: Option<chrono::NaiveDateTime>,
    line_start: u64,
    line_end: u64,
}

/// Emitted alongside a record or on its own: a counted, non-fatal warning.
pub enum RecordEvent {
    Record(LogRecord),
    Warning(RecordError),
}

pub struct RecordParser {
    source_path: PathBuf,
    max_record_size: usize,
    header: HeaderRecognizer,
    state: State,
    seen_any_line: bool,
}

impl RecordParser {
    pub fn new(source_path: impl Into<PathBuf>, max_record_size: usize) -> Self {
        Self {
            source_path: source_path.into(),
            max_record_size,
            header: HeaderRecognizer::new(),
            state: State::Idle,
            seen_any_line: false,
        }
    }

    fn path(&self) -> &Path {
        &self.source_path
    }

    /// Feed one physical line (terminator already stripped by the caller's
    /// `LineSource`). Returns the events this line produced, in order.
    pub fn feed(&mut self, line_no: u64, line: &[u8]) -> Vec<RecordEvent> {
        let is_first_line = !self.seen_any_line;
        self.seen_any_line = true;

        let as_str = String::from_utf8_lossy(line);
        let timestamp = self.header.recognize(&as_str);
        let is_header = timestamp.is_some() || (is_first_line && !matches!(self.state, State::SkippingToHeader));

        let mut events = Vec::new();

        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                if is_header {
                    self.start_pending(line_no, line, timestamp, &mut events);
                } else {
                    events.push(RecordEvent::Warning(RecordError::new(
                        RecordErrorKind::OrphanContinuation,
                        self.path(),
                        line_no,
                    )));
                    self.start_pending(line_no, line, None, &mut events);
                }
            }
            State::Accumulating(pending) => {
                if is_header {
                    events.push(RecordEvent::Record(finish(pending, &self.source_path, false)));
                    self.start_pending(line_no, line, timestamp, &mut events);
                } else {
                    let appended_len = pending.content.len() + 1 + line.len();
                    if appended_len > self.max_record_size {
                        events.push(RecordEvent::Record(finish(pending, &self.source_path, true)));
                        events.push(RecordEvent::Warning(RecordError::new(
                            RecordErrorKind::OversizeTruncated,
                            self.path(),
                            line_no,
                        )));
                        self.state = State::SkippingToHeader;
                    } else {
                        let mut pending = pending;
                        pending.content.push(b'\n');
                        pending.content.extend_from_slice(line);
                        pending.line_end = line_no;
                        self.state = State::Accumulating(pending);
                    }
                }
            }
            State::SkippingToHeader => {
                if is_header {
                    self.start_pending(line_no, line, timestamp, &mut events);
                } else {
                    self.state = State::SkippingToHeader;
                }
            }
        }

        events
    }

    /// Starts a new pending record from a header line. A single line
    /// already longer than `max_record_size` is truncated and emitted
    /// immediately, same as a continuation that would overflow.
    fn start_pending(
        &mut self,
        line_no: u64,
        line: &[u8],
        timestamp: Option<chrono::NaiveDateTime>,
        events: &mut Vec<RecordEvent>,
    ) {
        if line.len() > self.max_record_size {
            let mut content = line.to_vec();
            content.truncate(self.max_record_size);
            events.push(RecordEvent::Record(LogRecord {
                content,
                timestamp,
                source_path: self.source_path.clone(),
                line_start: line_no,
                line_end: line_no,
                truncated: true,
            }));
            events.push(RecordEvent::Warning(RecordError::new(
                RecordErrorKind::OversizeTruncated,
                self.path(),
                line_no,
            )));
            self.state = State::SkippingToHeader;
        } else {
            self.state = State::Accumulating(Pending {
                content: line.to_vec(),
                timestamp,
                line_start: line_no,
                line_end: line_no,
            });
        }
    }

    /// Flush any pending record at end of stream. Idempotent after the
    /// first call (returns `None` thereafter).
    pub fn finalize(&mut self) -> Option<LogRecord> {
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Accumulating(pending) => Some(finish(pending, &self.source_path, false)),
            _ => None,
        }
    }
}

fn finish(pending: Pending, source_path: &Path, truncated: bool) -> LogRecord {
    LogRecord {
        content: pending.content,
        timestamp: pending.timestamp,
        source_path: source_path.to_path_buf(),
        line_start: pending.line_start,
        line_end: pending.line_end,
        truncated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed_lines(parser: &mut RecordParser, lines: &[&str]) -> Vec<RecordEvent> {
        let mut out = Vec::new();
        for (i, line) in lines.iter().enumerate() {
            out.extend(parser.feed(i as u64 + 1, line.as_bytes()));
        }
        out
    }

    fn records_only(events: Vec<RecordEvent>) -> Vec<LogRecord> {
        events
            .into_iter()
            .filter_map(|e| match e {
                RecordEvent::Record(r) => Some(r),
                RecordEvent::Warning(_) => None,
            })
            .collect()
    }

    #[test]
    fn single_header_line_starts_a_record_flushed_on_finalize() {
        let mut p = RecordParser::new("a.log", 1024);
        let events = feed_lines(&mut p, &["2026-01-08 10:00:00 started"]);
        assert!(records_only(events).is_empty());
        let record = p.finalize().unwrap();
        assert_eq!(record.line_start, 1);
        assert_eq!(record.line_end, 1);
        assert!(record.timestamp.is_some());
    }

    #[test]
    fn multi_line_record_accumulates_until_next_header() {
        let mut p = RecordParser::new("a.log", 1024);
        let events = feed_lines(
            &mut p,
            &[
                "2026-01-08 10:00:00 exception thrown",
                "  caused by: NullPointerException",
                "  at Foo.bar(Foo.java:1)",
                "2026-01-08 10:00:01 next event",
            ],
        );
        let records = records_only(events);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_start, 1);
        assert_eq!(records[0].line_end, 3);
        assert!(String::from_utf8_lossy(&records[0].content).contains("caused by"));
    }

    #[test]
    fn file_with_no_timestamps_still_starts_a_record_on_first_line() {
        let mut p = RecordParser::new("a.log", 1024);
        let events = feed_lines(&mut p, &["plain line one", "plain line two"]);
        assert!(records_only(events).is_empty());
        let record = p.finalize().unwrap();
        assert!(record.timestamp.is_none());
        assert_eq!(record.line_start, 1);
        assert_eq!(record.line_end, 2);
    }

    #[test]
    fn orphan_continuation_after_finalize_emits_warning() {
        let mut p = RecordParser::new("a.log", 1024);
        let _ = feed_lines(&mut p, &["2026-01-08 10:00:00 started"]);
        p.finalize();
        let events = p.feed(5, b"  orphaned continuation");
        assert!(events
            .iter()
            .any(|e| matches!(e, RecordEvent::Warning(w) if w.kind == RecordErrorKind::OrphanContinuation)));
    }

    #[test]
    fn oversize_record_is_truncated_and_counted() {
        let mut p = RecordParser::new("a.log", 30);
        let events = feed_lines(
            &mut p,
            &[
                "2026-01-08 10:00:00 short",
                "this continuation line is far too long to fit",
                "2026-01-08 10:00:01 next",
            ],
        );
        let truncated_warning = events
            .iter()
            .any(|e| matches!(e, RecordEvent::Warning(w) if w.kind == RecordErrorKind::OversizeTruncated));
        assert!(truncated_warning);
        let records = records_only(events);
        assert_eq!(records.len(), 1);
        assert!(records[0].truncated);
        assert!(records[0].content.len() <= 30);
    }

    #[test]
    fn remaining_oversize_continuations_are_discarded_until_next_header() {
        let mut p = RecordParser::new("a.log", 32);
        let events = feed_lines(
            &mut p,
            &[
                "2026-01-08 10:00:00 x",
                "this line is too long to append here",
                "this one also gets dropped silently",
                "2026-01-08 10:00:01 resumed",
            ],
        );
        let records = records_only(events);
        // First record truncated-emitted, second record starts clean at the next header.
        assert_eq!(records.len(), 1);
        let last = p.finalize().unwrap();
        assert!(String::from_utf8_lossy(&last.content).contains("resumed"));
    }

    #[test]
    fn empty_stream_yields_no_records() {
        let mut p = RecordParser::new("a.log", 1024);
        assert!(p.finalize().is_none());
    }

    #[test]
    fn finalize_is_idempotent() {
        let mut p = RecordParser::new("a.log", 1024);
        feed_lines(&mut p, &["2026-01-08 10:00:00 x"]);
        assert!(p.finalize().is_some());
        assert!(p.finalize().is_none());
    }

    #[test]
    fn a_single_header_line_longer_than_the_cap_is_truncated_on_arrival() {
        let header = format!("2026-01-08 10:00:00 {}", "x".repeat(100));
        let mut p = RecordParser::new("a.log", 20);
        let events = feed_lines(&mut p, &[&header, "2026-01-08 10:00:01 next"]);

        let records = records_only(events);
        assert_eq!(records.len(), 1);
        assert!(records[0].truncated);
        assert_eq!(records[0].content.len(), 20);

        let last = p.finalize().unwrap();
        assert!(!last.truncated);
    }
}
