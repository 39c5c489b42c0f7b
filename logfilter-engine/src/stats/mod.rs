//! Thread-safe counters aggregated across all workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use logfilter_core::errors::file_error::FileErrorKind;
use logfilter_core::FxHashMap;

const PREVIEW_LIMIT: usize = 10;

#[derive(Debug, Default, Clone)]
pub struct FileReport {
    pub records_total: u64,
    pub records_matched: u64,
    pub bytes_read: u64,
    pub duration_ns: u64,
    pub oversize_truncated: u64,
    pub orphan_continuations: u64,
    pub absent_timestamp: u64,
    pub error: Option<FileErrorKind>,
}

/// Atomics for the hot counters, plus a small mutex-guarded preview list
/// for error diagnostics. Consistency between counters is not required
/// at read time.
pub struct StatsCollector {
    files_scanned: AtomicU64,
    files_matched: AtomicU64,
    files_skipped: AtomicU64,
    files_errored: AtomicU64,
    records_total: AtomicU64,
    records_matched: AtomicU64,
    records_oversize: AtomicU64,
    records_orphan: AtomicU64,
    bytes_read: AtomicU64,
    wall_time_ns: AtomicU64,
    absent_timestamp_records: AtomicU64,
    error_previews: Mutex<FxHashMap<&'static str, Vec<String>>>,
}

impl StatsCollector {
    pub fn new() -> Self {
        Self {
            files_scanned: AtomicU64::new(0),
            files_matched: AtomicU64::new(0),
            files_skipped: AtomicU64::new(0),
            files_errored: AtomicU64::new(0),
            records_total: AtomicU64::new(0),
            records_matched: AtomicU64::new(0),
            records_oversize: AtomicU64::new(0),
            records_orphan: AtomicU64::new(0),
            bytes_read: AtomicU64::new(0),
            wall_time_ns: AtomicU64::new(0),
            absent_timestamp_records: AtomicU64::new(0),
            error_previews: Mutex::new(FxHashMap::default()),
        }
    }

    pub fn record_file(&self, report: &FileReport) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
        if report.records_matched > 0 {
            self.files_matched.fetch_add(1, Ordering::Relaxed);
        }
        if report.error.is_some() {
            self.files_errored.fetch_add(1, Ordering::Relaxed);
        }
        self.records_total.fetch_add(report.records_total, Ordering::Relaxed);
        self.records_matched.fetch_add(report.records_matched, Ordering::Relaxed);
        self.records_oversize.fetch_add(report.oversize_truncated, Ordering::Relaxed);
        self.records_orphan.fetch_add(report.orphan_continuations, Ordering::Relaxed);
        self.bytes_read.fetch_add(report.bytes_read, Ordering::Relaxed);
        self.wall_time_ns.fetch_add(report.duration_ns, Ordering::Relaxed);
        self.absent_timestamp_records.fetch_add(report.absent_timestamp, Ordering::Relaxed);
    }

    pub fn record_file_skipped(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an error code against its bounded preview list of offending
    /// paths.
    pub fn record_error_preview(&self, code: &'static str, path: &std::path::Path) {
        let mut previews = self.error_previews.lock().unwrap();
        let entry = previews.entry(code).or_default();
        if entry.len() < PREVIEW_LIMIT {
            entry.push(path.display().to_string());
        }
    }

    pub fn snapshot(&self) -> GlobalStats {
        GlobalStats {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            files_matched: self.files_matched.load(Ordering::Relaxed),
            files_skipped: self.files_skipped.load(Ordering::Relaxed),
            files_errored: self.files_errored.load(Ordering::Relaxed),
            records_total: self.records_total.load(Ordering::Relaxed),
            records_matched: self.records_matched.load(Ordering::Relaxed),
            records_oversize: self.records_oversize.load(Ordering::Relaxed),
            records_orphan: self.records_orphan.load(Ordering::Relaxed),
            bytes_read: self.bytes_read.load(Ordering::Relaxed),
            wall_time_ns: self.wall_time_ns.load(Ordering::Relaxed),
            absent_timestamp_records: self.absent_timestamp_records.load(Ordering::Relaxed),
            error_previews: self.error_previews.lock().unwrap().clone(),
        }
    }
}

impl Default for StatsCollector {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct GlobalStats {
    pub files_scanned: u64,
    pub files_matched: u64,
    pub files_skipped: u64,
    pub files_errored: u64,
    pub records_total: u64,
    pub records_matched: u64,
    pub records_oversize: u64,
    pub records_orphan: u64,
    pub bytes_read: u64,
    pub wall_time_ns: u64,
    pub absent_timestamp_records: u64,
    pub error_previews: FxHashMap<&'static str, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_total_never_exceeds_matched_is_respected_by_caller() {
        let stats = StatsCollector::new();
        stats.record_file(&FileReport {
            records_total: 5,
            records_matched: 2,
            ..Default::default()
        });
        let snap = stats.snapshot();
        assert!(snap.records_total >= snap.records_matched);
    }

    #[test]
    fn error_preview_is_bounded() {
        let stats = StatsCollector::new();
        for i in 0..20 {
            stats.record_error_preview("FILE_NOT_FOUND", std::path::Path::new(&format!("f{i}.log")));
        }
        let snap = stats.snapshot();
        assert_eq!(snap.error_previews["FILE_NOT_FOUND"].len(), PREVIEW_LIMIT);
    }

    #[test]
    fn files_matched_counts_only_files_with_at_least_one_match() {
        let stats = StatsCollector::new();
        stats.record_file(&FileReport {
            records_total: 3,
            records_matched: 0,
            ..Default::default()
        });
        stats.record_file(&FileReport {
            records_total: 3,
            records_matched: 1,
            ..Default::default()
        });
        let snap = stats.snapshot();
        assert_eq!(snap.files_scanned, 2);
        assert_eq!(snap.files_matched, 1);
    }
}
