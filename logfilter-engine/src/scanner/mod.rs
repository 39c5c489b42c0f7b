//! Parallel file discovery using the `ignore` crate's `WalkParallel`.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crossbeam_channel as channel;
use logfilter_core::errors::file_error::{FileError, FileErrorKind};

/// One file discovered under the scan root, already known to pass the
/// include/exclude/size rules.
#[derive(Debug, Clone)]
pub struct DiscoveredFile {
    pub path: PathBuf,
    pub size: u64,
}

fn ignore_error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithLineNumber { err, .. } => ignore_error_path(err),
        ignore::Error::WithDepth { err, .. } => ignore_error_path(err),
        ignore::Error::Partial(errs) => errs.iter().find_map(ignore_error_path),
        _ => None,
    }
}

pub struct ScanOptions<'a> {
    pub root: &'a Path,
    pub include_patterns: &'a [String],
    pub exclude_patterns: &'a [String],
    pub follow_symlinks: bool,
    pub max_depth: Option<u32>,
    pub max_file_size: Option<u64>,
}

/// Result of a scan: deterministically ordered files plus any non-fatal
/// errors encountered while walking (unreadable directories, oversize
/// skips).
pub struct ScanOutcome {
    pub files: Vec<DiscoveredFile>,
    pub errors: Vec<FileError>,
    pub oversize_skipped: u64,
}

/// Walk `options.root`, respecting include/exclude globs, `max_depth`, and
/// `max_file_size`. `stop` is polled between directory entries so a scan
/// in progress can be cancelled cooperatively.
pub fn scan(options: &ScanOptions<'_>, stop: &AtomicBool) -> ScanOutcome {
    let (tx, rx) = channel::unbounded::<DiscoveredFile>();
    let (err_tx, err_rx) = channel::unbounded::<FileError>();
    let oversize_skipped = Arc::new(Mutex::new(0u64));

    let mut builder = ignore::WalkBuilder::new(options.root);
    builder
        .hidden(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .follow_links(options.follow_symlinks)
        .standard_filters(false);

    if let Some(depth) = options.max_depth {
        // `ignore`'s max_depth counts the root itself as depth 0.
        builder.max_depth(Some(depth as usize));
    }

    let mut overrides = ignore::overrides::OverrideBuilder::new(options.root);
    for pattern in options.include_patterns {
        let _ = overrides.add(pattern);
    }
    for pattern in options.exclude_patterns {
        let _ = overrides.add(&format!("!{pattern}"));
    }
    if let Ok(built) = overrides.build() {
        builder.overrides(built);
    }

    let walker = builder.build_parallel();
    let stop_shared = Arc::new(AtomicBool::new(stop.load(Ordering::Relaxed)));

    let max_file_size = options.max_file_size;

    walker.run(|| {
        let tx = tx.clone();
        let err_tx = err_tx.clone();
        let oversize_skipped = Arc::clone(&oversize_skipped);
        let stop_shared = Arc::clone(&stop_shared);
        Box::new(move |entry| {
            if stop_shared.load(Ordering::Relaxed) {
                return ignore::WalkState::Quit;
            }

            let entry = match entry {
                Ok(e) => e,
                Err(err) => {
                    if let Some(path) = ignore_error_path(&err) {
                        let _ = err_tx.send(FileError::with_cause(FileErrorKind::IoError, path, &err));
                    }
                    return ignore::WalkState::Continue;
                }
            };

            match entry.file_type() {
                Some(ft) if ft.is_file() => {}
                _ => return ignore::WalkState::Continue,
            }

            let metadata = match entry.metadata() {
                Ok(m) => m,
                Err(_) => return ignore::WalkState::Continue,
            };

            if let Some(limit) = max_file_size {
                if metadata.len() > limit {
                    *oversize_skipped.lock().unwrap() += 1;
                    return ignore::WalkState::Continue;
                }
            }

            let _ = tx.send(DiscoveredFile {
                path: entry.path().to_path_buf(),
                size: metadata.len(),
            });

            ignore::WalkState::Continue
        })
    });

    drop(tx);
    drop(err_tx);

    let mut files: Vec<DiscoveredFile> = rx.into_iter().collect();
    files.sort_by(|a, b| a.path.cmp(&b.path));

    let oversize_skipped = *oversize_skipped.lock().unwrap();
    ScanOutcome {
        files,
        errors: err_rx.into_iter().collect(),
        oversize_skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::atomic::AtomicBool;

    fn write(dir: &Path, rel: &str, content: &str) {
        let path = dir.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn discovers_files_in_deterministic_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "b.log", "x");
        write(dir.path(), "a.log", "x");
        write(dir.path(), "sub/c.log", "x");

        let opts = ScanOptions {
            root: dir.path(),
            include_patterns: &["**/*.log".to_string()],
            exclude_patterns: &[],
            follow_symlinks: false,
            max_depth: None,
            max_file_size: None,
        };
        let outcome = scan(&opts, &AtomicBool::new(false));
        let names: Vec<_> = outcome
            .files
            .iter()
            .map(|f| f.path.strip_prefix(dir.path()).unwrap().to_path_buf())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(outcome.files.len(), 3);
    }

    #[test]
    fn exclude_pattern_wins_over_include() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "keep.log", "x");
        write(dir.path(), "skip.log", "x");

        let opts = ScanOptions {
            root: dir.path(),
            include_patterns: &["*.log".to_string()],
            exclude_patterns: &["skip.log".to_string()],
            follow_symlinks: false,
            max_depth: None,
            max_file_size: None,
        };
        let outcome = scan(&opts, &AtomicBool::new(false));
        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].path.ends_with("keep.log"));
    }

    #[test]
    fn max_file_size_skips_large_files() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "small.log", "x");
        write(dir.path(), "big.log", &"x".repeat(1000));

        let opts = ScanOptions {
            root: dir.path(),
            include_patterns: &["*.log".to_string()],
            exclude_patterns: &[],
            follow_symlinks: false,
            max_depth: None,
            max_file_size: Some(100),
        };
        let outcome = scan(&opts, &AtomicBool::new(false));
        assert_eq!(outcome.files.len(), 1);
        assert!(outcome.files[0].path.ends_with("small.log"));
    }
}
