//! Orchestrates scan → parallel per-file workers → writer → stats.
//!
//! Parallelism is a sized `rayon` pool driving `par_iter()` over the
//! discovered file list, rather than a hand-rolled worker-pool/channel
//! pair. Each closure invocation owns its own `FilterChain`/`Evaluator`,
//! built fresh per file from the shared AST.
//!
//! Scanning runs to completion before any file is processed: `file_seq`
//! (and therefore the deterministic-writer release order) is assigned from
//! the scanner's path-sorted list, which only exists once the walk is
//! done. See DESIGN.md for the tradeoff against a streaming bounded queue.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use logfilter_core::config::FilterConfig;
use logfilter_core::errors::file_error::FileError;
use logfilter_core::errors::{ConfigError, ParseError};
use logfilter_core::events::{FileCompleteEvent, PipelineErrorEvent, PipelineEventHandler, ScanProgressEvent, ScanStartedEvent};

use crate::expr::{build_ast, collect_positive_terms, AstNode};
use crate::filter::{DateWindowFilter, ExpressionFilter, FilterChain, TimeWindowFilter};
use crate::scanner::{self, DiscoveredFile, ScanOptions};
use crate::stats::{GlobalStats, StatsCollector};
use crate::worker::{self, RenderOptions};
use crate::writer::WriterHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    Cancelled,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub status: RunStatus,
    pub stats: GlobalStats,
}

/// Runs one filtering pass over `config.search_root`, writing matches to
/// `config.output_file` (or stdout). `stop` lets a caller (the CLI's
/// SIGINT handler) request cooperative cancellation between files.
pub fn run(
    config: &FilterConfig,
    stop: &AtomicBool,
    handler: &dyn PipelineEventHandler,
) -> Result<RunSummary, PipelineInitError> {
    config.validate().map_err(PipelineInitError::Config)?;
    let ast = build_ast(&config.expression, config.effective_case_sensitive()).map_err(PipelineInitError::Parse)?;

    handler.on_scan_started(&ScanStartedEvent {
        root: config.search_root.clone(),
    });

    let scan_outcome = scanner::scan(
        &ScanOptions {
            root: &config.search_root,
            include_patterns: &config.include_patterns,
            exclude_patterns: &config.exclude_patterns,
            follow_symlinks: config.effective_follow_symlinks(),
            max_depth: config.max_depth,
            max_file_size: Some(config.effective_max_file_size()),
        },
        stop,
    );

    let stats = StatsCollector::new();
    for _ in 0..scan_outcome.oversize_skipped {
        stats.record_file_skipped();
    }
    for err in &scan_outcome.errors {
        report_file_error(&stats, handler, err);
    }

    let positive_terms = collect_positive_terms(&ast);
    let has_temporal_filter =
        config.date_from.is_some() || config.date_to.is_some() || config.time_from.is_some() || config.time_to.is_some();
    let render = RenderOptions {
        include_path: config.effective_include_path(),
        highlight: config.effective_highlight(),
        positive_terms: &positive_terms,
        encoding_errors: config.effective_encoding_errors(),
        has_temporal_filter,
    };

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.effective_max_workers())
        .build()
        .map_err(|e| PipelineInitError::Pool(e.to_string()))?;

    let dry_run = config.effective_dry_run();
    let dry_run_details = config.effective_dry_run_details();
    let writer_handle = if dry_run {
        WriterHandle::open_null(config.effective_deterministic_order()).map_err(PipelineInitError::Writer)?
    } else {
        WriterHandle::open(
            config.output_file.as_deref(),
            config.effective_overwrite(),
            config.effective_deterministic_order(),
        )
        .map_err(PipelineInitError::Writer)?
    };
    let writer = writer_handle.writer();

    let files_total = scan_outcome.files.len();
    let files_processed = AtomicUsize::new(0);
    let cancelled = AtomicBool::new(stop.load(Ordering::Relaxed));
    let max_record_size = config.effective_max_record_size();

    pool.install(|| {
        use rayon::prelude::*;
        scan_outcome
            .files
            .par_iter()
            .enumerate()
            .for_each(|(file_seq, discovered)| {
                if stop.load(Ordering::Relaxed) {
                    cancelled.store(true, Ordering::Relaxed);
                    return;
                }
                if dry_run_details {
                    run_one_file_estimate(discovered, file_seq as u64, &writer, &stats, handler);
                } else {
                    run_one_file(
                        discovered,
                        file_seq as u64,
                        max_record_size,
                        &ast,
                        config,
                        &render,
                        &writer,
                        &stats,
                        handler,
                    );
                }

                let done = files_processed.fetch_add(1, Ordering::Relaxed) + 1;
                handler.on_scan_progress(&ScanProgressEvent {
                    files_processed: done,
                    files_total: Some(files_total),
                });
            });
    });

    writer_handle.shutdown().map_err(PipelineInitError::Writer)?;

    let status = if cancelled.load(Ordering::Relaxed) {
        RunStatus::Cancelled
    } else {
        RunStatus::Success
    };

    Ok(RunSummary {
        status,
        stats: stats.snapshot(),
    })
}

fn run_one_file(
    discovered: &DiscoveredFile,
    file_seq: u64,
    max_record_size: usize,
    ast: &AstNode,
    config: &FilterConfig,
    render: &RenderOptions<'_>,
    writer: &crate::writer::OutputWriter,
    stats: &StatsCollector,
    handler: &dyn PipelineEventHandler,
) {
    let chain = build_filter_chain(ast, config);
    let report = worker::process_file(&discovered.path, file_seq, max_record_size, &chain, render, writer);

    if let Some(kind) = report.error {
        handler.on_pipeline_error(&PipelineErrorEvent {
            message: format!("{:?}: {}", kind, discovered.path.display()),
        });
    }

    handler.on_file_complete(&FileCompleteEvent {
        path: discovered.path.clone(),
        records_total: report.records_total,
        records_matched: report.records_matched,
    });

    stats.record_file(&report);
}

/// Rough average used to turn a file's byte size into a line-count
/// estimate for `dry_run_details`, which reports without reading content.
const ESTIMATED_BYTES_PER_LINE: u64 = 80;

/// `dry_run_details` counterpart to `run_one_file`: never opens `discovered`
/// for content, so its report carries a size-derived line estimate rather
/// than an exact record count.
fn run_one_file_estimate(
    discovered: &DiscoveredFile,
    file_seq: u64,
    writer: &crate::writer::OutputWriter,
    stats: &StatsCollector,
    handler: &dyn PipelineEventHandler,
) {
    let estimated_lines = if discovered.size == 0 {
        0
    } else {
        (discovered.size / ESTIMATED_BYTES_PER_LINE).max(1)
    };

    let report = crate::stats::FileReport {
        records_total: estimated_lines,
        bytes_read: discovered.size,
        ..Default::default()
    };

    handler.on_file_complete(&FileCompleteEvent {
        path: discovered.path.clone(),
        records_total: report.records_total,
        records_matched: report.records_matched,
    });

    stats.record_file(&report);
    writer.file_done(file_seq);
}

fn build_filter_chain<'a>(ast: &'a AstNode, config: &FilterConfig) -> FilterChain<'a> {
    let mut chain = FilterChain::new();
    if config.date_from.is_some() || config.date_to.is_some() {
        chain = chain.push(Box::new(DateWindowFilter {
            from: config.date_from,
            to: config.date_to,
        }));
    }
    if let (Some(from), Some(to)) = (config.time_from, config.time_to) {
        chain = chain.push(Box::new(TimeWindowFilter { from, to }));
    }
    chain.push(Box::new(ExpressionFilter::new(ast)))
}

fn report_file_error(stats: &StatsCollector, handler: &dyn PipelineEventHandler, err: &FileError) {
    use logfilter_core::errors::error_code::LogFilterErrorCode;
    stats.record_error_preview(err.error_code(), &err.path);
    handler.on_pipeline_error(&PipelineErrorEvent {
        message: err.to_string(),
    });
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineInitError {
    #[error(transparent)]
    Config(ConfigError),
    #[error(transparent)]
    Parse(ParseError),
    #[error("failed to open output destination: {0}")]
    Writer(FileError),
    #[error("failed to build worker pool: {0}")]
    Pool(String),
}
