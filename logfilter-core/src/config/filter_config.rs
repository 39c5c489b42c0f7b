//! The run configuration. Every tunable is optional so it can be loaded
//! from a partial TOML document and layered with CLI overrides; each
//! has an `effective_*` accessor supplying the documented default.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// How to render bytes that are not valid UTF-8 when the output stream
/// is text-mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EncodingErrors {
    #[default]
    Replace,
    Ignore,
    Strict,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FilterConfig {
    /// Boolean search expression source for the tokenizer/parser (C1/C2).
    pub expression: String,
    /// Inverts the default case-folded term comparison. Default: false (case-insensitive).
    pub case_sensitive: Option<bool>,

    /// Inclusive date window.
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    /// Inclusive time-of-day window; wraps at midnight if `time_from > time_to`.
    pub time_from: Option<NaiveTime>,
    pub time_to: Option<NaiveTime>,

    /// Scanner root directory.
    pub search_root: PathBuf,
    /// Glob lists, gitignore syntax.
    #[serde(default)]
    pub include_patterns: Vec<String>,
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
    /// Follow symlinks to directories. Default: false.
    pub follow_symlinks: Option<bool>,
    /// Maximum walk depth; root is depth 0.
    pub max_depth: Option<u32>,
    /// Maximum file size the scanner will admit, in bytes. Default: 10 GiB.
    pub max_file_size: Option<u64>,

    /// Maximum record byte length (`L_max`). Default: 1 MiB.
    pub max_record_size: Option<usize>,

    /// How to render non-UTF-8 bytes in a text-mode output stream.
    pub encoding_errors: Option<EncodingErrors>,

    /// Destination path; `None` means stdout.
    pub output_file: Option<PathBuf>,
    /// Allow destination truncation.
    pub overwrite: Option<bool>,
    /// Include `=== path (lines a-b) ===` header before each matched record.
    pub include_path: Option<bool>,
    /// Wrap each matched term occurrence with `<<<...>>>`.
    pub highlight: Option<bool>,
    /// Produce output in deterministic `(file_sequence_number, line_start)` order.
    pub deterministic_order: Option<bool>,

    /// Worker count; 0 or absent means logical CPU count, clamped to [1, 64].
    pub max_workers: Option<usize>,

    /// Replace the writer with a counting sink.
    pub dry_run: Option<bool>,
    /// In addition to `dry_run`, emit per-file size/line estimates without
    /// opening files for content.
    pub dry_run_details: Option<bool>,
}

impl FilterConfig {
    pub fn effective_case_sensitive(&self) -> bool {
        self.case_sensitive.unwrap_or(false)
    }

    pub fn effective_follow_symlinks(&self) -> bool {
        self.follow_symlinks.unwrap_or(false)
    }

    pub fn effective_max_file_size(&self) -> u64 {
        self.max_file_size.unwrap_or(10 * 1024 * 1024 * 1024)
    }

    pub fn effective_max_record_size(&self) -> usize {
        self.max_record_size.unwrap_or(1024 * 1024)
    }

    pub fn effective_encoding_errors(&self) -> EncodingErrors {
        self.encoding_errors.unwrap_or_default()
    }

    pub fn effective_overwrite(&self) -> bool {
        self.overwrite.unwrap_or(false)
    }

    pub fn effective_include_path(&self) -> bool {
        self.include_path.unwrap_or(true)
    }

    pub fn effective_highlight(&self) -> bool {
        self.highlight.unwrap_or(false)
    }

    pub fn effective_deterministic_order(&self) -> bool {
        self.deterministic_order.unwrap_or(false)
    }

    pub fn effective_dry_run(&self) -> bool {
        self.dry_run.unwrap_or(false) || self.effective_dry_run_details()
    }

    pub fn effective_dry_run_details(&self) -> bool {
        self.dry_run_details.unwrap_or(false)
    }

    /// Worker count, clamped to `[1, 64]`; 0 or absent resolves to the
    /// logical CPU count (also clamped).
    pub fn effective_max_workers(&self) -> usize {
        let requested = self.max_workers.unwrap_or(0);
        let n = if requested == 0 {
            num_cpus()
        } else {
            requested
        };
        n.clamp(1, 64)
    }

    /// Validate cross-field invariants before pipeline construction.
    /// `ParseError` on the expression itself is raised separately by C1/C2.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let (Some(from), Some(to)) = (self.date_from, self.date_to) {
            if from > to {
                return Err(ConfigError::new(
                    "date_from/date_to",
                    format!("date_from ({from}) is after date_to ({to})"),
                ));
            }
        }
        if let Some(max_workers) = self.max_workers {
            if max_workers > 64 {
                return Err(ConfigError::new(
                    "max_workers",
                    format!("max_workers ({max_workers}) exceeds the hard cap of 64"),
                ));
            }
        }
        if self.max_record_size == Some(0) {
            return Err(ConfigError::new(
                "max_record_size",
                "max_record_size must be greater than zero",
            ));
        }
        Ok(())
    }
}

fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
