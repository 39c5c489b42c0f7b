use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

#[derive(Parser)]
#[command(name = "logfilter", bin_name = "logfilter")]
#[command(about = "Filter multi-line log records with a boolean search expression")]
#[command(version)]
pub struct Cli {
    /// Boolean search expression, e.g. `error AND NOT "connection reset"`
    #[arg(short = 'e', long, value_name = "EXPR")]
    pub expression: Option<String>,

    /// Directory to scan. Defaults to the current directory.
    #[arg(short = 'r', long, value_name = "PATH")]
    pub root: Option<PathBuf>,

    /// Load (and override) settings from a TOML config file.
    #[arg(short = 'c', long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub expr_opts: ExprArgs,

    #[command(flatten)]
    pub scan_opts: ScanArgs,

    #[command(flatten)]
    pub record_opts: RecordArgs,

    #[command(flatten)]
    pub output_opts: OutputArgs,

    /// Report progress and the final summary as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Suppress the progress bar.
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args)]
pub struct ExprArgs {
    /// Match terms case-sensitively. Default: case-insensitive.
    #[arg(long)]
    pub case_sensitive: bool,

    /// Inclusive start date (YYYY-MM-DD) for the record's recognized timestamp.
    #[arg(long, value_name = "DATE")]
    pub date_from: Option<chrono::NaiveDate>,

    /// Inclusive end date (YYYY-MM-DD).
    #[arg(long, value_name = "DATE")]
    pub date_to: Option<chrono::NaiveDate>,

    /// Inclusive start time-of-day (HH:MM:SS); wraps past midnight if after `--time-to`.
    #[arg(long, value_name = "TIME")]
    pub time_from: Option<chrono::NaiveTime>,

    /// Inclusive end time-of-day (HH:MM:SS).
    #[arg(long, value_name = "TIME")]
    pub time_to: Option<chrono::NaiveTime>,
}

#[derive(Args)]
pub struct ScanArgs {
    /// Glob pattern to include (gitignore syntax). Repeatable.
    #[arg(long = "include", value_name = "GLOB")]
    pub include_patterns: Vec<String>,

    /// Glob pattern to exclude (gitignore syntax). Repeatable; wins over `--include`.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude_patterns: Vec<String>,

    /// Follow symlinked directories while scanning.
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Maximum walk depth below the scan root.
    #[arg(long, value_name = "N")]
    pub max_depth: Option<u32>,

    /// Skip files larger than this many bytes.
    #[arg(long, value_name = "BYTES")]
    pub max_file_size: Option<u64>,

    /// Worker thread count; defaults to the logical CPU count.
    #[arg(short = 'j', long, value_name = "N")]
    pub max_workers: Option<usize>,
}

#[derive(Args)]
pub struct RecordArgs {
    /// Maximum reconstructed record size in bytes before truncation.
    #[arg(long, value_name = "BYTES")]
    pub max_record_size: Option<usize>,

    /// How to render bytes that are not valid UTF-8.
    #[arg(long, value_enum, value_name = "POLICY")]
    pub encoding_errors: Option<EncodingErrorsArg>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EncodingErrorsArg {
    Replace,
    Ignore,
    Strict,
}

impl From<EncodingErrorsArg> for logfilter_core::config::EncodingErrors {
    fn from(v: EncodingErrorsArg) -> Self {
        match v {
            EncodingErrorsArg::Replace => logfilter_core::config::EncodingErrors::Replace,
            EncodingErrorsArg::Ignore => logfilter_core::config::EncodingErrors::Ignore,
            EncodingErrorsArg::Strict => logfilter_core::config::EncodingErrors::Strict,
        }
    }
}

#[derive(Args)]
pub struct OutputArgs {
    /// Write matches to this file instead of stdout.
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Allow overwriting an existing output file.
    #[arg(long)]
    pub overwrite: bool,

    /// Omit the `=== path (lines a-b) ===` header before each match.
    #[arg(long)]
    pub hide_path: bool,

    /// Wrap each matched term occurrence with `<<<...>>>`.
    #[arg(long)]
    pub highlight: bool,

    /// Force output in deterministic `(file_sequence_number, line_start)` order.
    #[arg(long)]
    pub deterministic_order: bool,

    /// Scan and report without writing any matched content.
    #[arg(long)]
    pub dry_run: bool,

    /// Like `--dry-run`, plus per-file size/line estimates.
    #[arg(long)]
    pub dry_run_details: bool,
}
