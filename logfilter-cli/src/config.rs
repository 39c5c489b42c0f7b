use std::path::PathBuf;

use logfilter_core::config::FilterConfig;
use logfilter_core::errors::ConfigError;

use crate::cli::Cli;

/// Loads the base config (a TOML file if `--config` was given, otherwise
/// `FilterConfig::default()`) and layers CLI flags on top. CLI flags
/// always win; a flag's absence leaves the file's value untouched.
pub fn build_config(cli: &Cli) -> Result<FilterConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_toml(path)?,
        None => FilterConfig::default(),
    };

    if let Some(expression) = &cli.expression {
        config.expression = expression.clone();
    }
    if let Some(root) = &cli.root {
        config.search_root = root.clone();
    }
    if config.search_root.as_os_str().is_empty() {
        config.search_root = PathBuf::from(".");
    }

    if cli.expr_opts.case_sensitive {
        config.case_sensitive = Some(true);
    }
    if cli.expr_opts.date_from.is_some() {
        config.date_from = cli.expr_opts.date_from;
    }
    if cli.expr_opts.date_to.is_some() {
        config.date_to = cli.expr_opts.date_to;
    }
    if cli.expr_opts.time_from.is_some() {
        config.time_from = cli.expr_opts.time_from;
    }
    if cli.expr_opts.time_to.is_some() {
        config.time_to = cli.expr_opts.time_to;
    }

    if !cli.scan_opts.include_patterns.is_empty() {
        config.include_patterns = cli.scan_opts.include_patterns.clone();
    }
    if !cli.scan_opts.exclude_patterns.is_empty() {
        config.exclude_patterns = cli.scan_opts.exclude_patterns.clone();
    }
    if cli.scan_opts.follow_symlinks {
        config.follow_symlinks = Some(true);
    }
    if cli.scan_opts.max_depth.is_some() {
        config.max_depth = cli.scan_opts.max_depth;
    }
    if cli.scan_opts.max_file_size.is_some() {
        config.max_file_size = cli.scan_opts.max_file_size;
    }
    if cli.scan_opts.max_workers.is_some() {
        config.max_workers = cli.scan_opts.max_workers;
    }

    if cli.record_opts.max_record_size.is_some() {
        config.max_record_size = cli.record_opts.max_record_size;
    }
    if let Some(policy) = cli.record_opts.encoding_errors {
        config.encoding_errors = Some(policy.into());
    }

    if cli.output_opts.output.is_some() {
        config.output_file = cli.output_opts.output.clone();
    }
    if cli.output_opts.overwrite {
        config.overwrite = Some(true);
    }
    if cli.output_opts.hide_path {
        config.include_path = Some(false);
    }
    if cli.output_opts.highlight {
        config.highlight = Some(true);
    }
    if cli.output_opts.deterministic_order {
        config.deterministic_order = Some(true);
    }
    if cli.output_opts.dry_run {
        config.dry_run = Some(true);
    }
    if cli.output_opts.dry_run_details {
        config.dry_run_details = Some(true);
    }

    config.validate()?;
    Ok(config)
}

fn load_toml(path: &PathBuf) -> Result<FilterConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::new("config", format!("failed to read {}: {e}", path.display())))?;
    toml::from_str(&text).map_err(|e| ConfigError::new("config", format!("failed to parse {}: {e}", path.display())))
}
