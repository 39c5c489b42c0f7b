mod cli;
mod config;
mod progress;

use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use logfilter_core::events::{NoOpEventHandler, PipelineEventHandler};
use logfilter_engine::pipeline::{self, PipelineInitError, RunStatus};

use cli::Cli;
use progress::ProgressReporter;

const EXIT_SUCCESS: u8 = 0;
const EXIT_OTHER_FATAL: u8 = 1;
const EXIT_PARSE_ERROR: u8 = 2;
const EXIT_CONFIG_ERROR: u8 = 3;
const EXIT_IO_ERROR: u8 = 4;
const EXIT_CANCELLED: u8 = 130;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logfilter_core::tracing_init::init_tracing(cli.verbose);

    let json_output = cli.json;
    let quiet = cli.quiet;

    let config = match config::build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    let stop = Arc::new(AtomicBool::new(false));
    let stop_for_signal = Arc::clone(&stop);
    if ctrlc::set_handler(move || stop_for_signal.store(true, Ordering::SeqCst)).is_err() {
        tracing::warn!("failed to install SIGINT handler; Ctrl-C will not cancel cleanly");
    }

    let reporter = (!quiet).then(ProgressReporter::new);
    let handler: &dyn PipelineEventHandler = reporter
        .as_ref()
        .map(|r| r as &dyn PipelineEventHandler)
        .unwrap_or(&NoOpEventHandler);

    let result = pipeline::run(&config, &stop, handler);

    if let Some(reporter) = &reporter {
        reporter.finish();
    }

    match result {
        Ok(summary) => {
            if json_output {
                match logfilter_engine::report::render_json(&summary.stats) {
                    Ok(text) => println!("{text}"),
                    Err(e) => eprintln!("error: failed to render JSON summary: {e}"),
                }
            } else {
                print!("{}", logfilter_engine::report::render_summary(&summary.stats));
            }

            match summary.status {
                RunStatus::Success => ExitCode::from(EXIT_SUCCESS),
                RunStatus::Cancelled => ExitCode::from(EXIT_CANCELLED),
            }
        }
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

fn exit_code_for(err: &PipelineInitError) -> u8 {
    match err {
        PipelineInitError::Parse(_) => EXIT_PARSE_ERROR,
        PipelineInitError::Config(_) => EXIT_CONFIG_ERROR,
        PipelineInitError::Writer(_) => EXIT_IO_ERROR,
        PipelineInitError::Pool(_) => EXIT_OTHER_FATAL,
    }
}
