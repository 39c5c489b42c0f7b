use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};
use logfilter_core::events::{FileCompleteEvent, PipelineErrorEvent, PipelineEventHandler, ScanProgressEvent, ScanStartedEvent};

/// Renders scan/file progress to stderr. `bar` starts in spinner mode
/// (file count unknown until the scan finishes) and switches to a bounded
/// bar once `on_scan_progress` reports a total.
pub struct ProgressReporter {
    bar: ProgressBar,
    sized: Mutex<bool>,
}

impl ProgressReporter {
    pub fn new() -> Self {
        let bar = ProgressBar::new_spinner();
        bar.set_style(ProgressStyle::with_template("{spinner} scanning...").unwrap());
        bar.enable_steady_tick(std::time::Duration::from_millis(120));
        Self {
            bar,
            sized: Mutex::new(false),
        }
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineEventHandler for ProgressReporter {
    fn on_scan_started(&self, event: &ScanStartedEvent) {
        self.bar.set_message(format!("scanning {}", event.root.display()));
    }

    fn on_scan_progress(&self, event: &ScanProgressEvent) {
        let mut sized = self.sized.lock().unwrap();
        if !*sized {
            if let Some(total) = event.files_total {
                self.bar.set_length(total as u64);
                self.bar
                    .set_style(ProgressStyle::with_template("{bar:40} {pos}/{len} files").unwrap());
                *sized = true;
            }
        }
        self.bar.set_position(event.files_processed as u64);
    }

    fn on_file_complete(&self, _event: &FileCompleteEvent) {}

    fn on_pipeline_error(&self, event: &PipelineErrorEvent) {
        self.bar.suspend(|| eprintln!("warning: {}", event.message));
    }
}
