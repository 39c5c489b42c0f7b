use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct ScanStartedEvent {
    pub root: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ScanProgressEvent {
    pub files_processed: usize,
    pub files_total: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct FileCompleteEvent {
    pub path: PathBuf,
    pub records_total: u64,
    pub records_matched: u64,
}

#[derive(Debug, Clone)]
pub struct PipelineErrorEvent {
    pub message: String,
}
