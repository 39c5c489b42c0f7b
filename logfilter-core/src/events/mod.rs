//! Pipeline lifecycle events. Observers (a progress bar, stats, a test
//! harness) are wired in at pipeline construction as trait objects, never
//! as dynamic subscribers.

pub mod handler;
pub mod types;

pub use handler::{NoOpEventHandler, PipelineEventHandler};
pub use types::*;
