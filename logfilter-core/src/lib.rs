//! # logfilter-core
//!
//! Foundation crate for the logfilter engine.
//! Defines config, the shared error taxonomy, the pipeline event trait,
//! and common collection aliases. Every other crate in the workspace
//! depends on this.

pub mod config;
pub mod errors;
pub mod events;
pub mod tracing_init;
pub mod types;

pub use config::FilterConfig;
pub use errors::error_code::LogFilterErrorCode;
pub use events::handler::PipelineEventHandler;
pub use types::collections::FxHashMap;
