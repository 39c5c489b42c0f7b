//! Polymorphic line iteration over plain and gzip-compressed files.

pub mod line_source;

pub use line_source::{open_line_source, LineSource};
