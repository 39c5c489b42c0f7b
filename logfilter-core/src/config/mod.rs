//! Configuration surface consumed from an external loader (CLI flags,
//! TOML file, or both).

pub mod filter_config;

pub use filter_config::{EncodingErrors, FilterConfig};
