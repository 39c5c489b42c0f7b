//! Logging setup built on `tracing` + `tracing-subscriber`.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber. `verbosity` follows the common
/// CLI convention: 0 = warn, 1 = info, 2 = debug, 3+ = trace. `RUST_LOG`
/// always takes precedence when set.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
