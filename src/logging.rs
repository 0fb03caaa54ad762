use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the stderr subscriber used by the CLI.
///
/// Stdout carries JSON results, so every log line goes to stderr. The level
/// comes from `RUST_LOG` and defaults to `warn`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false);
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
