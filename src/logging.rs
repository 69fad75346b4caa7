//! Tracing subscriber setup for the CLI.

use tracing_subscriber::EnvFilter;

/// Default filter directive for a given `-v` count.
pub fn default_directive(verbose: u8) -> &'static str {
    match verbose {
        0 => "marketcharts=info",
        1 => "marketcharts=debug",
        _ => "marketcharts=trace",
    }
}

/// Install the global subscriber, writing to stderr so stdout only carries
/// the artifact path. `RUST_LOG` takes precedence over `verbose`.
/// Calling this more than once is harmless.
pub fn init_logging(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
