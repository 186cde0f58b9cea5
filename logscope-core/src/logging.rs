use tracing_subscriber::{EnvFilter, fmt};

/// Install the global subscriber: JSON lines on stderr, filtered by `RUST_LOG`
/// (defaults to `info`), with event fields flattened into the top-level object.
///
/// Stdout is left to command output.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .json()
        .flatten_event(true)
        .init();
}
