//! Installs the process-wide logger.
//!
//! Filtering is taken from the environment, for example:
//! ```bash
//! RUST_LOG=routeplanner=debug
//! ```

/// Initialises the logger. Without the `tracing` feature this is a plain
/// `env_logger`; with it, `log` records are bridged into a `tracing_subscriber`
/// registry so instrumented protocol calls show their spans.
///
/// Calling this more than once is harmless, later calls are ignored.
#[cfg(not(feature = "tracing"))]
pub fn initialize_logger() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}

#[cfg(feature = "tracing")]
pub fn initialize_logger() {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let fmt_layer = tracing_subscriber::fmt::layer();

    // Initialise tracing with subscribers and environment filter
    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(fmt_layer)
        .try_init();
}
