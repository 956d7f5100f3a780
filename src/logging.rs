use tracing_subscriber::EnvFilter;

/// Install the global `tracing` subscriber.
///
/// With `debug` off the level is pinned to `info`. With it on, `RUST_LOG` wins when set and
/// `debug` is the fallback. Calling this twice is harmless; the second call does nothing.
pub fn init(debug: bool) {
    let filter = if debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::new("info")
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
