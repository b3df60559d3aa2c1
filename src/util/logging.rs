use tracing_subscriber::{fmt, EnvFilter};

/// Initializes tracing/logging based on `RUST_LOG`.
///
/// Log lines go to stderr; stdout is reserved for the workbench view.
pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false);

    subscriber.init();
}
