use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

/// Installs the global `tracing` subscriber.
///
/// Verbosity comes from `RUST_LOG`, defaulting to `info`.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    SubscriberBuilder::default().with_env_filter(filter).init();
}
