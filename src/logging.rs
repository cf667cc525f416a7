//! # Logging Setup
//!
//! Subscriber initialization for binaries. The library itself only emits
//! `tracing` events, which are no-ops without an installed subscriber, so
//! embedding callers get silence by default and can install whatever
//! subscriber suits them.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize a stderr subscriber for the CLI.
///
/// Logs go to stderr so received message bodies on stdout can be piped or
/// redirected without pollution. `verbose` lowers the default filter to
/// `debug`; `RUST_LOG` overrides either default. Safe to call more than
/// once; only the first call installs a subscriber.
pub fn init_logging(verbose: bool) {
    LOGGER_INITIALIZED.get_or_init(|| {
        let default_filter = if verbose { "debug" } else { "warn" };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true)
            .init();
    });
}
