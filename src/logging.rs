//! One-shot global logging setup built on `tracing`.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Install the global `tracing` subscriber.
///
/// The filter follows the usual `RUST_LOG` syntax (e.g. "info",
/// "prism=debug"). When `RUST_LOG` is unset, `default_filter` is used.
///
/// This function is idempotent; subsequent calls are ignored. Intended usage
/// is early in `main`.
pub fn init(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));

    INIT.call_once(|| {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        tracing::debug!("logging initialized");
    });
}
