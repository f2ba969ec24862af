use std::sync::Once;

use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_FILTER: &str = "info";

static INIT: Once = Once::new();

/// Installs the global `fmt` subscriber on stderr, filtered by `RUST_LOG`.
///
/// Safe to call more than once; only the first call installs anything.
pub fn init_once() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        // another subscriber may already be installed by a test harness
        if fmt()
            .with_env_filter(filter)
            .with_writer(::std::io::stderr)
            .try_init()
            .is_ok()
        {
            debug!("tracer initialized");
        }
    })
}
