pub mod build_info;

use std::sync::Once;

/// Filter directive used when `RUST_LOG` is not set.
pub const DEFAULT_LOG_FILTER: &str = "fleet_wizard=info";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with the default filter.
pub fn init_tracing() {
    init_tracing_with(DEFAULT_LOG_FILTER);
}

/// Initializes the global tracing subscriber, falling back to `directive`
/// when `RUST_LOG` is absent or unparsable. Only the first call has effect.
pub fn init_tracing_with(directive: &str) {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));

        // Another subscriber may already be installed by the host.
        let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
    });
}
