//! Logging configuration.
//!
//! Logs go to stderr so stdout carries nothing but the listing. Verbosity is
//! controlled by the `RUST_LOG` environment variable; by default only warnings
//! and errors from this crate are shown.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "caselist=warn";

/// Initialize tracing for the CLI (stderr logging).
pub fn init_cli() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    // A subscriber may already be installed when running embedded; keep it.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .compact(),
        )
        .try_init();
}
