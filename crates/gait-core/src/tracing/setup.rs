//! Tracing initialization and configuration.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Initialize the tracing/logging system.
///
/// Reads the `GAIT_LOG` environment variable for per-module log levels.
/// Format: `GAIT_LOG=gait_validation::batch=debug,gait_storage=warn`
///
/// Falls back to `gait=info` if `GAIT_LOG` is not set or is invalid.
/// Idempotent.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_env("GAIT_LOG").unwrap_or_else(|_| EnvFilter::new("gait=info"));

        // try_init: an embedding application may already own the global subscriber.
        let _ = tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .with(filter)
            .try_init();
    });
}
