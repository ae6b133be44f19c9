//! Tracing initialization.
//!
//! Uses `config::ObservabilityConfig` for VMD_QUIET, VMD_LOG_LEVEL and VMD_LOG_JSON.
//! Events go to stderr; stdout is reserved for the setup banners.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize tracing. Call once at process startup, after `.env` is loaded.
/// When VMD_QUIET=1 only WARN and above are logged.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = if cfg.quiet {
        "warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(false),
            )
            .try_init()
    };
}

/// Whether info-level progress output should be suppressed.
pub fn is_quiet() -> bool {
    ObservabilityConfig::from_env().quiet
}
