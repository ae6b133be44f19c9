//! Quiet-mode aware logging. When VMD_QUIET=1, suppress progress at info level.
//! Uses `tracing::info!` so output is captured by the tracing subscriber.

#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        if !$crate::log::is_quiet() {
            tracing::info!($($arg)*);
        }
    }};
}

pub fn is_quiet() -> bool {
    vmd_bootstrap_core::observability::is_quiet()
}
