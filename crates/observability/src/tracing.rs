//! Tracing/logging initialization.
//!
//! JSON lines on stdout, one object per event, filtered by `RUST_LOG`.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "info";

/// Initialize tracing for the process with [`DEFAULT_FILTER`] as fallback.
pub fn init() {
    init_with_default(DEFAULT_FILTER);
}

/// Initialize tracing, falling back to `default_directive` when `RUST_LOG` is not usable.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_with_default(default_directive: &str) -> bool {
    let installed = tracing_subscriber::fmt()
        .with_env_filter(env_filter(default_directive))
        .json()
        .with_timer(tracing_subscriber::fmt::time::SystemTime)
        .with_current_span(true)
        .with_target(false)
        .try_init()
        .is_ok();

    if installed {
        ::tracing::debug!(default_directive, "tracing initialized");
    }
    installed
}

fn env_filter(default_directive: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_with_default("debug");
        assert!(!init_with_default("info"));
    }
}
