//! Tracing/logging setup shared by the service binary.

/// Initialize process-wide tracing with the default filter.
///
/// Safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
