//! Process-wide tracing/logging setup shared by the binaries.

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Initialize process-wide observability with the default filter.
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::DEFAULT_FILTER);
}
