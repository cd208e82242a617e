//! Tracing/logging setup shared by every fleetdesk binary.

/// Initialize process-wide tracing with the format chosen by
/// `FLEETDESK_LOG_FORMAT` (`json` by default, `pretty` for local work).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init(tracing::LogFormat::from_env());
}

/// Tracing configuration (filters, formats).
pub mod tracing;
