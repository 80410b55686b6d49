//! Application Constants
//!
//! Centralized tuning constants for pagination, batching and history queries.

/// Default device list page size
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// History query page size
pub const HISTORY_PAGE_SIZE: u32 = 200;

/// Default history window length looking back from session start
pub const HISTORY_DEFAULT_WINDOW_HOURS: i64 = 24;

/// History date picker bound around session start, in days
pub const HISTORY_BOUND_DAYS: i64 = 365;

/// Maximum in-flight requests for a batch property write.
/// Bounds concurrent load on the upstream API without wall-clock staggering.
pub const WRITE_CONCURRENCY: usize = 2;

/// Success code expected from the token endpoint family
pub const TOKEN_SUCCESS_CODE: i64 = 200;
