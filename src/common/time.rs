//! Clock helpers for latency fields in the log stream.

use std::time::{SystemTime, UNIX_EPOCH};

/// Current timestamp in milliseconds since the Unix epoch.
pub fn now_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

/// Milliseconds elapsed since `start_ms`, clamped at zero if the clock stepped back.
pub fn since_ms(start_ms: u128) -> u128 {
    now_ms().saturating_sub(start_ms)
}

/// Narrow a millisecond count for a log field, saturating instead of wrapping.
pub fn clamp_ms(ms: u128) -> u64 {
    u64::try_from(ms).unwrap_or(u64::MAX)
}
