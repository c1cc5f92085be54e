//! Unix-time helpers shared by the supervisor and the HTTP clients

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Get the current Unix timestamp in seconds.
///
/// # Panics
/// Panics if the system time is before the Unix epoch (1970-01-01),
/// which would indicate a severely misconfigured system.
///
/// # Examples
/// ```
/// use fg_core::time::current_time_secs;
///
/// assert!(current_time_secs() > 0);
/// ```
pub fn current_time_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX epoch")
        .as_secs()
}

/// Timestamp `max_age` before `now`, saturating at the epoch.
///
/// A record whose timestamp is at or before the cutoff is older than
/// `max_age`.
pub fn cutoff_secs(now: u64, max_age: Duration) -> u64 {
    now.saturating_sub(max_age.as_secs())
}

/// Seconds elapsed since a Unix timestamp.
///
/// Returns 0 if the given time is in the future.
pub fn elapsed_secs(since: u64) -> u64 {
    current_time_secs().saturating_sub(since)
}
