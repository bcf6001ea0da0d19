//! Time source and day-aligned expiry timestamps.
//!
//! All timestamps are Unix seconds. Expiry values are truncated to midnight
//! (UTC) so a sweep either removes a whole day of rows or none of them.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::SystemTime;

/// Seconds per day.
pub const DAY: u64 = 24 * 3600;

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Current Unix timestamp in seconds.
    fn now(&self) -> u64;
}

/// Wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> u64 {
        SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

/// Manually driven clock for tests and replay tooling.
#[derive(Debug, Default)]
pub struct ManualClock(AtomicU64);

impl ManualClock {
    pub fn new(now: u64) -> Self {
        Self(AtomicU64::new(now))
    }

    pub fn set(&self, now: u64) {
        self.0.store(now, Ordering::SeqCst);
    }

    pub fn advance(&self, seconds: u64) {
        self.0.fetch_add(seconds, Ordering::SeqCst);
    }

    pub fn advance_days(&self, days: u64) {
        self.advance(days * DAY);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }
}

/// Truncate a timestamp to midnight of its day.
#[inline]
pub const fn day_floor(timestamp: u64) -> u64 {
    timestamp - timestamp % DAY
}

/// Day-aligned expiry timestamp `days` from `now`, at least one day ahead.
///
/// Never returns 0, which is reserved for live rows.
pub fn expiry_after_days(now: u64, days: u32) -> u64 {
    day_floor(now + u64::from(days.max(1)) * DAY)
}
