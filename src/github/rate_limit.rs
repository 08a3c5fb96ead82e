//! Quota window attached to rate-limit failures.
//!
//! When GitHub rejects a request for exceeding the quota, the gateways ask
//! `/rate_limit` for the current window so the error can tell the operator
//! how large the quota is, how much is left and when to retry.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Core quota window as reported by `/rate_limit`.
///
/// ```
/// use std::time::Duration;
///
/// use ghaudit::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 0, 1_700_000_060);
/// assert_eq!(info.retry_after_at(1_700_000_000), Duration::from_secs(60));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a window from the quota, the remaining calls and the reset
    /// time in Unix seconds.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Requests allowed per window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Requests left in this window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Unix time at which the window resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Wait before the window resets, measured from `now` in Unix seconds.
    #[must_use]
    pub const fn retry_after_at(&self, now: u64) -> Duration {
        Duration::from_secs(self.reset_at.saturating_sub(now))
    }

    /// Wait before the window resets, measured from the system clock.
    ///
    /// A clock set before the Unix epoch counts as the epoch itself.
    #[must_use]
    pub fn retry_after(&self) -> Duration {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_secs());
        self.retry_after_at(now)
    }
}

impl fmt::Display for RateLimitInfo {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{remaining}/{limit} requests left, resets at {reset} (retry after {wait}s)",
            remaining = self.remaining,
            limit = self.limit,
            reset = self.reset_at,
            wait = self.retry_after().as_secs()
        )
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use rstest::rstest;

    use super::RateLimitInfo;

    #[rstest]
    #[case::future_reset(1_060, 1_000, 60)]
    #[case::reset_now(1_000, 1_000, 0)]
    #[case::reset_passed(900, 1_000, 0)]
    fn retry_after_counts_down_to_reset(
        #[case] reset_at: u64,
        #[case] now: u64,
        #[case] expected: u64,
    ) {
        let info = RateLimitInfo::new(5000, 0, reset_at);

        assert_eq!(info.retry_after_at(now), Duration::from_secs(expected));
    }

    #[rstest]
    fn display_reports_quota_and_reset() {
        let info = RateLimitInfo::new(5000, 0, 0);

        assert_eq!(
            info.to_string(),
            "0/5000 requests left, resets at 0 (retry after 0s)"
        );
    }
}
