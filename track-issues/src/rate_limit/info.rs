//! Rate limit information.

use std::time::Duration;

/// Maximum time to wait for rate limit reset (1 hour).
pub const MAX_WAIT_SECS: u64 = 3600;

/// Minimum remaining requests before proactively waiting.
pub const MIN_REMAINING_THRESHOLD: u32 = 5;

/// Rate limit information for a specific resource.
#[derive(Debug, Clone)]
pub struct RateLimitInfo {
    /// Requests remaining in the current window.
    pub remaining: u32,

    /// Unix timestamp when the rate limit resets.
    pub reset: u64,

    /// Total requests allowed per window.
    pub limit: u32,
}

impl RateLimitInfo {
    /// Returns how long to pause at time `now` (unix seconds), if at all.
    ///
    /// The wait is capped at [`MAX_WAIT_SECS`].
    #[must_use]
    pub fn wait_duration(&self, now: u64) -> Option<Duration> {
        if self.remaining >= MIN_REMAINING_THRESHOLD || self.reset <= now {
            return None;
        }
        Some(Duration::from_secs((self.reset - now).min(MAX_WAIT_SECS)))
    }
}
