//! Connect retry policy
//!
//! The core constrains how many times a session retries a failed connect and
//! how long it waits between attempts. Per-attempt timeouts belong to the
//! concrete transport, not this layer.

use std::time::Duration;

/// Default retry budget (retries after the initial attempt)
pub const DEFAULT_MAX_RETRY_COUNT: u32 = 3;

/// Backoff schedule for connect retries
///
/// Delays double from `base_delay` per retry and are capped at `max_delay`,
/// so the wait before retry `n` is `base_delay * 2^(n-1)` clamped to
/// `max_delay`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Upper bound on any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(15),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with a custom base delay
    pub fn with_base_delay(base_delay: Duration) -> Self {
        Self {
            base_delay,
            ..Default::default()
        }
    }

    /// Set the delay cap
    pub fn max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = max_delay;
        self
    }

    /// Delay to wait before retry number `retry` (1-based)
    pub fn delay_for(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1).min(30);
        let delay = self.base_delay.saturating_mul(1u32 << exponent);
        delay.min(self.max_delay)
    }
}
