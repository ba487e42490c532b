//! Exponential backoff policy for delivery retries

use std::time::Duration;

/// Cap on the exponent so a large starting attempt index cannot overflow
const MAX_SHIFT: u32 = 20;

/// Bounded exponential backoff: `base * 2^attempt`, no jitter.
///
/// Attempt indices start at 0, so with the default base delay of one
/// second the waits are 1s, 2s, 4s for attempts 0, 1, 2.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_retries: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, base_delay: Duration) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Highest attempt index that is still retried after a failure
    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    /// Delay to wait after a failed attempt with the given index
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay
            .saturating_mul(1u32 << attempt.min(MAX_SHIFT))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}
