use std::time::Duration;

/// Bounded retry budget for transient provider unavailability.
///
/// The delay is plain data rather than a framework concern so tests can
/// run the same loop with `Duration::ZERO`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// Policy that never waits between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::ZERO,
        }
    }

    /// Delay before the next attempt, honoring a vendor-supplied hint.
    pub fn delay(&self, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or(self.base_delay)
    }
}
