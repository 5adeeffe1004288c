//! Exponential backoff schedule for reconnect attempts.

use std::time::Duration;

/// Cap on the doubling exponent so the shift can never overflow.
const MAX_BACKOFF_EXPONENT: u32 = 30;

/// Tracks reconnect attempts and produces the delay before each one.
///
/// The delay for attempt `n` (zero-based) is `base_delay * 2^n`. With the
/// default base of one second that yields 1s, 2s, 4s, 8s, 16s. Once
/// `max_attempts` delays have been handed out the policy is exhausted and
/// [`ReconnectPolicy::next_delay`] returns `None`.
#[derive(Debug, Clone)]
pub struct ReconnectPolicy {
    base_delay_ms: u64,
    max_attempts: u32,
    attempt: u32,
}

impl ReconnectPolicy {
    #[must_use]
    pub fn new(base_delay: Duration, max_attempts: u32) -> Self {
        Self {
            base_delay_ms: base_delay.as_millis() as u64,
            max_attempts,
            attempt: 0,
        }
    }

    /// Delay before zero-based reconnect attempt `attempt`.
    #[must_use]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT);
        Duration::from_millis(self.base_delay_ms.saturating_mul(1u64 << exponent))
    }

    /// Takes the next delay from the schedule, or `None` once every
    /// attempt has been used up.
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempt >= self.max_attempts {
            return None;
        }
        let delay = self.delay_for_attempt(self.attempt);
        self.attempt += 1;
        Some(delay)
    }

    /// Clears the attempt counter after a successful connection.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of delays handed out since the last reset.
    #[must_use]
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    #[must_use]
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Whether the schedule has run out of attempts.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.attempt >= self.max_attempts
    }
}
