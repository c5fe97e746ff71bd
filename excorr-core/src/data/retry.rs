//! Bounded retry policy for transient fetch failures.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Wait between attempts.
///
/// The default retries immediately; fixed and exponential delays are opt-in
/// for sources that throttle rapid repeats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RetryDelay {
    #[default]
    None,
    Fixed { millis: u64 },
    Exponential { base_millis: u64, max_millis: u64 },
}

/// How many times to retry a transient failure, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Additional attempts after the first one.
    pub max_retries: u32,
    pub delay: RetryDelay,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 10;

    /// Retry immediately, up to `max_retries` extra attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            delay: RetryDelay::None,
        }
    }

    /// Total attempts, first one included.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Wait before retry number `retry` (1-based).
    pub fn delay_before(&self, retry: u32) -> Duration {
        match self.delay {
            RetryDelay::None => Duration::ZERO,
            RetryDelay::Fixed { millis } => Duration::from_millis(millis),
            RetryDelay::Exponential {
                base_millis,
                max_millis,
            } => {
                let factor = 2u64.saturating_pow(retry.saturating_sub(1));
                Duration::from_millis(base_millis.saturating_mul(factor).min(max_millis))
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::immediate(Self::DEFAULT_MAX_RETRIES)
    }
}
