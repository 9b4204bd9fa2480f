//! # Block Locator Configuration
//!
//! Retry and backoff settings for provider round-trips.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Exponential backoff for a single provider call.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total attempts per call, including the first one.
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds.
    pub base_delay_ms: u64,
    /// Upper bound for any single delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 500,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    /// Delay before retry number `retry` (0-based): `base * 2^retry`, capped.
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 1u64 << retry.min(16);
        Duration::from_millis(self.base_delay_ms.saturating_mul(factor).min(self.max_delay_ms))
    }
}

/// Block locator configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Backoff applied to every provider call.
    pub retry: RetryPolicy,
}

impl LocatorConfig {
    /// Create a config for testing (no sleeping between retries).
    pub fn for_testing() -> Self {
        Self {
            retry: RetryPolicy {
                max_attempts: 3,
                base_delay_ms: 0,
                max_delay_ms: 0,
            },
        }
    }
}
