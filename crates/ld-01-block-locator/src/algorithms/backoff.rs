//! # Provider Call Retry
//!
//! Exponential backoff around a single chain-data provider call. Calls are
//! retried in place, one at a time, so the binary search still observes a
//! strictly sequential sequence of probes.

use std::future::Future;

use crate::config::RetryPolicy;
use crate::domain::{LocatorError, ProviderError};

/// Run `call` until it succeeds or the attempt budget is spent.
///
/// Exhaustion maps to `EntropySourceUnavailable` carrying the last error.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut call: F,
) -> Result<T, LocatorError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ProviderError>>,
{
    let attempts = policy.max_attempts.max(1);
    let mut last_error: Option<ProviderError> = None;

    for attempt in 0..attempts {
        match call().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                if attempt + 1 < attempts {
                    let delay = policy.delay_for(attempt);
                    tracing::warn!(
                        operation,
                        attempt = attempt + 1,
                        max_attempts = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Provider call failed, backing off"
                    );
                    if !delay.is_zero() {
                        tokio::time::sleep(delay).await;
                    }
                }
                last_error = Some(e);
            }
        }
    }

    let reason = last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no attempt made".to_string());
    tracing::error!(operation, attempts, %reason, "Provider retries exhausted");
    Err(LocatorError::EntropySourceUnavailable { attempts, reason })
}
