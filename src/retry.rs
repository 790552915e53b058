//! Bounded retry with exponential backoff for API requests.

use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::error::{ApiError, ApiResult};

/// Retry policy used by the API clients.
///
/// Decoupled from the HTTP call itself: `delay` and `should_retry` are pure,
/// so the schedule is testable without a network. The default matches the
/// services' published limits: three total attempts, 1s/2s/4s backoff.
#[derive(Clone, Copy, Debug)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Backoff slept after a failed attempt: `base_delay * 2^(attempt - 1)`.
    pub fn delay(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
        Duration::from_millis((self.base_delay.as_millis() as u64).saturating_mul(factor))
    }

    /// Whether `err` is transient and the attempt budget allows another try.
    ///
    /// Credential and protocol failures never retry; they cannot self-heal.
    pub fn should_retry(&self, err: &ApiError, attempt: u32) -> bool {
        if attempt >= self.max_attempts {
            return false;
        }
        matches!(
            err,
            ApiError::RateLimit | ApiError::Server { .. } | ApiError::Network(_)
        )
    }
}

/// Drives `op` until it succeeds, fails fatally, or the attempt budget is
/// exhausted, sleeping the policy's backoff between attempts.
///
/// The closure receives the 1-based attempt number and must build its
/// request from scratch on every invocation: a retried call needs a fresh
/// nonce, timestamp, and signature, or the remote may reject it as a replay.
/// The last error is surfaced unwrapped once the budget runs out.
pub async fn with_retry<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> ApiResult<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = ApiResult<T>>,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) if policy.should_retry(&err, attempt) => {
                sleep(policy.delay(attempt)).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
