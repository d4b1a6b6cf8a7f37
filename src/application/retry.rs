//! Fixed-delay retry wrapper for outbound calls.

use std::fmt::Display;
use std::future::Future;
use std::iter::Take;
use std::time::Duration;

use tokio_retry::Retry;
use tokio_retry::strategy::FixedInterval;
use tracing::warn;

/// How often and how patiently an outbound call is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first call included. Never below 1.
    pub max_attempts: u32,
    /// Pause between two attempts.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// A policy that calls the operation exactly once.
    pub fn no_retry() -> Self {
        Self::new(1, Duration::ZERO)
    }

    fn strategy(&self) -> Take<FixedInterval> {
        FixedInterval::new(self.delay).take(self.max_attempts.saturating_sub(1) as usize)
    }
}

/// Runs `op`, re-running it after `policy.delay` until it succeeds or
/// `policy.max_attempts` calls were made.
///
/// Returns the first success or the error of the final attempt. Every failed
/// attempt is logged at `warn` with `label` identifying the call.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut op: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 0_u32;

    Retry::spawn(policy.strategy(), || {
        attempt += 1;
        let current = attempt;
        let call = op();
        async move {
            call.await.inspect_err(|e| {
                warn!(
                    call = label,
                    attempt = current,
                    max_attempts,
                    "Outbound call failed: {}",
                    e
                );
            })
        }
    })
    .await
}
