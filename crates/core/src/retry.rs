//! Retry logic with exponential backoff
//!
//! Provides the retry policies used for backend calls:
//! - Exponential backoff with a delay cap
//! - Named policies for regular calls and health probes
//! - An async driver where the caller classifies each outcome
//!
//! # Example
//!
//! ```rust,no_run
//! use sunpath_core::retry::{retry_async, RetryConfig, RetryDecision};
//!
//! # async fn demo() {
//! let result = retry_async(
//!     &RetryConfig::default(),
//!     |r: &Result<u16, String>| match r {
//!         Ok(status) if *status >= 500 && *status != 504 => RetryDecision::Retry,
//!         Ok(_) => RetryDecision::Done,
//!         Err(_) => RetryDecision::Retry,
//!     },
//!     |_attempt| async { Ok::<_, String>(200u16) },
//! )
//! .await;
//! assert_eq!(result.value, Ok(200));
//! # }
//! ```

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Retry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Delay before the first retry
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    /// Three retries after the first attempt, waiting 1s, 2s and 4s.
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    /// Build a policy from a retry count (attempts = retries + 1)
    #[must_use]
    pub fn with_retries(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts: max_retries + 1,
            initial_delay,
            ..Self::default()
        }
    }

    /// Policy for keep-alive health probes: a single retry after 500ms
    #[must_use]
    pub fn health() -> Self {
        Self::with_retries(1, Duration::from_millis(500))
    }

    /// Create a config with no retries
    #[must_use]
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            backoff_multiplier: 1.0,
        }
    }

    /// Number of retries after the first attempt
    #[must_use]
    pub fn max_retries(&self) -> u32 {
        self.max_attempts.saturating_sub(1)
    }

    /// Calculate the delay to wait before `attempt` (0-based; attempt 0 never waits)
    #[must_use]
    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        if attempt == 0 {
            return Duration::ZERO;
        }

        let base_delay =
            self.initial_delay.as_secs_f64() * self.backoff_multiplier.powi(attempt as i32 - 1);

        Duration::from_secs_f64(base_delay.min(self.max_delay.as_secs_f64()))
    }
}

/// What to do with the outcome of one attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Hand this outcome to the caller
    Done,
    /// Try again if attempts remain; otherwise hand it to the caller
    Retry,
}

/// Retry result with attempt information
#[derive(Debug)]
pub struct RetryResult<T> {
    /// The outcome of the last attempt made
    pub value: T,
    /// Number of attempts made
    pub attempts: u32,
}

/// Run `op` until `classify` says [`RetryDecision::Done`] or attempts run out.
///
/// The outcome of the final attempt is returned as-is, whether it was
/// classified as retryable or not.
pub async fn retry_async<T, E, F, Fut, C>(
    config: &RetryConfig,
    classify: C,
    mut op: F,
) -> RetryResult<Result<T, E>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    C: Fn(&Result<T, E>) -> RetryDecision,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt);
            debug!(
                attempt = attempt + 1,
                max_attempts,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                "Retrying after delay"
            );
            tokio::time::sleep(delay).await;
        }

        let outcome = op(attempt).await;
        attempt += 1;

        if attempt >= max_attempts || classify(&outcome) == RetryDecision::Done {
            return RetryResult {
                value: outcome,
                attempts: attempt,
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn retry_on_err(r: &Result<&'static str, &'static str>) -> RetryDecision {
        if r.is_err() {
            RetryDecision::Retry
        } else {
            RetryDecision::Done
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_first_attempt() {
        let result = retry_async(&RetryConfig::default(), retry_on_err, |_| async {
            Ok("success")
        })
        .await;

        assert_eq!(result.value, Ok("success"));
        assert_eq!(result.attempts, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_success_after_failures() {
        let calls = AtomicU32::new(0);
        let result = retry_async(&RetryConfig::default(), retry_on_err, |_| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move { if n < 2 { Err("not yet") } else { Ok("success") } }
        })
        .await;

        assert_eq!(result.value, Ok("success"));
        assert_eq!(result.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_exhausted_returns_last_outcome() {
        let config = RetryConfig::with_retries(2, Duration::from_millis(10));
        let result = retry_async(&config, retry_on_err, |_| async { Err::<&str, _>("boom") }).await;

        assert_eq!(result.value, Err("boom"));
        assert_eq!(result.attempts, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_done_stops_immediately() {
        let calls = AtomicU32::new(0);
        let result = retry_async(
            &RetryConfig::default(),
            |_: &Result<(), &str>| RetryDecision::Done,
            |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err("fatal") }
            },
        )
        .await;

        assert_eq!(result.attempts, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_one_two_four_seconds() {
        let start = tokio::time::Instant::now();
        let result = retry_async(&RetryConfig::default(), retry_on_err, |_| async {
            Err::<&str, _>("down")
        })
        .await;

        assert_eq!(result.attempts, 4);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_secs(7));
        assert!(elapsed < Duration::from_secs(8));
    }

    #[test]
    fn test_delay_calculation() {
        let config = RetryConfig::default();

        assert_eq!(config.delay_for_attempt(0), Duration::ZERO);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(1000));
        assert_eq!(config.delay_for_attempt(2), Duration::from_millis(2000));
        assert_eq!(config.delay_for_attempt(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_delay_is_capped() {
        let config = RetryConfig {
            max_delay: Duration::from_millis(1500),
            ..RetryConfig::default()
        };
        assert_eq!(config.delay_for_attempt(5), Duration::from_millis(1500));
    }

    #[test]
    fn test_delays_are_deterministic() {
        let config = RetryConfig::with_retries(3, Duration::from_millis(250));
        let first: Vec<_> = (0..4).map(|a| config.delay_for_attempt(a)).collect();
        let second: Vec<_> = (0..4).map(|a| config.delay_for_attempt(a)).collect();
        assert_eq!(first, second);
        assert_eq!(first[3], Duration::from_millis(1000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_retry_makes_one_attempt() {
        let result = retry_async(&RetryConfig::no_retry(), retry_on_err, |_| async {
            Err::<&str, _>("down")
        })
        .await;
        assert_eq!(result.attempts, 1);
        assert_eq!(result.value, Err("down"));
    }

    #[test]
    fn test_health_policy() {
        let config = RetryConfig::health();
        assert_eq!(config.max_retries(), 1);
        assert_eq!(config.delay_for_attempt(1), Duration::from_millis(500));
    }
}
