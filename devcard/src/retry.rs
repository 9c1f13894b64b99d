// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Exponential backoff for calls to the metrics provider.
//!
//! Every page request is retried independently. Once the attempts are
//! exhausted the last error is returned and the badge that needed the page
//! is abandoned as a whole.

use std::time::Duration;

use masterror::AppError;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Configuration for retry behavior with exponential backoff.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one (default: 3).
    pub max_attempts:     u32,
    /// Delay before the second attempt in milliseconds (default: 1000).
    pub initial_delay_ms: u64,
    /// Multiplier applied to the delay after each failure (default: 2.0).
    pub backoff_factor:   f64,
    /// Upper bound for a single delay in milliseconds (default: 10000).
    pub max_delay_ms:     u64
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts:     3,
            initial_delay_ms: 1000,
            backoff_factor:   2.0,
            max_delay_ms:     10_000
        }
    }
}

impl RetryConfig {
    /// Configuration that performs a single attempt.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    fn next_delay(&self, current_ms: u64) -> u64 {
        let scaled = (current_ms as f64 * self.backoff_factor) as u64;
        scaled.min(self.max_delay_ms)
    }
}

/// Executes an async operation with exponential backoff retry logic.
///
/// # Errors
///
/// Returns the last error encountered if all attempts fail.
///
/// # Example
///
/// ```no_run
/// use devcard::retry::{RetryConfig, retry_with_backoff};
/// use masterror::AppError;
///
/// # async fn example() -> Result<(), AppError> {
/// let config = RetryConfig::default();
/// let page = retry_with_backoff(&config, "languages page", || async {
///     Ok::<_, AppError>(42)
/// })
/// .await?;
/// # Ok(())
/// # }
/// ```
pub async fn retry_with_backoff<F, Fut, T>(
    config: &RetryConfig,
    operation_name: &str,
    mut f: F
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, AppError>>
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;
    let mut delay_ms = config.initial_delay_ms;

    loop {
        match f().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!(operation = operation_name, attempt, "succeeded after retry");
                }
                return Ok(result);
            }
            Err(error) => {
                if attempt >= max_attempts {
                    warn!(
                        operation = operation_name,
                        attempts = max_attempts,
                        %error,
                        "giving up"
                    );
                    return Err(error);
                }

                warn!(
                    operation = operation_name,
                    attempt,
                    max_attempts,
                    delay_ms,
                    %error,
                    "attempt failed, retrying"
                );

                sleep(Duration::from_millis(delay_ms)).await;
                delay_ms = config.next_delay(delay_ms);
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicU32, Ordering}
    };

    use super::*;

    fn fast(max_attempts: u32) -> RetryConfig {
        RetryConfig {
            max_attempts,
            initial_delay_ms: 1,
            backoff_factor: 2.0,
            max_delay_ms: 4
        }
    }

    #[test]
    fn retry_config_default_values() {
        let config = RetryConfig::default();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.initial_delay_ms, 1000);
        assert_eq!(config.backoff_factor, 2.0);
        assert_eq!(config.max_delay_ms, 10_000);
    }

    #[test]
    fn delays_are_capped() {
        let config = fast(5);
        assert_eq!(config.next_delay(1), 2);
        assert_eq!(config.next_delay(2), 4);
        assert_eq!(config.next_delay(4), 4);
    }

    #[tokio::test]
    async fn retry_succeeds_on_first_attempt() {
        let result = retry_with_backoff(&fast(3), "test", || async { Ok::<_, AppError>(42) })
            .await
            .expect("should succeed");
        assert_eq!(result, 42);
    }

    #[tokio::test]
    async fn retry_succeeds_after_failures() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();

        let result = retry_with_backoff(&fast(3), "test", move || {
            let counter = seen.clone();
            async move {
                let count = counter.fetch_add(1, Ordering::SeqCst) + 1;
                if count < 3 {
                    Err(AppError::service("temporary failure"))
                } else {
                    Ok(42)
                }
            }
        })
        .await
        .expect("should succeed after retries");

        assert_eq!(result, 42);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retry_fails_after_max_attempts() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();

        let result = retry_with_backoff(&fast(2), "test", move || {
            let counter = seen.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(AppError::service("persistent failure"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn no_retry_performs_exactly_one_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let seen = counter.clone();

        let result = retry_with_backoff(&RetryConfig::no_retry(), "test", move || {
            let counter = seen.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Err::<i32, _>(AppError::service("down"))
            }
        })
        .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }
}
