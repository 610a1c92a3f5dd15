/*!
 * Retry policy with exponential backoff.
 *
 * The delay computation is a pure function of the attempt number, and the
 * waiting itself goes through the `Sleeper` trait so callers can substitute a
 * recording sleeper in tests.
 */

use async_trait::async_trait;
use log::warn;
use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::app_config::RetryConfig;

/// Waits between attempts
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspend the current task for `duration`
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// How often and how patiently a failing operation is retried
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Delay before the first retry
    pub base_delay: Duration,
    /// Multiplier applied for each further retry
    pub backoff: f64,
}

/// Outcome of a policy run that never succeeded
#[derive(Debug, Clone, PartialEq)]
pub struct RetryExhausted<E> {
    /// Attempts made, always `max_retries + 1`
    pub attempts: u32,
    /// Error returned by the last attempt
    pub last_error: E,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&RetryConfig::default())
    }
}

impl RetryPolicy {
    /// Create a policy
    pub fn new(max_retries: u32, base_delay: Duration, backoff: f64) -> Self {
        Self { max_retries, base_delay, backoff }
    }

    /// Build the policy described by the configuration
    pub fn from_config(config: &RetryConfig) -> Self {
        Self::new(
            config.max_retries,
            Duration::try_from_secs_f64(config.retry_delay_secs.max(0.0)).unwrap_or(Duration::MAX),
            config.retry_backoff,
        )
    }

    /// Total number of attempts allowed
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the `attempt`-th failure (1-based): `base * backoff^(attempt-1)`
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(i32::MAX as u32) as i32;
        let factor = self.backoff.powi(exponent);
        let secs = self.base_delay.as_secs_f64() * factor;
        Duration::try_from_secs_f64(secs.max(0.0)).unwrap_or(Duration::MAX)
    }

    /// Run `operation` until it succeeds or the attempts are used up
    ///
    /// `operation` receives the 1-based attempt number. `label` only feeds the
    /// log messages.
    pub async fn execute<T, E, F, Fut>(
        &self,
        sleeper: &dyn Sleeper,
        label: &str,
        mut operation: F,
    ) -> Result<T, RetryExhausted<E>>
    where
        E: Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut attempt = 1;
        loop {
            match operation(attempt).await {
                Ok(value) => return Ok(value),
                Err(error) => {
                    if attempt > self.max_retries {
                        warn!(
                            "{}: failed after {} retries: {}",
                            label, self.max_retries, error
                        );
                        return Err(RetryExhausted { attempts: attempt, last_error: error });
                    }

                    let delay = self.delay_for_attempt(attempt);
                    warn!(
                        "{}: attempt {}/{} failed: {}, retrying in {:.1}s",
                        label,
                        attempt,
                        self.max_attempts(),
                        error,
                        delay.as_secs_f64()
                    );
                    sleeper.sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}
