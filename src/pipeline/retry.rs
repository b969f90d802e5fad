use rand::Rng;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

use crate::config::Config;
use crate::errors::AgentError;

/// Exponent cap; past this the delay is pinned at `max_delay` anyway.
const MAX_EXPONENT: u32 = 10;

/// Exponential backoff for transient collaborator failures.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
    pub max_delay: Duration,
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1), Duration::from_secs(30))
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration, max_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay,
            jitter: true,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.retry_max_attempts(),
            config.retry_base_delay(),
            config.retry_max_delay(),
        )
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before retry number `attempt` (0-based): `base * 2^attempt`,
    /// ±30% jitter, never above `max_delay`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.min(MAX_EXPONENT);
        let delay = self
            .base_delay
            .saturating_mul(2_u32.saturating_pow(exponent))
            .min(self.max_delay);

        if !self.jitter {
            return delay;
        }

        let jitter_factor = rand::thread_rng().gen_range(0.7..1.3);
        delay.mul_f64(jitter_factor).min(self.max_delay)
    }
}

/// Runs `f` until it succeeds, fails with a non-retryable error, or the
/// policy runs out of attempts. The last error is returned unchanged.
pub async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    operation: &str,
    mut f: F,
) -> Result<T, AgentError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AgentError>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt + 1 < policy.max_attempts => {
                let delay = policy.delay_for(attempt);
                warn!(
                    operation,
                    attempt = attempt + 1,
                    delay_ms = delay.as_millis() as u64,
                    category = %e.category,
                    error = %e.message,
                    "transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
