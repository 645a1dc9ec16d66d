use std::collections::hash_map::RandomState;
use std::future::Future;
use std::hash::BuildHasher;
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Exponential backoff settings for startup connections.
///
/// Request paths never retry; this is only used while the service boots.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    /// Scale each delay by a random factor in `[0.5, 1.0)`.
    pub jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub fn without_jitter(mut self) -> Self {
        self.jitter = false;
        self
    }

    /// Delay before retry number `attempt` (1-based), before jitter.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.powi(attempt.saturating_sub(1) as i32);
        self.initial_delay.mul_f64(factor).min(self.max_delay)
    }
}

fn jittered(delay: Duration) -> Duration {
    let seed = RandomState::new().hash_one(SystemTime::now());
    delay.mul_f64(0.5 + (seed % 50) as f64 / 100.0)
}

/// Runs `operation` until it succeeds or `policy.max_retries` retries are spent.
///
/// ```ignore
/// let client = retry_with_backoff(RetryPolicy::default(), || connect(&config)).await?;
/// ```
pub async fn retry_with_backoff<F, Fut, T, E>(policy: RetryPolicy, mut operation: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempt = 0;

    loop {
        match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(attempt, "Operation succeeded after retrying");
                }
                return Ok(value);
            }
            Err(e) if attempt >= policy.max_retries => {
                warn!(attempts = attempt + 1, "Giving up: {}", e);
                return Err(e);
            }
            Err(e) => {
                attempt += 1;
                let mut delay = policy.delay_for(attempt);
                if policy.jitter {
                    delay = jittered(delay);
                }
                debug!(
                    attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    "Operation failed: {}. Retrying",
                    e
                );
                tokio::time::sleep(delay).await;
            }
        }
    }
}
