// src/retry.rs
use crate::errors::AppError;
use rand::Rng;
use std::time::Duration;
use tracing::warn;

/// Bounded, synchronous retry with exponential backoff.
///
/// Every outbound client owns one of these, so the policy can be
/// tuned (or zeroed in tests) without touching the call sites.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub min_backoff: Duration,
    pub max_backoff: Duration,
    /// Upper bound of the random delay added to each backoff.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            min_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(10),
            jitter: Duration::ZERO,
        }
    }
}

impl RetryPolicy {
    /// A policy that never sleeps.
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            min_backoff: Duration::ZERO,
            max_backoff: Duration::ZERO,
            jitter: Duration::ZERO,
        }
    }

    /// Delay before the next attempt, after `attempt` (1-based) failed.
    /// Doubles from `min_backoff`, capped at `max_backoff`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
        let base = self.min_backoff.saturating_mul(factor);
        std::cmp::min(base, self.max_backoff)
    }

    /// Runs `op` until it succeeds, fails with a non-transient error,
    /// or `max_attempts` is exhausted. The last error is returned.
    pub fn run<T, F>(&self, label: &str, mut op: F) -> Result<T, AppError>
    where
        F: FnMut() -> Result<T, AppError>,
    {
        let attempts = self.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match op() {
                Ok(value) => return Ok(value),
                Err(e) if !e.is_transient() || attempt >= attempts => return Err(e),
                Err(e) => {
                    let delay = self.backoff(attempt) + self.jitter_delay();
                    warn!(
                        call = label,
                        attempt,
                        ?delay,
                        "⚠️ attempt failed, retrying: {e}"
                    );
                    if !delay.is_zero() {
                        std::thread::sleep(delay);
                    }
                    attempt += 1;
                }
            }
        }
    }

    fn jitter_delay(&self) -> Duration {
        let max_ms = self.jitter.as_millis() as u64;
        if max_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::thread_rng().gen_range(0..=max_ms))
    }
}
