//! Bounded retry with exponential backoff.
//!
//! A request runs through an explicit state machine:
//!
//! ```text
//! Attempting(n) --ok--> done
//! Attempting(n) --err, n < max--> Waiting(n) --sleep--> Attempting(n + 1)
//! Attempting(n) --err, n = max--> Exhausted(n)
//! ```
//!
//! The wait after failed attempt `n` is `base_delay * 2^n`, so with the default one
//! second base the schedule is 2s, 4s, 8s, ...

use std::future::Future;
use std::time::Duration;

/// Retry parameters for one logical request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

/// Position of a request in the retry state machine.
///
/// `Waiting` and `Exhausted` carry the error of the attempt that just failed.
#[derive(Debug, PartialEq, Eq)]
pub enum RetryState<E> {
    Attempting(u32),
    Waiting { attempt: u32, delay: Duration, error: E },
    Exhausted { attempts: u32, error: E },
}

/// Returned when every attempt failed.
#[derive(Debug, PartialEq, Eq)]
pub struct RetriesExhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

impl RetryPolicy {
    /// Creates a policy. At least one attempt is always made.
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Backoff after failed attempt `attempt` (1-based): `base_delay * 2^attempt`.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.checked_pow(attempt).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    pub fn start<E>(&self) -> RetryState<E> {
        RetryState::Attempting(1)
    }

    /// Transition taken when attempt `attempt` fails with `error`.
    pub fn on_failure<E>(&self, attempt: u32, error: E) -> RetryState<E> {
        if attempt >= self.max_attempts {
            RetryState::Exhausted {
                attempts: attempt,
                error,
            }
        } else {
            RetryState::Waiting {
                attempt,
                delay: self.delay_for(attempt),
                error,
            }
        }
    }

    /// Drives `op` through the state machine until it succeeds or attempts run out.
    ///
    /// `op` receives the 1-based attempt number. `label` is used only for logging.
    pub async fn run<T, E, F, Fut>(&self, label: &str, mut op: F) -> Result<T, RetriesExhausted<E>>
    where
        E: std::fmt::Display,
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let mut state = self.start();

        loop {
            state = match state {
                RetryState::Attempting(attempt) => {
                    tracing::info!("Attempt {}: Making request to {}", attempt, label);
                    match op(attempt).await {
                        Ok(value) => return Ok(value),
                        Err(error) => {
                            tracing::warn!("Attempt {} failed: {}", attempt, error);
                            self.on_failure(attempt, error)
                        }
                    }
                }
                RetryState::Waiting { attempt, delay, .. } => {
                    tracing::info!("Waiting {}ms before retry...", delay.as_millis());
                    tokio::time::sleep(delay).await;
                    RetryState::Attempting(attempt + 1)
                }
                RetryState::Exhausted { attempts, error } => {
                    return Err(RetriesExhausted {
                        attempts,
                        last_error: error,
                    });
                }
            };
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(
            triage_core::constants::DEFAULT_RETRY_ATTEMPTS,
            Duration::from_millis(triage_core::constants::DEFAULT_RETRY_BASE_DELAY_MS),
        )
    }
}
