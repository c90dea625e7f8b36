//! Retry with exponential backoff
//!
//! Timetable requests are retried a small, configurable number of times when
//! they fail with a transient error (connection refused, timeout, 5xx).
//!
//! # Example
//!
//! ```rust,ignore
//! use infrastructure::retry::{RetryConfig, with_retry};
//!
//! let outcome = with_retry(&RetryConfig::default(), || client.departures(&code)).await;
//! ```

use std::{future::Future, time::Duration};

use integration_amt::AmtError;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing::{debug, warn};

/// Retry policy for calls to external services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Number of retries after the first attempt (0 disables retrying)
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Delay before the first retry in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Upper bound for any single delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Growth factor of the delay between consecutive retries
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,

    /// Random spread applied to each delay, as a fraction (0.0 to 1.0)
    #[serde(default = "default_jitter_factor")]
    pub jitter_factor: f64,
}

const fn default_max_retries() -> u32 {
    1
}

const fn default_initial_delay_ms() -> u64 {
    250
}

const fn default_max_delay_ms() -> u64 {
    2_000
}

const fn default_multiplier() -> f64 {
    2.0
}

const fn default_jitter_factor() -> f64 {
    0.1
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            multiplier: default_multiplier(),
            jitter_factor: default_jitter_factor(),
        }
    }
}

impl RetryConfig {
    /// A policy that makes exactly one attempt
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    /// Deterministic policy with short delays, for tests
    #[must_use]
    pub const fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            initial_delay_ms: 1,
            max_delay_ms: 1,
            multiplier: 1.0,
            jitter_factor: 0.0,
        }
    }

    /// Validate the policy
    pub fn validate(&self) -> Result<(), String> {
        if self.multiplier < 1.0 {
            return Err("multiplier must be at least 1.0".to_string());
        }
        if !(0.0..=1.0).contains(&self.jitter_factor) {
            return Err("jitter_factor must be between 0.0 and 1.0".to_string());
        }
        if self.initial_delay_ms > self.max_delay_ms {
            return Err("initial_delay_ms must not exceed max_delay_ms".to_string());
        }
        Ok(())
    }

    /// Delay before retry number `retry` (0-indexed)
    ///
    /// `initial * multiplier^retry`, capped at `max_delay_ms`, then spread by
    /// up to `jitter_factor` in either direction.
    #[must_use]
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_wrap,
        clippy::cast_sign_loss,
        clippy::cast_possible_truncation
    )]
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let exponent = retry.min(30) as i32;
        let base = (self.initial_delay_ms as f64) * self.multiplier.powi(exponent);
        let capped = base.min(self.max_delay_ms as f64);

        let spread = capped * self.jitter_factor;
        let delay = if spread > 0.0 {
            capped + rand::rng().random_range(-spread..=spread)
        } else {
            capped
        };

        Duration::from_millis(delay.max(0.0) as u64)
    }
}

/// Errors that know whether repeating the call may help
pub trait Retryable {
    /// Returns true if this error is transient
    fn is_retryable(&self) -> bool;
}

impl Retryable for AmtError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

impl Retryable for application::ApplicationError {
    fn is_retryable(&self) -> bool {
        Self::is_retryable(self)
    }
}

/// Final result of a retried operation
#[derive(Debug)]
pub struct RetryOutcome<T, E> {
    /// Result of the last attempt
    pub result: Result<T, E>,
    /// Attempts made, including the first one
    pub attempts: u32,
    /// Wall time spent, including delays
    pub elapsed: Duration,
}

impl<T, E> RetryOutcome<T, E> {
    /// Discard the metadata
    pub fn into_result(self) -> Result<T, E> {
        self.result
    }
}

/// Run `operation`, retrying transient failures according to `config`
#[allow(clippy::cast_possible_truncation)]
pub async fn with_retry<F, Fut, T, E>(config: &RetryConfig, mut operation: F) -> RetryOutcome<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let started = Instant::now();
    let mut attempts = 0u32;

    let result = loop {
        attempts += 1;
        let error = match operation().await {
            Ok(value) => break Ok(value),
            Err(error) => error,
        };

        let retries_done = attempts - 1;
        if !error.is_retryable() || retries_done >= config.max_retries {
            if error.is_retryable() {
                warn!(attempts, error = %error, "Giving up after retries");
            }
            break Err(error);
        }

        let delay = config.delay_for_retry(retries_done);
        warn!(
            attempt = attempts,
            delay_ms = delay.as_millis() as u64,
            error = %error,
            "Transient failure, retrying"
        );
        tokio::time::sleep(delay).await;
    };

    if attempts > 1 && result.is_ok() {
        debug!(attempts, "Succeeded after retry");
    }

    RetryOutcome {
        result,
        attempts,
        elapsed: started.elapsed(),
    }
}
