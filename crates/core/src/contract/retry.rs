//! Bounded retry for contract creation.
//!
//! Contract numbers are generated from a sequence on the backend; two
//! concurrent creations can collide on the unique key. Such collisions are
//! retried a few times with a fixed pause. Every other failure is returned
//! to the caller immediately.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

/// Error fragments the backend uses for a contract-number collision.
const DUPLICATE_MARKERS: [&str; 4] = [
    "duplicate",
    "unique",
    "уникаль",
    "contracts_contract_number_key",
];

/// Returns true if an error message reports a duplicate contract number.
#[must_use]
pub fn is_duplicate_contract_number(message: &str) -> bool {
    let message = message.to_lowercase();
    DUPLICATE_MARKERS.iter().any(|marker| message.contains(marker))
}

/// Retry policy: attempt budget, fixed backoff, and which errors qualify.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
    retryable: fn(&str) -> bool,
}

impl RetryPolicy {
    /// Attempts made by default.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
    /// Pause between attempts by default.
    pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(400);

    /// Policy for contract creation: 3 attempts, 400ms apart, duplicates only.
    #[must_use]
    pub const fn duplicate_contract_number() -> Self {
        Self::new(Self::DEFAULT_MAX_ATTEMPTS, Self::DEFAULT_BACKOFF)
    }

    /// Duplicate-number policy with a custom budget.
    ///
    /// `max_attempts` counts the first try; zero is treated as one.
    #[must_use]
    pub const fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts,
            backoff,
            retryable: is_duplicate_contract_number,
        }
    }

    /// Replaces the retryable-error predicate.
    #[must_use]
    pub const fn with_predicate(mut self, retryable: fn(&str) -> bool) -> Self {
        self.retryable = retryable;
        self
    }

    /// Total attempts, including the first.
    #[must_use]
    pub const fn max_attempts(&self) -> u32 {
        if self.max_attempts == 0 { 1 } else { self.max_attempts }
    }

    /// Pause between attempts.
    #[must_use]
    pub const fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Returns true if an error with this message should be retried.
    #[must_use]
    pub fn is_retryable(&self, message: &str) -> bool {
        (self.retryable)(message)
    }

    /// Runs `f` until it succeeds, fails with a non-retryable error, or the
    /// attempt budget is spent. The last error is returned.
    pub async fn execute<F, Fut, T, E>(&self, mut f: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let max_attempts = self.max_attempts();
        let mut attempt = 1;

        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < max_attempts && self.is_retryable(&e.to_string()) => {
                    tracing::debug!(
                        attempt,
                        max_attempts,
                        error = %e,
                        "Duplicate contract number, retrying after {:?}",
                        self.backoff
                    );
                    tokio::time::sleep(self.backoff).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::duplicate_contract_number()
    }
}
