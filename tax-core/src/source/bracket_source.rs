//! Bracket retrieval with bounded retry.
//!
//! [`BracketSource`] drives a [`BracketProvider`] through the attempt
//! sequence below. Each attempt is one suspending provider call.
//!
//! | State          | On success  | On retryable failure                         |
//! |----------------|-------------|----------------------------------------------|
//! | `Attempting(n)`| `Succeeded` | `Attempting(n + 1)` while `n < max_retries`  |
//! | `Attempting(n)`| `Succeeded` | `Failed` once `n == max_retries`             |
//!
//! With the default policy that is four attempts in total, re-issued
//! immediately. Failures that cannot change between attempts (an
//! undecodable body, a misconfigured provider) end the sequence at once.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use super::provider::{BracketProvider, ProviderError};
use crate::models::TaxYearBrackets;

/// Errors surfaced by [`BracketSource::fetch`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BracketSourceError {
    /// Every attempt failed; carries the error from the final attempt.
    #[error("tax year {year}: retrieval failed after {attempts} attempts: {source}")]
    RetrievalExhausted {
        year: i32,
        attempts: u32,
        source: ProviderError,
    },

    /// The provider answered but the body was not a bracket container.
    #[error("tax year {year}: malformed bracket data: {source}")]
    Malformed { year: i32, source: ProviderError },

    /// The provider refused the request in a way retrying cannot fix.
    #[error("tax year {year}: provider rejected the request: {source}")]
    Rejected { year: i32, source: ProviderError },
}

impl BracketSourceError {
    /// The underlying provider error of the last attempt.
    pub fn provider_error(&self) -> &ProviderError {
        match self {
            Self::RetrievalExhausted { source, .. }
            | Self::Malformed { source, .. }
            | Self::Rejected { source, .. } => source,
        }
    }
}

/// How many times to re-issue a failed request, and how long to wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts made after the first one fails.
    pub max_retries: u32,
    /// Delay before the first retry; doubles for each later retry.
    /// `Duration::ZERO` re-issues immediately.
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Retries without any delay between attempts.
    pub fn immediate(max_retries: u32) -> Self {
        Self {
            max_retries,
            base_delay: Duration::ZERO,
        }
    }

    /// Retries with exponential backoff: `base_delay`, `2 × base_delay`, ...
    pub fn with_backoff(
        max_retries: u32,
        base_delay: Duration,
    ) -> Self {
        Self {
            max_retries,
            base_delay,
        }
    }

    /// Total number of provider calls before giving up.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry number `retry` (1-based).
    pub fn delay_before_retry(
        &self,
        retry: u32,
    ) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::immediate(Self::DEFAULT_MAX_RETRIES)
    }
}

/// Retrieves bracket sets for a tax year, retrying failed attempts.
#[derive(Debug, Clone)]
pub struct BracketSource<P> {
    provider: P,
    policy: RetryPolicy,
}

impl<P: BracketProvider> BracketSource<P> {
    /// Creates a source with the default policy (3 immediate retries).
    pub fn new(provider: P) -> Self {
        Self::with_policy(provider, RetryPolicy::default())
    }

    pub fn with_policy(
        provider: P,
        policy: RetryPolicy,
    ) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Fetches the brackets for `year`.
    ///
    /// # Errors
    ///
    /// * [`BracketSourceError::RetrievalExhausted`] after
    ///   [`RetryPolicy::max_attempts`] failed attempts.
    /// * [`BracketSourceError::Malformed`] or [`BracketSourceError::Rejected`]
    ///   immediately for failures that retrying cannot fix.
    pub async fn fetch(
        &self,
        year: i32,
    ) -> Result<TaxYearBrackets, BracketSourceError> {
        info!(year, provider = self.provider.name(), "fetching tax brackets");

        let mut retries = 0;
        loop {
            let err = match self.provider.fetch_brackets(year).await {
                Ok(brackets) => {
                    debug!(
                        year,
                        attempt = retries + 1,
                        brackets = brackets.tax_brackets.len(),
                        "tax brackets retrieved"
                    );
                    return Ok(brackets);
                }
                Err(err) => err,
            };

            if !err.is_retryable() {
                error!(year, error = %err, "tax bracket retrieval cannot be retried");
                return Err(match err {
                    ProviderError::Decode(_) => BracketSourceError::Malformed { year, source: err },
                    _ => BracketSourceError::Rejected { year, source: err },
                });
            }

            if retries >= self.policy.max_retries {
                error!(
                    year,
                    attempts = retries + 1,
                    error = %err,
                    "max retries reached while fetching tax brackets"
                );
                return Err(BracketSourceError::RetrievalExhausted {
                    year,
                    attempts: retries + 1,
                    source: err,
                });
            }

            retries += 1;
            let delay = self.policy.delay_before_retry(retries);
            warn!(
                year,
                attempt = retries,
                max_attempts = self.policy.max_attempts(),
                error = %err,
                "tax bracket retrieval failed, retrying in {delay:?}"
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
    }
}
