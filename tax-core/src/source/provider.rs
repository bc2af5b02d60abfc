use async_trait::async_trait;
use thiserror::Error;

use crate::models::TaxYearBrackets;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProviderError {
    #[error("No brackets published for tax year {0}")]
    NotFound(i32),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Provider returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Malformed bracket data: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ProviderError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Network failures and non-success statuses are retried. A body that
    /// arrived but could not be decoded, or a provider that is misconfigured,
    /// will fail the same way every time.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Decode(_) | Self::Configuration(_))
    }
}

/// One round trip to a bracket data provider.
///
/// Implementations issue exactly one request per call and never retry on
/// their own; [`crate::source::BracketSource`] owns the retry policy.
#[async_trait]
pub trait BracketProvider: Send + Sync {
    /// Short identifier used in log output (e.g. `"http"`).
    fn name(&self) -> &str;

    async fn fetch_brackets(&self, year: i32) -> Result<TaxYearBrackets, ProviderError>;
}

#[async_trait]
impl<'a, P: BracketProvider + ?Sized> BracketProvider for &'a P {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_brackets(&self, year: i32) -> Result<TaxYearBrackets, ProviderError> {
        (**self).fetch_brackets(year).await
    }
}

#[async_trait]
impl<P: BracketProvider + ?Sized> BracketProvider for Box<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_brackets(&self, year: i32) -> Result<TaxYearBrackets, ProviderError> {
        (**self).fetch_brackets(year).await
    }
}

#[async_trait]
impl<P: BracketProvider + ?Sized> BracketProvider for std::sync::Arc<P> {
    fn name(&self) -> &str {
        (**self).name()
    }

    async fn fetch_brackets(&self, year: i32) -> Result<TaxYearBrackets, ProviderError> {
        (**self).fetch_brackets(year).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_and_status_errors_are_retryable() {
        assert!(ProviderError::Transport("connection refused".into()).is_retryable());
        assert!(
            ProviderError::Status {
                status: 500,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(ProviderError::NotFound(2019).is_retryable());
    }

    #[test]
    fn decode_and_configuration_errors_are_not_retryable() {
        assert!(!ProviderError::Decode("expected value".into()).is_retryable());
        assert!(!ProviderError::Configuration("bad url".into()).is_retryable());
    }

    #[test]
    fn status_error_message_includes_status_and_body() {
        let err = ProviderError::Status {
            status: 503,
            body: "maintenance".into(),
        };

        assert_eq!(
            err.to_string(),
            "Provider returned status 503: maintenance"
        );
    }
}
