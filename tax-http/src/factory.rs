use async_trait::async_trait;
use tax_core::source::{BracketProvider, ProviderError, ProviderFactory, SourceConfig};

use crate::provider::{HttpBracketProvider, HttpProviderConfig};

/// [`ProviderFactory`] for the HTTP backend.
///
/// Register this with a [`tax_core::ProviderRegistry`] to make the `"http"`
/// backend available:
///
/// ```rust
/// use tax_core::ProviderRegistry;
/// use tax_http::HttpProviderFactory;
///
/// let mut registry = ProviderRegistry::new();
/// registry.register(Box::new(HttpProviderFactory::default()));
/// assert_eq!(registry.available_backends(), vec!["http"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpProviderFactory {
    timeout_secs: u64,
}

impl HttpProviderFactory {
    pub fn with_timeout_secs(timeout_secs: u64) -> Self {
        Self { timeout_secs }
    }
}

impl Default for HttpProviderFactory {
    fn default() -> Self {
        Self::with_timeout_secs(crate::DEFAULT_TIMEOUT_SECS)
    }
}

#[async_trait]
impl ProviderFactory for HttpProviderFactory {
    fn backend_name(&self) -> &'static str {
        "http"
    }

    /// `config.location` is the service base address.
    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketProvider>, ProviderError> {
        let http_config =
            HttpProviderConfig::parse(&config.location)?.with_timeout_secs(self.timeout_secs);
        Ok(Box::new(HttpBracketProvider::new(http_config)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_builds_provider_for_valid_location() {
        let config = SourceConfig {
            backend: "http".into(),
            location: "http://localhost:5001".into(),
        };

        let provider = HttpProviderFactory::default().create(&config).await.unwrap();

        assert_eq!(provider.name(), "http");
    }

    #[tokio::test]
    async fn create_rejects_invalid_location() {
        let config = SourceConfig {
            backend: "http".into(),
            location: "::nope::".into(),
        };

        let result = HttpProviderFactory::default().create(&config).await;

        assert!(matches!(result, Err(ProviderError::Configuration(_))));
    }
}
