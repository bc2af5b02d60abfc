use std::time::Duration;

use async_trait::async_trait;
use tax_core::{BracketProvider, ProviderError, TaxYearBrackets};
use tracing::debug;
use url::Url;

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`HttpBracketProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpProviderConfig {
    /// Base address of the service, e.g. `http://localhost:5001`.
    pub base_url: Url,
    /// Client-level timeout applied to every request.
    pub timeout_secs: u64,
}

impl HttpProviderConfig {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Parses `base_url`, reporting an invalid address as a configuration error.
    pub fn parse(base_url: &str) -> Result<Self, ProviderError> {
        let url = Url::parse(base_url).map_err(|e| {
            ProviderError::Configuration(format!("invalid base url '{base_url}': {e}"))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::Configuration(format!(
                "unsupported scheme '{}' in base url '{base_url}'",
                url.scheme()
            )));
        }
        Ok(Self::new(url))
    }

    pub fn with_timeout_secs(
        mut self,
        timeout_secs: u64,
    ) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

/// Fetches bracket sets over HTTP with `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpBracketProvider {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBracketProvider {
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("failed to build HTTP client: {e}"))
            })?;

        let base_url = config.base_url.as_str().trim_end_matches('/').to_string();
        Ok(Self { client, base_url })
    }

    /// Full request URL for `year`.
    pub fn year_url(
        &self,
        year: i32,
    ) -> String {
        format!("{}/tax-calculator/tax-year/{year}", self.base_url)
    }
}

#[async_trait]
impl BracketProvider for HttpBracketProvider {
    fn name(&self) -> &str {
        "http"
    }

    async fn fetch_brackets(&self, year: i32) -> Result<TaxYearBrackets, ProviderError> {
        let url = self.year_url(year);
        debug!(%url, "requesting tax brackets");

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::Transport(format!("GET {url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<TaxYearBrackets>().await.map_err(|e| {
            if e.is_decode() {
                ProviderError::Decode(format!("response from {url}: {e}"))
            } else {
                ProviderError::Transport(format!("reading body of {url}: {e}"))
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn provider(base: &str) -> HttpBracketProvider {
        HttpBracketProvider::new(HttpProviderConfig::parse(base).unwrap()).unwrap()
    }

    #[test]
    fn year_url_appends_resource_path() {
        assert_eq!(
            provider("http://localhost:5001").year_url(2022),
            "http://localhost:5001/tax-calculator/tax-year/2022"
        );
    }

    #[test]
    fn year_url_tolerates_trailing_slash_and_prefix() {
        assert_eq!(
            provider("https://api.example.test/v1/").year_url(2019),
            "https://api.example.test/v1/tax-calculator/tax-year/2019"
        );
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = HttpProviderConfig::parse("not a url").unwrap_err();

        assert!(matches!(err, ProviderError::Configuration(msg) if msg.contains("not a url")));
    }

    #[test]
    fn parse_rejects_non_http_scheme() {
        let err = HttpProviderConfig::parse("ftp://example.test").unwrap_err();

        assert!(matches!(err, ProviderError::Configuration(msg) if msg.contains("ftp")));
    }

    #[test]
    fn config_defaults_to_thirty_second_timeout() {
        let config = HttpProviderConfig::parse("http://localhost:5001").unwrap();

        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.with_timeout_secs(5).timeout_secs, 5);
    }
}
