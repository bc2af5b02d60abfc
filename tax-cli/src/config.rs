//! Calculator configuration.
//!
//! Settings are layered, later layers winning:
//! built-in defaults, an optional TOML file, the environment, then
//! command-line flags.
//!
//! ```toml
//! backend = "http"
//! location = "http://localhost:5001"
//! timeout_secs = 30
//! max_retries = 3
//! retry_delay_ms = 0
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tax_core::source::DEFAULT_LOCATION;
use tax_core::{RetryPolicy, SourceConfig};
use thiserror::Error;
use url::Url;

/// Overrides `location` when set and non-empty.
pub const BASE_URL_ENV: &str = "TAX_CALCULATOR_BASE_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    pub backend: String,
    /// Base URL for `http`, file path for `csv`.
    pub location: String,
    pub timeout_secs: u64,
    pub max_retries: u32,
    /// Zero retries immediately; otherwise the first retry waits this long
    /// and each later one doubles it.
    pub retry_delay_ms: u64,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            location: DEFAULT_LOCATION.to_string(),
            timeout_secs: tax_http::DEFAULT_TIMEOUT_SECS,
            max_retries: RetryPolicy::DEFAULT_MAX_RETRIES,
            retry_delay_ms: 0,
        }
    }
}

/// Values given on the command line; `None` leaves the lower layer alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub backend: Option<String>,
    pub location: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
}

impl CalculatorConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Applies environment overrides, reading variables through `lookup`.
    pub fn with_env<F>(
        mut self,
        lookup: F,
    ) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            self.location = url.trim().to_string();
        }
        self
    }

    pub fn with_overrides(
        mut self,
        overrides: ConfigOverrides,
    ) -> Self {
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(location) = overrides.location {
            self.location = location;
        }
        if let Some(timeout_secs) = overrides.timeout_secs {
            self.timeout_secs = timeout_secs;
        }
        if let Some(max_retries) = overrides.max_retries {
            self.max_retries = max_retries;
        }
        if let Some(retry_delay_ms) = overrides.retry_delay_ms {
            self.retry_delay_ms = retry_delay_ms;
        }
        self
    }

    /// Checks the base URL when the HTTP backend is selected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend != "http" {
            return Ok(());
        }

        let invalid = |reason: String| ConfigError::InvalidUrl {
            url: self.location.clone(),
            reason,
        };
        let url = Url::parse(&self.location).map_err(|e| invalid(e.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(invalid(format!("unsupported scheme '{other}'"))),
        }
    }

    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            backend: self.backend.clone(),
            location: self.location.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        if self.retry_delay_ms == 0 {
            RetryPolicy::immediate(self.max_retries)
        } else {
            RetryPolicy::with_backoff(self.max_retries, Duration::from_millis(self.retry_delay_ms))
        }
    }
}
