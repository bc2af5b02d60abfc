use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use super::provider::{BracketProvider, ProviderError};

/// Base address of the bracket service when nothing else is configured.
pub const DEFAULT_LOCATION: &str = "http://localhost:5001";

/// Backend-agnostic provider configuration.
///
/// `backend` must match the [`ProviderFactory::backend_name`] of a
/// registered factory. `location` is passed through to that factory
/// unchanged; its meaning is entirely backend-specific.
///
/// | backend | location examples                     |
/// |---------|---------------------------------------|
/// | `http`  | `http://localhost:5001`               |
/// | `csv`   | `data/tax_brackets.csv`               |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceConfig {
    /// Lowercase identifier matching a registered factory (e.g. `"http"`).
    pub backend: String,
    /// Opaque value forwarded to the factory's `create` method.
    pub location: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            backend: "http".to_string(),
            location: DEFAULT_LOCATION.to_string(),
        }
    }
}

/// One implementation per provider backend. Each backend crate exports a
/// unit struct implementing this trait, registered with a
/// [`ProviderRegistry`] at startup.
#[async_trait]
pub trait ProviderFactory: Send + Sync {
    /// Unique, lowercase identifier for this backend.
    fn backend_name(&self) -> &'static str;

    /// Build a ready-to-use provider. Implementations may read files or
    /// construct HTTP clients here.
    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketProvider>, ProviderError>;
}

/// Bracket backends available to the binary, looked up by name.
///
/// Names are matched case-insensitively and ignoring surrounding
/// whitespace, since they usually come from a flag or a config file.
pub struct ProviderRegistry {
    factories: BTreeMap<&'static str, Box<dyn ProviderFactory>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Builder form of [`ProviderRegistry::register`].
    pub fn with(
        mut self,
        factory: impl ProviderFactory + 'static,
    ) -> Self {
        self.register(Box::new(factory));
        self
    }

    /// Adds a backend. A later factory with the same name wins.
    pub fn register(
        &mut self,
        factory: Box<dyn ProviderFactory>,
    ) {
        self.factories.insert(factory.backend_name(), factory);
    }

    pub fn supports(&self, backend: &str) -> bool {
        self.lookup(backend).is_some()
    }

    /// Registered backend names in alphabetical order.
    pub fn available_backends(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    fn lookup(&self, backend: &str) -> Option<&dyn ProviderFactory> {
        let wanted = backend.trim().to_ascii_lowercase();
        self.factories.get(wanted.as_str()).map(|f| &**f)
    }

    /// Builds a provider for `config.backend`.
    ///
    /// # Errors
    /// * [`ProviderError::Configuration`] naming the requested backend and
    ///   the registered ones when nothing matches.
    /// * Whatever the matching factory returns.
    pub async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketProvider>, ProviderError> {
        let Some(factory) = self.lookup(&config.backend) else {
            return Err(ProviderError::Configuration(format!(
                "unknown bracket backend '{}' (expected one of: {})",
                config.backend,
                self.available_backends().join(", ")
            )));
        };

        debug!(
            backend = factory.backend_name(),
            location = %config.location,
            "creating bracket provider"
        );
        factory.create(config).await
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
