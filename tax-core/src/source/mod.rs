//! Bracket retrieval: the provider seam, backend registry and retrying source.

pub mod bracket_source;
pub mod factory;
pub mod provider;

pub use bracket_source::{BracketSource, BracketSourceError, RetryPolicy};
pub use factory::{DEFAULT_LOCATION, ProviderFactory, ProviderRegistry, SourceConfig};
pub use provider::{BracketProvider, ProviderError};
