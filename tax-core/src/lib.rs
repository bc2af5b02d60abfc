pub mod calculations;
pub mod models;
pub mod source;

pub use calculations::{TaxCalculator, calculate_tax};
pub use models::*;
pub use source::{
    BracketProvider, BracketSource, BracketSourceError, ProviderError, ProviderFactory,
    ProviderRegistry, RetryPolicy, SourceConfig,
};
