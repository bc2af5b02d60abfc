//! Offline bracket data: CSV loading, validation, and an in-memory provider.

pub mod loader;
pub mod provider;

pub use loader::{BracketLoaderError, BracketRecord, BracketViolation, CsvBracketLoader};
pub use provider::{CsvProviderFactory, StaticBracketProvider};
