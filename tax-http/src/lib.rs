//! HTTP bracket provider.
//!
//! Retrieves bracket sets from the tax calculator service at
//! `GET {base_url}/tax-calculator/tax-year/{year}`. Each call is a single
//! request; retry policy lives in [`tax_core::BracketSource`].

mod factory;
mod provider;

pub use factory::HttpProviderFactory;
pub use provider::{DEFAULT_TIMEOUT_SECS, HttpBracketProvider, HttpProviderConfig};
