use std::path::Path;

use tax_core::{
    BracketProvider, BracketSource, BracketSourceError, ProviderError, ProviderRegistry,
    calculate_tax,
};
use tax_data::CsvProviderFactory;
use tax_http::HttpProviderFactory;
use tracing::{debug, error, info};

use crate::config::{CalculatorConfig, ConfigError, ConfigOverrides};
use crate::input::CalculationRequest;
use crate::state::CalculationState;

/// Registry with every backend this binary ships.
pub fn build_registry(timeout_secs: u64) -> ProviderRegistry {
    ProviderRegistry::new()
        .with(HttpProviderFactory::with_timeout_secs(timeout_secs))
        .with(CsvProviderFactory)
}

/// Defaults, then the TOML file at `path`, then the environment (read
/// through `lookup`), then `overrides`.
pub fn resolve_config<F>(
    path: Option<&Path>,
    overrides: ConfigOverrides,
    lookup: F,
) -> Result<CalculatorConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let base = match path {
        Some(path) => CalculatorConfig::load(path)?,
        None => CalculatorConfig::default(),
    };
    let config = base.with_env(lookup).with_overrides(overrides);
    config.validate()?;

    debug!(?config, "resolved configuration");
    Ok(config)
}

/// Creates the configured provider and wraps it in a retrying source.
pub async fn build_source(
    config: &CalculatorConfig
) -> Result<BracketSource<Box<dyn BracketProvider>>, ProviderError> {
    let registry = build_registry(config.timeout_secs);
    let provider = registry.create(&config.source_config()).await?;
    Ok(BracketSource::with_policy(provider, config.retry_policy()))
}

/// Fetches brackets for the request's year and computes the breakdown,
/// recording each step in `state`.
pub async fn run_calculation<P: BracketProvider>(
    source: &BracketSource<P>,
    request: &CalculationRequest,
    state: &mut CalculationState,
) -> Result<(), BracketSourceError> {
    state.begin();

    match source.fetch(request.year()).await {
        Ok(brackets) => {
            let breakdown = calculate_tax(&brackets.tax_brackets, request.income());
            info!(
                year = request.year(),
                total_tax = %breakdown.total_tax,
                "calculation complete"
            );
            state.succeed(breakdown);
            Ok(())
        }
        Err(err) => {
            error!(year = request.year(), error = %err, "could not retrieve tax brackets");
            state.fail();
            Err(err)
        }
    }
}
