use std::collections::BTreeMap;
use std::path::Path;

use async_trait::async_trait;
use tax_core::TaxYearBrackets;
use tax_core::source::{BracketProvider, ProviderError, ProviderFactory, SourceConfig};
use tracing::debug;

use crate::loader::{BracketLoaderError, BracketRecord, CsvBracketLoader};

/// Serves bracket sets held in memory, one per tax year.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StaticBracketProvider {
    years: BTreeMap<i32, TaxYearBrackets>,
}

impl StaticBracketProvider {
    pub fn new(years: BTreeMap<i32, TaxYearBrackets>) -> Self {
        Self { years }
    }

    pub fn from_records(records: &[BracketRecord]) -> Self {
        Self::new(CsvBracketLoader::group(records))
    }

    pub fn from_path(path: &Path) -> Result<Self, BracketLoaderError> {
        CsvBracketLoader::load_file(path).map(Self::new)
    }

    /// Replace the brackets for `year`.
    pub fn insert(
        &mut self,
        year: i32,
        brackets: TaxYearBrackets,
    ) {
        self.years.insert(year, brackets);
    }

    /// Years with published brackets, ascending.
    pub fn years(&self) -> Vec<i32> {
        self.years.keys().copied().collect()
    }
}

#[async_trait]
impl BracketProvider for StaticBracketProvider {
    fn name(&self) -> &str {
        "static"
    }

    async fn fetch_brackets(&self, year: i32) -> Result<TaxYearBrackets, ProviderError> {
        self.years
            .get(&year)
            .cloned()
            .ok_or(ProviderError::NotFound(year))
    }
}

/// [`ProviderFactory`] for the offline CSV backend.
///
/// `location` is the path of a `tax_year,min,max,rate` file. The whole file
/// is read once at creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CsvProviderFactory;

#[async_trait]
impl ProviderFactory for CsvProviderFactory {
    fn backend_name(&self) -> &'static str {
        "csv"
    }

    async fn create(
        &self,
        config: &SourceConfig,
    ) -> Result<Box<dyn BracketProvider>, ProviderError> {
        let bytes = tokio::fs::read(&config.location).await.map_err(|e| {
            ProviderError::Configuration(format!("cannot read '{}': {e}", config.location))
        })?;
        let records = CsvBracketLoader::parse(bytes.as_slice()).map_err(|e| {
            ProviderError::Configuration(format!("cannot load '{}': {e}", config.location))
        })?;

        let provider = StaticBracketProvider::from_records(&records);
        debug!(
            location = %config.location,
            years = ?provider.years(),
            "Loaded bracket file"
        );
        Ok(Box::new(provider))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::TaxBracket;

    use super::*;

    fn provider_2022() -> StaticBracketProvider {
        let mut provider = StaticBracketProvider::default();
        provider.insert(
            2022,
            TaxYearBrackets::new(vec![
                TaxBracket::new(dec!(0), Some(dec!(50197)), dec!(0.15)),
                TaxBracket::new(dec!(50197), None, dec!(0.205)),
            ]),
        );
        provider
    }

    #[tokio::test]
    async fn static_provider_serves_known_year() {
        let brackets = provider_2022().fetch_brackets(2022).await.unwrap();

        assert_eq!(brackets.tax_brackets.len(), 2);
    }

    #[tokio::test]
    async fn static_provider_unknown_year_is_not_found() {
        let result = provider_2022().fetch_brackets(2018).await;

        assert_eq!(result, Err(ProviderError::NotFound(2018)));
    }

    #[test]
    fn from_records_groups_years() {
        let csv = "tax_year,min,max,rate\n2020,0,,0.15\n2019,0,,0.15\n";
        let records = CsvBracketLoader::parse(csv.as_bytes()).unwrap();

        let provider = StaticBracketProvider::from_records(&records);

        assert_eq!(provider.years(), vec![2019, 2020]);
    }

    #[test]
    fn from_path_reports_missing_file() {
        let result = StaticBracketProvider::from_path(Path::new("does/not/exist.csv"));

        assert!(matches!(result, Err(BracketLoaderError::Io { .. })));
    }

    #[tokio::test]
    async fn factory_rejects_missing_file() {
        let config = SourceConfig {
            backend: "csv".into(),
            location: "does/not/exist.csv".into(),
        };

        let result = CsvProviderFactory.create(&config).await;

        let Err(ProviderError::Configuration(msg)) = result else {
            panic!("expected Configuration error");
        };
        assert!(msg.contains("does/not/exist.csv"), "got: {msg}");
    }
}
