use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{ProviderError, TaxBracket, TaxYearBrackets};
use thiserror::Error;

/// Errors that can occur when loading bracket data.
#[derive(Debug, Error)]
pub enum BracketLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("Cannot read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<csv::Error> for BracketLoaderError {
    fn from(err: csv::Error) -> Self {
        BracketLoaderError::CsvParse(err.to_string())
    }
}

/// A bracket set that breaks the shape the calculator assumes.
///
/// The calculator never checks these; they are reported for data files
/// before anything is published.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BracketViolation {
    #[error("bracket set is empty")]
    NoBrackets,

    #[error("bracket starting at {0} has a negative lower bound")]
    NegativeMin(Decimal),

    #[error("more than one bracket starts at {0}")]
    DuplicateMin(Decimal),

    #[error("bracket {min}..{max} is empty or inverted")]
    EmptyBand { min: Decimal, max: Decimal },

    #[error("{0} brackets have no upper bound; at most one may")]
    MultipleOpenBands(usize),

    #[error("open-ended bracket starting at {0} is not the top bracket")]
    OpenBandNotTop(Decimal),
}

/// A single record from a tax brackets CSV file.
///
/// - `tax_year`: the tax year (e.g. 2022)
/// - `min`: inclusive lower bound of the band
/// - `max`: exclusive upper bound (empty for the open-ended top band)
/// - `rate`: marginal rate as a fraction (e.g. 0.205 for 20.5%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BracketRecord {
    pub tax_year: i32,
    pub min: Decimal,
    #[serde(deserialize_with = "empty_as_none")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl BracketRecord {
    pub fn to_bracket(&self) -> TaxBracket {
        TaxBracket::new(self.min, self.max, self.rate)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Reads bracket tables from CSV.
pub struct CsvBracketLoader;

impl CsvBracketLoader {
    /// Parse bracket records from any reader (a file, a byte slice, ...).
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BracketRecord>, BracketLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BracketRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Group records into one bracket set per tax year, keeping file order
    /// within each year.
    pub fn group(records: &[BracketRecord]) -> BTreeMap<i32, TaxYearBrackets> {
        let mut years: BTreeMap<i32, TaxYearBrackets> = BTreeMap::new();
        for record in records {
            years
                .entry(record.tax_year)
                .or_default()
                .tax_brackets
                .push(record.to_bracket());
        }
        years
    }

    /// Open `path`, parse it and group the records by year.
    pub fn load_file(path: &Path) -> Result<BTreeMap<i32, TaxYearBrackets>, BracketLoaderError> {
        let file = File::open(path).map_err(|source| BracketLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let records = Self::parse(file)?;
        Ok(Self::group(&records))
    }

    /// Check a bracket set against the invariants the calculator assumes.
    ///
    /// Returns every violation found; an empty vector means the set is
    /// well-formed.
    pub fn validate(brackets: &TaxYearBrackets) -> Vec<BracketViolation> {
        if brackets.is_empty() {
            return vec![BracketViolation::NoBrackets];
        }

        let mut sorted: Vec<&TaxBracket> = brackets.tax_brackets.iter().collect();
        sorted.sort_by(|a, b| a.min.cmp(&b.min));

        let mut violations = Vec::new();
        for bracket in &sorted {
            if bracket.min < Decimal::ZERO {
                violations.push(BracketViolation::NegativeMin(bracket.min));
            }
            if let Some(max) = bracket.max {
                if max <= bracket.min {
                    violations.push(BracketViolation::EmptyBand {
                        min: bracket.min,
                        max,
                    });
                }
            }
        }

        for pair in sorted.windows(2) {
            if pair[0].min == pair[1].min {
                violations.push(BracketViolation::DuplicateMin(pair[0].min));
            }
        }

        let open: Vec<&&TaxBracket> = sorted.iter().filter(|b| b.is_open_ended()).collect();
        if open.len() > 1 {
            violations.push(BracketViolation::MultipleOpenBands(open.len()));
        } else if let Some(open_band) = open.first() {
            let top_min = sorted[sorted.len() - 1].min;
            if open_band.min < top_min {
                violations.push(BracketViolation::OpenBandNotTop(open_band.min));
            }
        }

        violations
    }
}
