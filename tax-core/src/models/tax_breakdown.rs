use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Tax owed within a single band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandTax {
    /// Lower bound of the band (the bracket's `min`).
    pub from: Decimal,
    /// Upper bound of the band; `None` means no upper bound.
    pub to: Option<Decimal>,
    pub rate: Decimal,
    /// Portion of the income falling inside `[from, to)`.
    pub taxable: Decimal,
    /// `taxable * rate`.
    pub tax: Decimal,
}

/// Result of a progressive tax calculation.
///
/// `per_band` holds one entry per input bracket in ascending `from` order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub per_band: Vec<BandTax>,
    pub total_tax: Decimal,
    pub effective_rate: Decimal,
}

impl TaxBreakdown {
    /// Sum of the taxable amounts across all bands.
    pub fn total_taxable(&self) -> Decimal {
        self.per_band.iter().map(|band| band.taxable).sum()
    }

    /// The open-ended band, if the bracket set had one.
    pub fn open_band(&self) -> Option<&BandTax> {
        self.per_band.iter().find(|band| band.to.is_none())
    }
}
