use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One marginal rate band.
///
/// `min` is inclusive and `max` exclusive. A `None` max marks the open-ended
/// top band; at most one bracket in a set may have it, and it must be the one
/// with the greatest `min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<Decimal>,
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn new(
        min: Decimal,
        max: Option<Decimal>,
        rate: Decimal,
    ) -> Self {
        Self { min, max, rate }
    }

    /// Returns `true` for the band with no upper bound.
    pub fn is_open_ended(&self) -> bool {
        self.max.is_none()
    }
}

/// The bracket set published for a single tax year.
///
/// Mirrors the provider's wire shape: `{ "tax_brackets": [ ... ] }`. Brackets
/// may arrive in any order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxYearBrackets {
    pub tax_brackets: Vec<TaxBracket>,
}

impl TaxYearBrackets {
    pub fn new(tax_brackets: Vec<TaxBracket>) -> Self {
        Self { tax_brackets }
    }

    pub fn is_empty(&self) -> bool {
        self.tax_brackets.is_empty()
    }
}

impl From<Vec<TaxBracket>> for TaxYearBrackets {
    fn from(tax_brackets: Vec<TaxBracket>) -> Self {
        Self { tax_brackets }
    }
}
