//! Progressive (marginal bracket) income tax calculation.
//!
//! Each bracket taxes only the slice of income that falls inside
//! `[min, max)`. The open-ended top bracket has no upper bound and absorbs
//! everything above its `min`.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Sort a copy of the brackets by `min` (stable) |
//! | 2    | `taxable = max(0, min(income, max) - min)` per band |
//! | 3    | `tax = taxable × rate`, accumulated into the total |
//! | 4    | `effective_rate = total / income` (0 when income ≤ 0) |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxBracket;
//! use tax_core::calculations::TaxCalculator;
//!
//! let brackets = vec![
//!     TaxBracket::new(dec!(0), Some(dec!(50197)), dec!(0.15)),
//!     TaxBracket::new(dec!(50197), Some(dec!(100392)), dec!(0.205)),
//!     TaxBracket::new(dec!(100392), None, dec!(0.26)),
//! ];
//!
//! let breakdown = TaxCalculator::new(&brackets).calculate(dec!(90000));
//!
//! assert_eq!(breakdown.per_band[0].taxable, dec!(50197));
//! assert_eq!(breakdown.per_band[1].taxable, dec!(39803));
//! assert_eq!(breakdown.total_tax, dec!(15689.165));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{cap_at, non_negative};
use crate::models::{BandTax, TaxBracket, TaxBreakdown};

/// Calculator over a borrowed bracket set.
///
/// The caller's slice is never reordered; every calculation works on its own
/// sorted copy, so one calculator can be shared freely across threads.
#[derive(Debug, Clone)]
pub struct TaxCalculator<'a> {
    tax_brackets: &'a [TaxBracket],
}

impl<'a> TaxCalculator<'a> {
    /// Creates a calculator for the given brackets, in any order.
    ///
    /// Duplicate `min` values and more than one open-ended bracket are
    /// undefined input: they are not detected and are processed as given.
    pub fn new(tax_brackets: &'a [TaxBracket]) -> Self {
        Self { tax_brackets }
    }

    /// Computes the per-band breakdown, total tax and effective rate.
    ///
    /// Income is expected to be non-negative but is not validated; negative
    /// income leaves every band with zero taxable income. There is no
    /// failure path.
    pub fn calculate(
        &self,
        income: Decimal,
    ) -> TaxBreakdown {
        debug!(%income, brackets = self.tax_brackets.len(), "calculating progressive tax");

        let mut total_tax = Decimal::ZERO;
        let per_band = self
            .sorted_brackets()
            .into_iter()
            .map(|bracket| {
                let band = self.band_tax(bracket, income);
                total_tax = total_tax.saturating_add(band.tax);
                band
            })
            .collect();

        TaxBreakdown {
            per_band,
            total_tax,
            effective_rate: self.effective_rate(total_tax, income),
        }
    }

    /// Returns the brackets ordered by ascending `min`, preserving the input
    /// order of equal keys.
    fn sorted_brackets(&self) -> Vec<&'a TaxBracket> {
        let mut sorted: Vec<&TaxBracket> = self.tax_brackets.iter().collect();
        sorted.sort_by(|a, b| a.min.cmp(&b.min));
        sorted
    }

    /// Computes the portion of `income` inside one band and the tax on it.
    fn band_tax(
        &self,
        bracket: &TaxBracket,
        income: Decimal,
    ) -> BandTax {
        let taxable = self.taxable_in_band(bracket, income);

        BandTax {
            from: bracket.min,
            to: bracket.max,
            rate: bracket.rate,
            taxable,
            tax: taxable.saturating_mul(bracket.rate),
        }
    }

    /// `max(0, min(income, upper) - min)`; an income sitting exactly on a
    /// boundary belongs wholly to the lower band.
    fn taxable_in_band(
        &self,
        bracket: &TaxBracket,
        income: Decimal,
    ) -> Decimal {
        non_negative(cap_at(income, bracket.max).saturating_sub(bracket.min))
    }

    fn effective_rate(
        &self,
        total_tax: Decimal,
        income: Decimal,
    ) -> Decimal {
        if income > Decimal::ZERO {
            total_tax.checked_div(income).unwrap_or(if total_tax.is_sign_negative() {
                Decimal::MIN
            } else {
                Decimal::MAX
            })
        } else {
            Decimal::ZERO
        }
    }
}

/// Convenience wrapper around [`TaxCalculator::calculate`].
pub fn calculate_tax(
    tax_brackets: &[TaxBracket],
    income: Decimal,
) -> TaxBreakdown {
    TaxCalculator::new(tax_brackets).calculate(income)
}
