use rust_decimal::Decimal;
use thiserror::Error;

/// Tax years the bracket service publishes.
pub const SUPPORTED_TAX_YEARS: [i32; 4] = [2019, 2020, 2021, 2022];

/// Rejected user input.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("Annual income is required")]
    Empty,

    #[error("Annual income '{0}' is not a number")]
    NotANumber(String),

    #[error("Annual income cannot be negative (got {0})")]
    Negative(Decimal),

    #[error("Tax year '{0}' is not supported; choose one of 2019, 2020, 2021, 2022")]
    UnsupportedYear(String),
}

/// Trims whitespace and removes commas (thousands separator).
fn normalize_decimal_input(s: &str) -> String {
    s.trim().replace(',', "")
}

pub fn is_supported_year(year: i32) -> bool {
    SUPPORTED_TAX_YEARS.contains(&year)
}

/// Parses an annual income such as `"90,000"` or `" 1234.56 "`.
pub fn parse_income(s: &str) -> Result<Decimal, InputError> {
    let normalized = normalize_decimal_input(s);
    if normalized.is_empty() {
        return Err(InputError::Empty);
    }

    let income: Decimal = normalized.parse().map_err(|e| {
        tracing::debug!(input = %s, "invalid income: {}", e);
        InputError::NotANumber(s.trim().to_string())
    })?;

    if income.is_sign_negative() && !income.is_zero() {
        return Err(InputError::Negative(income));
    }
    Ok(income)
}

pub fn parse_tax_year(s: &str) -> Result<i32, InputError> {
    let trimmed = s.trim();
    trimmed
        .parse::<i32>()
        .ok()
        .filter(|year| is_supported_year(*year))
        .ok_or_else(|| InputError::UnsupportedYear(trimmed.to_string()))
}

/// A validated (year, income) pair; the only way into a calculation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalculationRequest {
    year: i32,
    income: Decimal,
}

impl CalculationRequest {
    pub fn new(
        year: i32,
        income: Decimal,
    ) -> Result<Self, InputError> {
        if !is_supported_year(year) {
            return Err(InputError::UnsupportedYear(year.to_string()));
        }
        if income.is_sign_negative() && !income.is_zero() {
            return Err(InputError::Negative(income));
        }
        Ok(Self { year, income })
    }

    /// Builds a request from raw form text.
    pub fn parse(
        year: &str,
        income: &str,
    ) -> Result<Self, InputError> {
        Self::new(parse_tax_year(year)?, parse_income(income)?)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn income(&self) -> Decimal {
        self.income
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_income_accepts_comma_thousands_separator() {
        assert_eq!(parse_income("90,000").unwrap(), dec!(90000));
        assert_eq!(parse_income("1,234,567.89").unwrap(), dec!(1234567.89));
    }

    #[test]
    fn parse_income_trims_whitespace() {
        assert_eq!(parse_income("  123.45  ").unwrap(), dec!(123.45));
    }

    #[test]
    fn parse_income_zero_is_valid() {
        assert_eq!(parse_income("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_income("-0").unwrap(), Decimal::ZERO);
    }

    #[test]
    fn parse_income_rejects_empty() {
        assert_eq!(parse_income(""), Err(InputError::Empty));
        assert_eq!(parse_income("   "), Err(InputError::Empty));
    }

    #[test]
    fn parse_income_rejects_text() {
        assert_eq!(
            parse_income(" abc "),
            Err(InputError::NotANumber("abc".to_string()))
        );
    }

    #[test]
    fn parse_income_rejects_negative() {
        assert_eq!(parse_income("-5"), Err(InputError::Negative(dec!(-5))));
    }

    #[test]
    fn parse_tax_year_accepts_supported_years() {
        for year in SUPPORTED_TAX_YEARS {
            assert_eq!(parse_tax_year(&year.to_string()), Ok(year));
        }
        assert_eq!(parse_tax_year(" 2021 "), Ok(2021));
    }

    #[test]
    fn parse_tax_year_rejects_others() {
        assert_eq!(
            parse_tax_year("2018"),
            Err(InputError::UnsupportedYear("2018".to_string()))
        );
        assert_eq!(
            parse_tax_year("next"),
            Err(InputError::UnsupportedYear("next".to_string()))
        );
    }

    // ── CalculationRequest ───────────────────────────────────────────────

    #[test]
    fn request_parse_validates_both_fields() {
        let request = CalculationRequest::parse("2022", "90,000").unwrap();

        assert_eq!(request.year(), 2022);
        assert_eq!(request.income(), dec!(90000));
    }

    #[test]
    fn request_new_rejects_unsupported_year() {
        assert_eq!(
            CalculationRequest::new(2023, dec!(1)),
            Err(InputError::UnsupportedYear("2023".to_string()))
        );
    }

    #[test]
    fn request_new_rejects_negative_income() {
        assert_eq!(
            CalculationRequest::new(2022, dec!(-0.01)),
            Err(InputError::Negative(dec!(-0.01)))
        );
    }
}
