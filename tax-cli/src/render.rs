//! Text rendering of a calculation for the terminal.

use std::fmt;

use rust_decimal::Decimal;
use tax_core::calculations::common::round_half_up;
use tax_core::{BandTax, TaxBreakdown};

use crate::state::CalculationState;

pub const ERROR_TITLE: &str = "Something went wrong";
pub const ERROR_MESSAGE: &str =
    "We're sorry, something went wrong while fetching data. Please try again later.";

const HEADERS: [&str; 4] = [
    "Tax Bracket",
    "Marginal Tax Rate",
    "Amount Taxable",
    "Tax Payable",
];

/// Formats an amount as Canadian dollars, e.g. `$50,197.00`.
pub fn format_currency(value: Decimal) -> String {
    let rounded = round_half_up(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let text = format!("{:.2}", rounded.abs());
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));
    format!("{sign}${}.{cents}", group_thousands(whole))
}

/// Formats a fractional rate as a percentage with two decimals, e.g.
/// `0.205` as `20.50%`.
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.2}%", round_half_up(rate * Decimal::ONE_HUNDRED))
}

/// `$a - $b` for a bounded band, `$a +` for the open one.
pub fn format_band(band: &BandTax) -> String {
    match band.to {
        Some(to) => format!("{} - {}", format_currency(band.from), format_currency(to)),
        None => format!("{} +", format_currency(band.from)),
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// The per-band table followed by the total and effective rate.
pub struct BreakdownTable<'a>(pub &'a TaxBreakdown);

impl fmt::Display for BreakdownTable<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let rows: Vec<[String; 4]> = self
            .0
            .per_band
            .iter()
            .map(|band| {
                [
                    format_band(band),
                    format_percent(band.rate),
                    format_currency(band.taxable),
                    format_currency(band.tax),
                ]
            })
            .collect();

        let mut widths = HEADERS.map(str::len);
        for row in &rows {
            for (width, cell) in widths.iter_mut().zip(row) {
                *width = (*width).max(cell.len());
            }
        }

        write_row(f, &HEADERS, &widths)?;
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        writeln!(f, "{}", rule.join("-+-"))?;
        for row in &rows {
            write_row(f, row, &widths)?;
        }

        writeln!(f)?;
        writeln!(f, "Total Payable Taxes: {}", format_currency(self.0.total_tax))?;
        write!(f, "Effective Rate: {}", format_percent(self.0.effective_rate))
    }
}

fn write_row<S: AsRef<str>>(
    f: &mut fmt::Formatter<'_>,
    cells: &[S; 4],
    widths: &[usize; 4],
) -> fmt::Result {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell.as_ref()))
        .collect();
    writeln!(f, "{}", padded.join(" | ").trim_end())
}

/// Two-line notice shown when brackets could not be retrieved.
pub fn error_notice() -> String {
    format!("{ERROR_TITLE}\n{ERROR_MESSAGE}")
}

/// What the terminal should show for `state`.
pub fn render_state(state: &CalculationState) -> String {
    if state.error {
        return error_notice();
    }
    if state.loading {
        return "Calculating...".to_string();
    }
    state
        .visible_result()
        .map(|breakdown| BreakdownTable(breakdown).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn band(
        from: Decimal,
        to: Option<Decimal>,
        rate: Decimal,
        taxable: Decimal,
    ) -> BandTax {
        BandTax {
            from,
            to,
            rate,
            taxable,
            tax: taxable * rate,
        }
    }

    fn sample() -> TaxBreakdown {
        TaxBreakdown {
            per_band: vec![
                band(dec!(0), Some(dec!(50197)), dec!(0.15), dec!(50197)),
                band(dec!(50197), None, dec!(0.205), dec!(39803)),
            ],
            total_tax: dec!(15689.165),
            effective_rate: dec!(0.1743240555555555555555555556),
        }
    }

    // ── number formatting ────────────────────────────────────────────────

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(dec!(50197)), "$50,197.00");
        assert_eq!(format_currency(dec!(1234567.8)), "$1,234,567.80");
        assert_eq!(format_currency(dec!(999)), "$999.00");
        assert_eq!(format_currency(dec!(0)), "$0.00");
    }

    #[test]
    fn currency_rounds_half_up() {
        assert_eq!(format_currency(dec!(15689.165)), "$15,689.17");
        assert_eq!(format_currency(dec!(0.004)), "$0.00");
    }

    #[test]
    fn currency_negative_sign_before_symbol() {
        assert_eq!(format_currency(dec!(-1500.5)), "-$1,500.50");
    }

    #[test]
    fn percent_two_decimals() {
        assert_eq!(format_percent(dec!(0.205)), "20.50%");
        assert_eq!(format_percent(dec!(0.17432405)), "17.43%");
        assert_eq!(format_percent(dec!(0)), "0.00%");
    }

    #[test]
    fn band_labels() {
        let breakdown = sample();

        assert_eq!(format_band(&breakdown.per_band[0]), "$0.00 - $50,197.00");
        assert_eq!(format_band(&breakdown.per_band[1]), "$50,197.00 +");
    }

    // ── table ────────────────────────────────────────────────────────────

    #[test]
    fn table_lists_every_band_and_summary() {
        let text = BreakdownTable(&sample()).to_string();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Tax Bracket"));
        assert!(lines[0].contains("Marginal Tax Rate | Amount Taxable | Tax Payable"));
        assert!(lines[2].contains("$0.00 - $50,197.00"));
        assert!(lines[2].contains("$7,529.55"));
        assert!(lines[3].contains("$50,197.00 +"));
        assert!(lines[3].contains("20.50%"));
        assert_eq!(lines[5], "Total Payable Taxes: $15,689.17");
        assert_eq!(lines[6], "Effective Rate: 17.43%");
    }

    #[test]
    fn table_columns_align() {
        let text = BreakdownTable(&sample()).to_string();
        let lines: Vec<&str> = text.lines().take(4).collect();

        let first_bar = lines[0].find('|').unwrap();
        for line in &lines[2..] {
            assert_eq!(line.find('|'), Some(first_bar));
        }
    }

    // ── state ────────────────────────────────────────────────────────────

    #[test]
    fn failed_state_shows_notice_only() {
        let mut state = CalculationState::new();
        state.succeed(sample());
        state.fail();

        let text = render_state(&state);

        assert_eq!(
            text,
            "Something went wrong\nWe're sorry, something went wrong while fetching data. Please try again later."
        );
    }

    #[test]
    fn successful_state_shows_table() {
        let mut state = CalculationState::new();
        state.begin();
        state.succeed(sample());

        let text = render_state(&state);

        assert!(text.contains("Total Payable Taxes"));
        assert!(!text.contains(ERROR_TITLE));
    }

    #[test]
    fn loading_state_shows_progress_line() {
        let mut state = CalculationState::new();
        state.succeed(sample());

        state.begin();

        assert_eq!(render_state(&state), "Calculating...");
    }

    #[test]
    fn idle_state_is_blank() {
        assert_eq!(render_state(&CalculationState::new()), "");
    }
}
