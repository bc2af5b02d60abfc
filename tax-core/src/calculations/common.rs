//! Common numeric helpers for bracket calculations.
//!
//! The calculator itself never rounds; rounding is only applied when amounts
//! are presented to a user.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a decimal value to exactly two decimal places using half-up rounding.
///
/// Values at exactly 0.005 are rounded away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(15689.165)), dec!(15689.17));
/// assert_eq!(round_half_up(dec!(7529.554)), dec!(7529.55));
/// assert_eq!(round_half_up(dec!(-0.005)), dec!(-0.01));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps a value to zero from below.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::non_negative;
///
/// assert_eq!(non_negative(dec!(-12.5)), dec!(0));
/// assert_eq!(non_negative(dec!(12.5)), dec!(12.5));
/// ```
pub fn non_negative(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Caps `value` at an optional upper bound. `None` means unbounded.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::cap_at;
///
/// assert_eq!(cap_at(dec!(90000), Some(dec!(50197))), dec!(50197));
/// assert_eq!(cap_at(dec!(90000), None), dec!(90000));
/// ```
pub fn cap_at(
    value: Decimal,
    upper: Option<Decimal>,
) -> Decimal {
    match upper {
        Some(upper) => value.min(upper),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_midpoint_up() {
        assert_eq!(round_half_up(dec!(8159.615)), dec!(8159.62));
    }

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(0.174324)), dec!(0.17));
    }

    #[test]
    fn round_half_up_handles_negative_midpoint() {
        assert_eq!(round_half_up(dec!(-2.345)), dec!(-2.35));
    }

    #[test]
    fn round_half_up_keeps_whole_numbers() {
        assert_eq!(round_half_up(dec!(50197)), dec!(50197));
    }

    // =========================================================================
    // non_negative tests
    // =========================================================================

    #[test]
    fn non_negative_clamps_negative_to_zero() {
        assert_eq!(non_negative(dec!(-50197)), Decimal::ZERO);
    }

    #[test]
    fn non_negative_passes_zero_through() {
        assert_eq!(non_negative(Decimal::ZERO), Decimal::ZERO);
    }

    // =========================================================================
    // cap_at tests
    // =========================================================================

    #[test]
    fn cap_at_returns_value_below_bound() {
        assert_eq!(cap_at(dec!(100), Some(dec!(200))), dec!(100));
    }

    #[test]
    fn cap_at_returns_bound_when_exceeded() {
        assert_eq!(cap_at(dec!(300), Some(dec!(200))), dec!(200));
    }

    #[test]
    fn cap_at_unbounded_returns_value() {
        assert_eq!(cap_at(dec!(1000000000), None), dec!(1000000000));
    }
}
