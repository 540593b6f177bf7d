//! Compound growth and the shared clamp/round step.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::Diagnostic;

/// Non-negative BRL amount rounded to centavos.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonetaryAmount(Decimal);

impl MonetaryAmount {
    pub const ZERO: MonetaryAmount = MonetaryAmount(Decimal::ZERO);

    /// Clamp to zero and round half away from zero to 2 places.
    pub fn clamped(value: Decimal, diagnostics: &mut Vec<Diagnostic>) -> Self {
        if value.is_sign_negative() && !value.is_zero() {
            debug!("negative amount {} clamped to zero", value);
            diagnostics.push(Diagnostic::NegativeValueClamped);
            return Self::ZERO;
        }
        Self(round_cents(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl From<MonetaryAmount> for Decimal {
    fn from(amount: MonetaryAmount) -> Self {
        amount.0
    }
}

impl fmt::Display for MonetaryAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Standard (not banker's) rounding to 2 decimal places.
/// The result always carries scale 2, so it serializes as "20.00".
pub fn round_cents(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// `(1 + rate/100)^years`, or `None` when it can't be represented.
///
/// The whole-year part uses an exact integer power so whole-year holdings
/// match hand calculations to the centavo; only the fractional remainder
/// goes through `powd`.
pub fn growth_factor(annual_rate_percent: Decimal, years: Decimal) -> Option<Decimal> {
    if years.is_zero() {
        return Some(Decimal::ONE);
    }

    let base = Decimal::ONE + annual_rate_percent / Decimal::ONE_HUNDRED;
    if base <= Decimal::ZERO {
        return None;
    }

    let whole = years.trunc();
    let fraction = years - whole;

    let whole_factor = base.checked_powi(whole.to_i64()?)?;
    let fraction_factor = if fraction.is_zero() {
        Decimal::ONE
    } else {
        base.checked_powd(fraction)?
    };

    whole_factor.checked_mul(fraction_factor)
}

/// Value of `principal` compounded at `annual_rate_percent` for `years`.
pub fn compound(
    principal: Decimal,
    annual_rate_percent: Decimal,
    years: Decimal,
    diagnostics: &mut Vec<Diagnostic>,
) -> MonetaryAmount {
    let base = Decimal::ONE + annual_rate_percent / Decimal::ONE_HUNDRED;
    if base <= Decimal::ZERO && !years.is_zero() {
        debug!("rate {}% wipes out principal", annual_rate_percent);
        diagnostics.push(Diagnostic::NegativeValueClamped);
        return MonetaryAmount::ZERO;
    }

    match growth_factor(annual_rate_percent, years).and_then(|f| principal.checked_mul(f)) {
        Some(value) => MonetaryAmount::clamped(value, diagnostics),
        None => {
            debug!(
                "overflow compounding {} at {}% for {} years",
                principal, annual_rate_percent, years
            );
            diagnostics.push(Diagnostic::ArithmeticOverflow);
            MonetaryAmount::ZERO
        }
    }
}

/// Quantity times market price; no time dependency.
pub fn market_value(
    quantity: Decimal,
    price: Decimal,
    diagnostics: &mut Vec<Diagnostic>,
) -> MonetaryAmount {
    match quantity.checked_mul(price) {
        Some(value) => MonetaryAmount::clamped(value, diagnostics),
        None => {
            diagnostics.push(Diagnostic::ArithmeticOverflow);
            MonetaryAmount::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_cents_half_away_from_zero() {
        assert_eq!(round_cents(dec!(1.005)), dec!(1.01));
        assert_eq!(round_cents(dec!(1.015)), dec!(1.02));
        assert_eq!(round_cents(dec!(1.004)), dec!(1.00));
        assert_eq!(round_cents(dec!(2.5)), dec!(2.50));
    }

    #[test]
    fn test_clamped_negative_becomes_zero() {
        let mut diags = Vec::new();
        let amount = MonetaryAmount::clamped(dec!(-10.5), &mut diags);
        assert_eq!(amount, MonetaryAmount::ZERO);
        assert_eq!(diags, vec![Diagnostic::NegativeValueClamped]);
    }

    #[test]
    fn test_compound_whole_year() {
        let mut diags = Vec::new();
        let value = compound(dec!(1000), dec!(10), dec!(1), &mut diags);
        assert_eq!(value.value(), dec!(1100.00));

        let two_years = compound(dec!(1000), dec!(10), dec!(2), &mut diags);
        assert_eq!(two_years.value(), dec!(1210.00));
        assert!(diags.is_empty());
    }

    #[test]
    fn test_compound_fractional_year() {
        let mut diags = Vec::new();
        let years = Decimal::from(182) / Decimal::from(365);
        let value = compound(dec!(1000), dec!(10), years, &mut diags);
        assert_eq!(value.value(), dec!(1048.67));
    }

    #[test]
    fn test_compound_zero_years_returns_principal() {
        let mut diags = Vec::new();
        let value = compound(dec!(1234.56), dec!(15), Decimal::ZERO, &mut diags);
        assert_eq!(value.value(), dec!(1234.56));
    }

    #[test]
    fn test_compound_negative_rate() {
        let mut diags = Vec::new();
        let value = compound(dec!(1000), dec!(-10), dec!(1), &mut diags);
        assert_eq!(value.value(), dec!(900.00));
        assert!(diags.is_empty());

        let wiped = compound(dec!(1000), dec!(-150), dec!(1), &mut diags);
        assert_eq!(wiped, MonetaryAmount::ZERO);
        assert_eq!(diags, vec![Diagnostic::NegativeValueClamped]);
    }

    #[test]
    fn test_market_value() {
        let mut diags = Vec::new();
        assert_eq!(market_value(dec!(100), dec!(25.30), &mut diags).value(), dec!(2530.00));
        assert_eq!(market_value(dec!(0), dec!(25.30), &mut diags), MonetaryAmount::ZERO);
        assert_eq!(market_value(dec!(3), dec!(0.333), &mut diags).value(), dec!(1.00));
    }

    #[test]
    fn test_compound_overflow_degrades_to_zero() {
        let mut diags = Vec::new();
        // 11^50 does not fit in a Decimal
        let value = compound(dec!(1000), dec!(1000), dec!(50), &mut diags);
        assert_eq!(value, MonetaryAmount::ZERO);
        assert_eq!(diags, vec![Diagnostic::ArithmeticOverflow]);

        let mut diags = Vec::new();
        let value = compound(Decimal::MAX, dec!(10), dec!(1), &mut diags);
        assert_eq!(value, MonetaryAmount::ZERO);
        assert_eq!(diags, vec![Diagnostic::ArithmeticOverflow]);
    }

    #[test]
    fn test_market_value_overflow() {
        let mut diags = Vec::new();
        assert_eq!(market_value(Decimal::MAX, dec!(2), &mut diags), MonetaryAmount::ZERO);
        assert_eq!(diags, vec![Diagnostic::ArithmeticOverflow]);
    }

    #[test]
    fn test_display_has_two_places() {
        let mut diags = Vec::new();
        assert_eq!(MonetaryAmount::clamped(dec!(5), &mut diags).to_string(), "5.00");
    }
}
