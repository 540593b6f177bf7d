//! Reference-date resolution and elapsed time.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::Diagnostic;

/// Day-count denominator: calendar days / 365, no leap adjustment.
pub const DAYS_PER_YEAR: i64 = 365;

/// Span between the purchase date and the date a position is valued at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoldingPeriod {
    pub purchase_date: NaiveDate,
    pub reference_date: NaiveDate,
    pub days: i64,
    pub years: Decimal,
}

impl HoldingPeriod {
    /// Build a period, clamping `reference_date` so it never precedes the purchase.
    pub fn between(purchase_date: NaiveDate, reference_date: NaiveDate) -> Self {
        let reference_date = reference_date.max(purchase_date);
        let days = (reference_date - purchase_date).num_days();
        Self {
            purchase_date,
            reference_date,
            days,
            years: Decimal::from(days) / Decimal::from(DAYS_PER_YEAR),
        }
    }

    /// Work out which date governs the valuation of a position.
    ///
    /// * no purchase date: `None`, the position can't be valued yet
    /// * `today` before the purchase: reference is the purchase date (0 years)
    /// * maturity already passed: reference is the maturity date
    /// * otherwise: reference is `today`
    ///
    /// A maturity before the purchase date is reported as
    /// [`Diagnostic::InvertedDates`] and the period collapses to zero length.
    pub fn resolve(
        purchase_date: Option<NaiveDate>,
        maturity_date: Option<NaiveDate>,
        today: NaiveDate,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Option<Self> {
        let purchase_date = purchase_date?;

        if today < purchase_date {
            return Some(Self::between(purchase_date, purchase_date));
        }

        let reference_date = match maturity_date {
            Some(maturity) if maturity < today => maturity,
            _ => today,
        };

        if reference_date < purchase_date {
            debug!(
                "maturity {} precedes purchase {}, clamping",
                reference_date, purchase_date
            );
            diagnostics.push(Diagnostic::InvertedDates);
        }

        Some(Self::between(purchase_date, reference_date))
    }

    /// Number of days between purchase and maturity, used by the withholding table.
    ///
    /// Negative spans count as zero days and are reported as inverted.
    pub fn days_to_maturity(
        purchase_date: NaiveDate,
        maturity_date: NaiveDate,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> i64 {
        let days = (maturity_date - purchase_date).num_days();
        if days < 0 {
            diagnostics.push(Diagnostic::InvertedDates);
            0
        } else {
            days
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_missing_purchase_is_not_computable() {
        let mut diags = Vec::new();
        assert!(HoldingPeriod::resolve(None, Some(d(2030, 1, 1)), d(2024, 1, 1), &mut diags).is_none());
    }

    #[test]
    fn test_future_purchase_has_zero_years() {
        let mut diags = Vec::new();
        let period =
            HoldingPeriod::resolve(Some(d(2025, 6, 1)), None, d(2025, 1, 1), &mut diags).unwrap();
        assert_eq!(period.reference_date, d(2025, 6, 1));
        assert_eq!(period.years, Decimal::ZERO);
        assert_eq!(period.days, 0);
        assert!(diags.is_empty());
    }

    #[test]
    fn test_reference_is_today_before_maturity() {
        let mut diags = Vec::new();
        let period = HoldingPeriod::resolve(
            Some(d(2023, 1, 1)),
            Some(d(2030, 1, 1)),
            d(2024, 1, 1),
            &mut diags,
        )
        .unwrap();
        assert_eq!(period.reference_date, d(2024, 1, 1));
        assert_eq!(period.days, 365);
        assert_eq!(period.years, dec!(1));
    }

    #[test]
    fn test_reference_is_maturity_once_passed() {
        let mut diags = Vec::new();
        let period = HoldingPeriod::resolve(
            Some(d(2023, 1, 1)),
            Some(d(2023, 7, 2)),
            d(2026, 1, 1),
            &mut diags,
        )
        .unwrap();
        assert_eq!(period.reference_date, d(2023, 7, 2));
        assert_eq!(period.days, 182);
    }

    #[test]
    fn test_leap_year_is_not_adjusted() {
        let period = HoldingPeriod::between(d(2024, 1, 1), d(2025, 1, 1));
        assert_eq!(period.days, 366);
        assert!(period.years > dec!(1));
    }

    #[test]
    fn test_inverted_dates_clamp_to_purchase() {
        let mut diags = Vec::new();
        let period = HoldingPeriod::resolve(
            Some(d(2024, 1, 1)),
            Some(d(2023, 1, 1)),
            d(2025, 1, 1),
            &mut diags,
        )
        .unwrap();
        assert_eq!(period.reference_date, d(2024, 1, 1));
        assert_eq!(period.days, 0);
        assert_eq!(diags, vec![Diagnostic::InvertedDates]);
    }

    #[test]
    fn test_days_to_maturity() {
        let mut diags = Vec::new();
        assert_eq!(
            HoldingPeriod::days_to_maturity(d(2024, 1, 1), d(2024, 6, 29), &mut diags),
            180
        );
        assert!(diags.is_empty());
        assert_eq!(
            HoldingPeriod::days_to_maturity(d(2024, 1, 1), d(2023, 12, 1), &mut diags),
            0
        );
        assert_eq!(diags, vec![Diagnostic::InvertedDates]);
    }
}
