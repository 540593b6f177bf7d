//! Liquid value at maturity: gross value minus IR on the gain.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::debug;

use super::compound::{round_cents, MonetaryAmount};
use super::period::HoldingPeriod;
use super::Diagnostic;
use crate::tax::TaxTreatment;

/// Projection of what the investor receives at maturity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MaturityProjection {
    pub gross_value: MonetaryAmount,
    /// Rate applied in percent; `None` when the tax step was skipped.
    pub tax_rate: Option<Decimal>,
    pub days_held: Option<i64>,
    pub tax_withheld: MonetaryAmount,
    pub final_value: MonetaryAmount,
    pub diagnostics: Vec<Diagnostic>,
}

impl MaturityProjection {
    /// Carry over warnings raised while compounding the gross value.
    pub fn with_gross_diagnostics(mut self, gross: Vec<Diagnostic>) -> Self {
        for diagnostic in gross {
            if !self.diagnostics.contains(&diagnostic) {
                self.diagnostics.push(diagnostic);
            }
        }
        self
    }
}

/// Apply IR to the gain of a position.
///
/// Tax only touches `gross_value - principal`; a loss is never rebated. The
/// regressive table needs both dates, so without them the gross value is
/// returned as is. Exempt positions follow the same rule, while a manual
/// rate needs no dates at all.
pub fn project_maturity_value(
    gross_value: Decimal,
    principal: Decimal,
    purchase_date: Option<NaiveDate>,
    maturity_date: Option<NaiveDate>,
    treatment: TaxTreatment,
) -> MaturityProjection {
    let mut diagnostics = Vec::new();
    let gross = MonetaryAmount::clamped(gross_value, &mut diagnostics);

    let days_held = match (purchase_date, maturity_date) {
        (Some(purchase), Some(maturity)) => Some(HoldingPeriod::days_to_maturity(
            purchase,
            maturity,
            &mut diagnostics,
        )),
        _ => None,
    };

    let tax_rate = match treatment {
        TaxTreatment::Manual(_) => treatment.rate_for(days_held),
        _ if days_held.is_none() => None,
        _ => treatment.rate_for(days_held),
    };

    let Some(rate) = tax_rate else {
        return MaturityProjection {
            gross_value: gross,
            tax_rate: None,
            days_held,
            tax_withheld: MonetaryAmount::ZERO,
            final_value: gross,
            diagnostics,
        };
    };

    let tax_due = gross
        .value()
        .checked_sub(principal)
        .map(|gain| gain.max(Decimal::ZERO))
        .and_then(|gain| gain.checked_mul(rate))
        .and_then(|taxed| taxed.checked_div(Decimal::ONE_HUNDRED));

    let Some(tax_due) = tax_due else {
        debug!("overflow taxing gross {} over principal {}", gross, principal);
        diagnostics.push(Diagnostic::ArithmeticOverflow);
        return MaturityProjection {
            gross_value: gross,
            tax_rate: Some(rate),
            days_held,
            tax_withheld: MonetaryAmount::ZERO,
            final_value: MonetaryAmount::ZERO,
            diagnostics,
        };
    };

    let tax = MonetaryAmount::clamped(round_cents(tax_due), &mut diagnostics);
    let final_value = MonetaryAmount::clamped(gross.value() - tax.value(), &mut diagnostics);

    MaturityProjection {
        gross_value: gross,
        tax_rate: Some(rate),
        days_held,
        tax_withheld: tax,
        final_value,
        diagnostics,
    }
}
