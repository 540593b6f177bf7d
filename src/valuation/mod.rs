//! Investment valuation engine
//!
//! Pure functions projecting the current and maturity value of a position.
//! Nothing here touches the clock: `today` is always passed in, so the same
//! inputs always produce the same result.
//!
//! Entry points come in two flavours: typed functions
//! ([`valuate_treasury`], [`valuate_fixed_income`], [`valuate_variable_income`],
//! [`project_maturity_value`]) and form adapters ([`TreasuryForm`],
//! [`FixedIncomeForm`], [`VariableIncomeForm`]) that take the raw strings a
//! user typed and coerce them first.

pub mod coerce;
pub mod compound;
pub mod maturity;
pub mod period;
pub mod rates;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::tax::{InstrumentKind, TaxTreatment};
use coerce::{to_date_opt, to_number, to_number_opt};

pub use compound::MonetaryAmount;
pub use maturity::{project_maturity_value, MaturityProjection};
pub use period::HoldingPeriod;
pub use rates::{RateKind, RateSpec};

/// A silent degradation that happened while computing a result.
///
/// Diagnostics never change the numbers; they let callers tell "really zero"
/// apart from "clamped" or "incomplete".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Diagnostic {
    /// A negative amount was replaced by zero.
    NegativeValueClamped,
    /// Maturity date precedes purchase date.
    InvertedDates,
    /// IPCA position priced without a reference inflation figure.
    IpcaSpreadOnly,
    /// No recognizable rate type; the position accrues nothing.
    UnknownRateType,
    /// The computation overflowed `Decimal`.
    ArithmeticOverflow,
}

impl Diagnostic {
    pub fn description(&self) -> &'static str {
        match self {
            Diagnostic::NegativeValueClamped => "negative value clamped to zero",
            Diagnostic::InvertedDates => "maturity date is before purchase date",
            Diagnostic::IpcaSpreadOnly => "IPCA reference missing, using spread only",
            Diagnostic::UnknownRateType => "rate type not recognized, no interest accrued",
            Diagnostic::ArithmeticOverflow => "calculation overflowed",
        }
    }
}

/// Value of a position at its reference date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurrentValuation {
    pub current_value: MonetaryAmount,
    /// Effective annual rate in percent (zero for variable income).
    pub effective_rate: Decimal,
    /// Absent for variable income, which has no time dependency.
    pub period: Option<HoldingPeriod>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Current value of a Tesouro Direto bond bought at a fixed annual rate.
///
/// Returns `None` until a purchase date is known.
pub fn valuate_treasury(
    principal: Decimal,
    annual_rate_percent: Decimal,
    purchase_date: Option<NaiveDate>,
    maturity_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<CurrentValuation> {
    let spec = RateSpec::Prefixado {
        annual_rate: annual_rate_percent,
    };
    valuate_fixed_income(principal, Some(&spec), purchase_date, maturity_date, today)
}

/// Current value of a fixed-income position.
///
/// `rate` is `None` when the user hasn't picked a rate type yet; the
/// position then stays at its principal.
pub fn valuate_fixed_income(
    principal: Decimal,
    rate: Option<&RateSpec>,
    purchase_date: Option<NaiveDate>,
    maturity_date: Option<NaiveDate>,
    today: NaiveDate,
) -> Option<CurrentValuation> {
    let mut diagnostics = Vec::new();
    let period = HoldingPeriod::resolve(purchase_date, maturity_date, today, &mut diagnostics)?;
    let effective_rate = rates::resolve_rate(rate, &mut diagnostics);
    let current_value =
        compound::compound(principal, effective_rate, period.years, &mut diagnostics);

    Some(CurrentValuation {
        current_value,
        effective_rate,
        period: Some(period),
        diagnostics,
    })
}

/// Market value of a variable-income position.
pub fn valuate_variable_income(quantity: Decimal, current_price: Decimal) -> CurrentValuation {
    let mut diagnostics = Vec::new();
    let current_value = compound::market_value(quantity, current_price, &mut diagnostics);
    CurrentValuation {
        current_value,
        effective_rate: Decimal::ZERO,
        period: None,
        diagnostics,
    }
}

/// Gross value a fixed-income position reaches on its maturity date.
pub fn gross_at_maturity(
    principal: Decimal,
    rate: Option<&RateSpec>,
    purchase_date: Option<NaiveDate>,
    maturity_date: Option<NaiveDate>,
) -> Option<CurrentValuation> {
    let maturity = maturity_date?;
    valuate_fixed_income(principal, rate, purchase_date, Some(maturity), maturity)
}

/// Raw input of a treasury bond form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreasuryForm {
    pub principal: String,
    pub annual_rate: String,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub maturity_date: Option<String>,
}

impl TreasuryForm {
    pub fn principal(&self) -> Decimal {
        to_number(&self.principal)
    }

    fn rate_spec(&self) -> RateSpec {
        RateSpec::Prefixado {
            annual_rate: to_number(&self.annual_rate),
        }
    }

    pub fn purchase_date(&self) -> Option<NaiveDate> {
        to_date_opt(self.purchase_date.as_deref())
    }

    pub fn maturity_date(&self) -> Option<NaiveDate> {
        to_date_opt(self.maturity_date.as_deref())
    }

    pub fn valuate(&self, today: NaiveDate) -> Option<CurrentValuation> {
        valuate_fixed_income(
            self.principal(),
            Some(&self.rate_spec()),
            self.purchase_date(),
            self.maturity_date(),
            today,
        )
    }

    /// Liquid value at maturity under the regressive table.
    pub fn project(&self) -> Option<MaturityProjection> {
        let gross = gross_at_maturity(
            self.principal(),
            Some(&self.rate_spec()),
            self.purchase_date(),
            self.maturity_date(),
        )?;
        let projection = project_maturity_value(
            gross.current_value.value(),
            self.principal(),
            self.purchase_date(),
            self.maturity_date(),
            InstrumentKind::Tesouro.tax_treatment(Decimal::ZERO),
        );
        Some(projection.with_gross_diagnostics(gross.diagnostics))
    }
}

/// Raw input of a fixed-income form (CDB, LCI, debentures...).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedIncomeForm {
    pub principal: String,
    /// Rate family tag: "prefixado", "cdi", "ipca"...
    pub rate_type: String,
    /// Contracted rate: fixed % a.a., % of CDI, or spread over IPCA.
    pub rate: String,
    #[serde(default)]
    pub cdi: Option<String>,
    #[serde(default)]
    pub ipca: Option<String>,
    #[serde(default)]
    pub instrument: Option<String>,
    #[serde(default)]
    pub purchase_date: Option<String>,
    #[serde(default)]
    pub maturity_date: Option<String>,
}

impl FixedIncomeForm {
    pub fn principal(&self) -> Decimal {
        to_number(&self.principal)
    }

    pub fn purchase_date(&self) -> Option<NaiveDate> {
        to_date_opt(self.purchase_date.as_deref())
    }

    pub fn maturity_date(&self) -> Option<NaiveDate> {
        to_date_opt(self.maturity_date.as_deref())
    }

    pub fn instrument(&self) -> Option<InstrumentKind> {
        self.instrument.as_deref().and_then(|s| s.parse().ok())
    }

    /// Rate spec built from the form, `None` for an unknown rate type.
    pub fn rate_spec(&self) -> Option<RateSpec> {
        let rate = to_number(&self.rate);
        match RateKind::from_tag(&self.rate_type)? {
            RateKind::Prefixado => Some(RateSpec::Prefixado { annual_rate: rate }),
            RateKind::PosFixadoCdi => Some(RateSpec::PosFixadoCdi {
                percent_of_cdi: rate,
                current_cdi: to_number_opt(self.cdi.as_deref()),
            }),
            RateKind::Ipca => Some(RateSpec::Ipca {
                reference_ipca: self.ipca.as_deref().map(to_number),
                fixed_spread: rate,
            }),
        }
    }

    /// Tax treatment from the instrument field; unknown instruments are taxed.
    pub fn tax_treatment(&self) -> TaxTreatment {
        self.instrument()
            .map(|kind| kind.tax_treatment(Decimal::ZERO))
            .unwrap_or(TaxTreatment::Regressive)
    }

    pub fn valuate(&self, today: NaiveDate) -> Option<CurrentValuation> {
        valuate_fixed_income(
            self.principal(),
            self.rate_spec().as_ref(),
            self.purchase_date(),
            self.maturity_date(),
            today,
        )
    }

    pub fn project(&self) -> Option<MaturityProjection> {
        let gross = gross_at_maturity(
            self.principal(),
            self.rate_spec().as_ref(),
            self.purchase_date(),
            self.maturity_date(),
        )?;
        let projection = project_maturity_value(
            gross.current_value.value(),
            self.principal(),
            self.purchase_date(),
            self.maturity_date(),
            self.tax_treatment(),
        );
        Some(projection.with_gross_diagnostics(gross.diagnostics))
    }
}

/// Raw input of a variable-income form (stocks, ETFs, FIIs).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariableIncomeForm {
    pub quantity: String,
    pub current_price: String,
    #[serde(default)]
    pub average_price: Option<String>,
}

impl VariableIncomeForm {
    pub fn valuate(&self) -> CurrentValuation {
        valuate_variable_income(to_number(&self.quantity), to_number(&self.current_price))
    }

    /// Amount invested, when an average price is known and the product fits.
    pub fn cost_basis(&self) -> Option<Decimal> {
        let average = self.average_price.as_deref()?;
        to_number(&self.quantity).checked_mul(to_number(average))
    }

    /// Net value if sold now, taxing the gain at `rate` percent.
    pub fn project_sale(&self, rate: Decimal) -> Option<MaturityProjection> {
        let cost = self.cost_basis()?;
        Some(project_maturity_value(
            self.valuate().current_value.value(),
            cost,
            None,
            None,
            TaxTreatment::Manual(rate),
        ))
    }
}
