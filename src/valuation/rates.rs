//! Effective annual rate of a fixed-income position.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Diagnostic;
use crate::utils::normalize_tag;

/// How a fixed-income position is remunerated. All figures are percentages a.a.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RateSpec {
    /// Fixed contracted rate.
    Prefixado { annual_rate: Decimal },
    /// Percentage of the CDI.
    PosFixadoCdi {
        percent_of_cdi: Decimal,
        current_cdi: Decimal,
    },
    /// IPCA + fixed spread.
    Ipca {
        reference_ipca: Option<Decimal>,
        fixed_spread: Decimal,
    },
}

/// Rate family, as selected in a form before its parameters are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    Prefixado,
    PosFixadoCdi,
    Ipca,
}

impl RateKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RateKind::Prefixado => "PREFIXADO",
            RateKind::PosFixadoCdi => "CDI",
            RateKind::Ipca => "IPCA",
        }
    }

    /// Recognize a free-text rate tag. Case and accents are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match normalize_tag(tag).as_str() {
            "prefixado" | "pre" | "pre_fixado" | "fixed" => Some(RateKind::Prefixado),
            "pos_fixado" | "posfixado" | "pos" | "cdi" | "pos_fixado_cdi" => {
                Some(RateKind::PosFixadoCdi)
            }
            "ipca" | "ipca+" | "inflacao" => Some(RateKind::Ipca),
            _ => None,
        }
    }
}

impl RateSpec {
    pub fn kind(&self) -> RateKind {
        match self {
            RateSpec::Prefixado { .. } => RateKind::Prefixado,
            RateSpec::PosFixadoCdi { .. } => RateKind::PosFixadoCdi,
            RateSpec::Ipca { .. } => RateKind::Ipca,
        }
    }

    /// Annualized rate in percent, zero when it can't be represented.
    pub fn effective_annual_rate(&self) -> Decimal {
        self.checked_annual_rate().unwrap_or(Decimal::ZERO)
    }

    /// Annualized rate in percent, `None` on overflow.
    pub fn checked_annual_rate(&self) -> Option<Decimal> {
        match self {
            RateSpec::Prefixado { annual_rate } => Some(*annual_rate),
            RateSpec::PosFixadoCdi {
                percent_of_cdi,
                current_cdi,
            } => current_cdi.checked_mul(*percent_of_cdi / Decimal::ONE_HUNDRED),
            RateSpec::Ipca {
                reference_ipca,
                fixed_spread,
            } => match reference_ipca {
                Some(ipca) if *ipca > Decimal::ZERO => ipca.checked_add(*fixed_spread),
                _ => Some(*fixed_spread),
            },
        }
    }

    /// True when an IPCA position is priced on its spread alone.
    pub fn is_spread_only(&self) -> bool {
        matches!(
            self,
            RateSpec::Ipca { reference_ipca, .. }
                if !reference_ipca.is_some_and(|ipca| ipca > Decimal::ZERO)
        )
    }
}

/// Effective rate for an optional spec, recording degradations.
///
/// A missing spec means the rate type was never chosen: the position accrues
/// nothing.
pub fn resolve_rate(spec: Option<&RateSpec>, diagnostics: &mut Vec<Diagnostic>) -> Decimal {
    match spec {
        Some(spec) => {
            if spec.is_spread_only() {
                debug!("IPCA reference missing, using fixed spread only");
                diagnostics.push(Diagnostic::IpcaSpreadOnly);
            }
            spec.checked_annual_rate().unwrap_or_else(|| {
                debug!("effective {} rate overflowed", spec.kind().as_str());
                diagnostics.push(Diagnostic::ArithmeticOverflow);
                Decimal::ZERO
            })
        }
        None => {
            diagnostics.push(Diagnostic::UnknownRateType);
            Decimal::ZERO
        }
    }
}
