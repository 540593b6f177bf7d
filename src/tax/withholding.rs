//! IR withholding on fixed-income gains.
//!
//! Taxable instruments follow the regressive table (the longer the holding,
//! the lower the rate). LCI, LCA, CRI, CRA and incentivized debentures are
//! exempt for individuals. Variable income isn't withheld at redemption:
//! the investor picks the rate that applies (15% swing trade, 20% day trade).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::normalize_tag;

/// Regressive IR table: `(max days held, rate %)`, inclusive bounds, ascending.
pub const REGRESSIVE_TABLE: &[(i64, Decimal)] = &[
    (180, dec!(22.5)),
    (360, dec!(20)),
    (720, dec!(17.5)),
];

/// Rate applied past the last table bracket.
pub const LONG_TERM_RATE: Decimal = dec!(15);

/// Swing trade rate for variable income.
pub const SWING_TRADE_RATE: Decimal = dec!(15);

/// Day trade rate for variable income.
pub const DAY_TRADE_RATE: Decimal = dec!(20);

/// Look up the regressive rate (in percent) for a holding period.
///
/// # Examples
/// ```
/// use carteira::tax::regressive_rate;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(regressive_rate(180), dec!(22.5));
/// assert_eq!(regressive_rate(181), dec!(20));
/// assert_eq!(regressive_rate(1000), dec!(15));
/// ```
pub fn regressive_rate(days_held: i64) -> Decimal {
    REGRESSIVE_TABLE
        .iter()
        .find(|(max_days, _)| days_held <= *max_days)
        .map(|(_, rate)| *rate)
        .unwrap_or(LONG_TERM_RATE)
}

/// How a position's gain is taxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "treatment", content = "rate", rename_all = "snake_case")]
pub enum TaxTreatment {
    /// Never taxed.
    Exempt,
    /// Regressive table by days held.
    Regressive,
    /// User-supplied rate in percent, applied as is.
    Manual(Decimal),
}

impl TaxTreatment {
    pub fn from_exempt_flag(is_exempt: bool) -> Self {
        if is_exempt {
            TaxTreatment::Exempt
        } else {
            TaxTreatment::Regressive
        }
    }

    /// Rate in percent, `None` when the table needs a holding period it doesn't have.
    pub fn rate_for(&self, days_held: Option<i64>) -> Option<Decimal> {
        match self {
            TaxTreatment::Exempt => Some(Decimal::ZERO),
            TaxTreatment::Manual(rate) => Some(*rate),
            TaxTreatment::Regressive => days_held.map(regressive_rate),
        }
    }
}

/// Instrument categories the tracker knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InstrumentKind {
    Cdb,
    Lc,
    Lci,
    Lca,
    Cri,
    Cra,
    Debenture,
    IncentivizedDebenture,
    Tesouro,
    Stock,
    Etf,
    Fii,
    Bdr,
}

impl InstrumentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            InstrumentKind::Cdb => "CDB",
            InstrumentKind::Lc => "LC",
            InstrumentKind::Lci => "LCI",
            InstrumentKind::Lca => "LCA",
            InstrumentKind::Cri => "CRI",
            InstrumentKind::Cra => "CRA",
            InstrumentKind::Debenture => "DEBENTURE",
            InstrumentKind::IncentivizedDebenture => "DEBENTURE_INCENTIVADA",
            InstrumentKind::Tesouro => "TESOURO",
            InstrumentKind::Stock => "STOCK",
            InstrumentKind::Etf => "ETF",
            InstrumentKind::Fii => "FII",
            InstrumentKind::Bdr => "BDR",
        }
    }

    pub fn is_exempt(&self) -> bool {
        matches!(
            self,
            InstrumentKind::Lci
                | InstrumentKind::Lca
                | InstrumentKind::Cri
                | InstrumentKind::Cra
                | InstrumentKind::IncentivizedDebenture
        )
    }

    /// Variable-income instruments whose rate the investor enters.
    pub fn is_manual(&self) -> bool {
        matches!(
            self,
            InstrumentKind::Stock | InstrumentKind::Etf | InstrumentKind::Fii | InstrumentKind::Bdr
        )
    }

    /// Treatment for this kind; `manual_rate` is only used by variable income.
    pub fn tax_treatment(&self, manual_rate: Decimal) -> TaxTreatment {
        if self.is_exempt() {
            TaxTreatment::Exempt
        } else if self.is_manual() {
            TaxTreatment::Manual(manual_rate)
        } else {
            TaxTreatment::Regressive
        }
    }
}

impl fmt::Display for InstrumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InstrumentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_tag(s).as_str() {
            "cdb" => Ok(InstrumentKind::Cdb),
            "lc" => Ok(InstrumentKind::Lc),
            "lci" => Ok(InstrumentKind::Lci),
            "lca" => Ok(InstrumentKind::Lca),
            "cri" => Ok(InstrumentKind::Cri),
            "cra" => Ok(InstrumentKind::Cra),
            "debenture" => Ok(InstrumentKind::Debenture),
            "debenture_incentivada" | "incentivized_debenture" | "debenture_incentivized" => {
                Ok(InstrumentKind::IncentivizedDebenture)
            }
            "tesouro" | "tesouro_direto" => Ok(InstrumentKind::Tesouro),
            "stock" | "acao" | "acoes" => Ok(InstrumentKind::Stock),
            "etf" => Ok(InstrumentKind::Etf),
            "fii" => Ok(InstrumentKind::Fii),
            "bdr" => Ok(InstrumentKind::Bdr),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regressive_boundaries() {
        assert_eq!(regressive_rate(0), dec!(22.5));
        assert_eq!(regressive_rate(180), dec!(22.5));
        assert_eq!(regressive_rate(181), dec!(20));
        assert_eq!(regressive_rate(360), dec!(20));
        assert_eq!(regressive_rate(361), dec!(17.5));
        assert_eq!(regressive_rate(720), dec!(17.5));
        assert_eq!(regressive_rate(721), dec!(15));
        assert_eq!(regressive_rate(5000), dec!(15));
    }

    #[test]
    fn test_table_is_ascending() {
        assert!(REGRESSIVE_TABLE.windows(2).all(|w| w[0].0 < w[1].0 && w[0].1 > w[1].1));
        assert!(REGRESSIVE_TABLE.iter().all(|(_, rate)| *rate > LONG_TERM_RATE));
    }

    #[test]
    fn test_exempt_kinds() {
        for kind in [
            InstrumentKind::Lci,
            InstrumentKind::Lca,
            InstrumentKind::Cri,
            InstrumentKind::Cra,
            InstrumentKind::IncentivizedDebenture,
        ] {
            assert_eq!(kind.tax_treatment(SWING_TRADE_RATE), TaxTreatment::Exempt);
        }
        for kind in [
            InstrumentKind::Cdb,
            InstrumentKind::Lc,
            InstrumentKind::Debenture,
            InstrumentKind::Tesouro,
        ] {
            assert_eq!(kind.tax_treatment(SWING_TRADE_RATE), TaxTreatment::Regressive);
        }
        assert_eq!(
            InstrumentKind::Stock.tax_treatment(DAY_TRADE_RATE),
            TaxTreatment::Manual(dec!(20))
        );
    }

    #[test]
    fn test_rate_for() {
        assert_eq!(TaxTreatment::Exempt.rate_for(None), Some(Decimal::ZERO));
        assert_eq!(TaxTreatment::Regressive.rate_for(None), None);
        assert_eq!(TaxTreatment::Regressive.rate_for(Some(400)), Some(dec!(17.5)));
        assert_eq!(TaxTreatment::Manual(dec!(15)).rate_for(None), Some(dec!(15)));
        assert_eq!(TaxTreatment::from_exempt_flag(true), TaxTreatment::Exempt);
        assert_eq!(TaxTreatment::from_exempt_flag(false), TaxTreatment::Regressive);
    }

    #[test]
    fn test_instrument_kind_parsing() {
        assert_eq!("cdb".parse::<InstrumentKind>(), Ok(InstrumentKind::Cdb));
        assert_eq!("LCI".parse::<InstrumentKind>(), Ok(InstrumentKind::Lci));
        assert_eq!(
            "Debênture Incentivada".parse::<InstrumentKind>(),
            Ok(InstrumentKind::IncentivizedDebenture)
        );
        assert_eq!("Tesouro Direto".parse::<InstrumentKind>(), Ok(InstrumentKind::Tesouro));
        assert_eq!("ações".parse::<InstrumentKind>(), Ok(InstrumentKind::Stock));
        assert_eq!("poupanca".parse::<InstrumentKind>(), Err(()));
    }
}
