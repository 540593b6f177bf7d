//! Formatting and text helpers shared by the CLI and the engine
//!
//! Currency is displayed using Brazilian conventions (`R$ 1.234,56`) and
//! free-text tags typed by users are normalized before matching.

use itertools::Itertools;
use rust_decimal::Decimal;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

use crate::valuation::compound::round_cents;

/// Currency symbol options for formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurrencySymbol {
    /// Include "R$ " prefix (Brazilian Real)
    BRL,
    /// No currency symbol (percentages, quantities)
    None,
}

/// Format a decimal with `.` thousands and `,` decimal separators.
///
/// The value is rounded to centavos first, half away from zero, the same
/// rounding the valuation engine uses.
///
/// # Examples
/// ```
/// use carteira::utils::{format_currency_with_width, CurrencySymbol};
/// use rust_decimal_macros::dec;
///
/// assert_eq!(
///     format_currency_with_width(dec!(1234.56), 0, CurrencySymbol::BRL),
///     "R$ 1.234,56"
/// );
/// assert_eq!(
///     format_currency_with_width(dec!(1234), 12, CurrencySymbol::None),
///     "    1.234,00"
/// );
/// ```
pub fn format_currency_with_width(value: Decimal, width: usize, symbol: CurrencySymbol) -> String {
    let rounded = round_cents(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (integer_part, cents) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits: Vec<char> = integer_part.chars().collect();
    let grouped = digits
        .rchunks(3)
        .rev()
        .map(|chunk| chunk.iter().collect::<String>())
        .join(".");

    let prefix = match symbol {
        CurrencySymbol::BRL => "R$ ",
        CurrencySymbol::None => "",
    };

    let result = format!("{prefix}{sign}{grouped},{cents}");

    // Right-align
    if width > result.len() {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Format as Brazilian Real with symbol: "R$ 1.234,56"
///
/// # Examples
/// ```
/// use carteira::utils::format_currency;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
/// assert_eq!(format_currency(dec!(-500)), "R$ -500,00");
/// ```
pub fn format_currency(value: Decimal) -> String {
    format_currency_with_width(value, 0, CurrencySymbol::BRL)
}

/// Format a percentage with Brazilian decimal comma: "12,10%"
pub fn format_percent(value: Decimal) -> String {
    format!(
        "{}%",
        format_currency_with_width(value, 0, CurrencySymbol::None)
    )
}

/// Canonical form of a user-typed tag for matching.
///
/// Lowercases, strips accents, trims, and turns spaces/dashes into `_`:
/// `"Pós-fixado"` becomes `"pos_fixado"`.
pub fn normalize_tag(raw: &str) -> String {
    raw.trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c == ' ' || c == '-' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_format_currency_basic() {
        assert_eq!(format_currency(dec!(1234.56)), "R$ 1.234,56");
        assert_eq!(format_currency(dec!(0.99)), "R$ 0,99");
        assert_eq!(format_currency(dec!(1000000)), "R$ 1.000.000,00");
        assert_eq!(format_currency(dec!(0)), "R$ 0,00");
        assert_eq!(format_currency(dec!(123)), "R$ 123,00");
    }

    #[test]
    fn test_format_currency_negative() {
        assert_eq!(format_currency(dec!(-1234.56)), "R$ -1.234,56");
        assert_eq!(format_currency(dec!(-0.001)), "R$ 0,00");
    }

    #[test]
    fn test_format_currency_rounds() {
        assert_eq!(format_currency(dec!(1.005)), "R$ 1,01");
        assert_eq!(format_currency(dec!(1.234)), "R$ 1,23");
    }

    #[test]
    fn test_format_with_width() {
        let result = format_currency_with_width(dec!(100), 15, CurrencySymbol::BRL);
        assert_eq!(result, "      R$ 100,00");
        let unpadded = format_currency_with_width(dec!(1000000), 5, CurrencySymbol::BRL);
        assert_eq!(unpadded, "R$ 1.000.000,00");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(dec!(12.1)), "12,10%");
        assert_eq!(format_percent(dec!(22.5)), "22,50%");
    }

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("Pós-fixado"), "pos_fixado");
        assert_eq!(normalize_tag("  Debênture Incentivada "), "debenture_incentivada");
        assert_eq!(normalize_tag("IPCA+"), "ipca+");
        assert_eq!(normalize_tag("AÇÕES"), "acoes");
    }
}
