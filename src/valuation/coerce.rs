//! Tolerant coercion of form input into decimals and dates.
//!
//! Both functions follow the same policy: malformed input never raises,
//! it degrades to `0` or `None` and the caller decides what to render.

use chrono::{DateTime, NaiveDate};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a currency/percentage string typed by the user into a `Decimal`.
///
/// Every character other than digits, `,`, `.` and `-` is dropped first, so
/// `"R$ 1.234,56"` and `"10,5%"` are accepted. A comma is the decimal
/// separator (Brazilian convention) and dots are then grouping. Without a
/// comma a single dot is the decimal point and several dots are grouping.
///
/// # Examples
/// ```
/// use carteira::valuation::coerce::to_number;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(to_number("R$ 1.234,56"), dec!(1234.56));
/// assert_eq!(to_number("25.30"), dec!(25.30));
/// assert_eq!(to_number("abc"), dec!(0));
/// ```
pub fn to_number(raw: impl AsRef<str>) -> Decimal {
    let kept: String = raw
        .as_ref()
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    let normalized = if kept.contains(',') {
        kept.replace('.', "").replace(',', ".")
    } else if kept.matches('.').count() > 1 {
        kept.replace('.', "")
    } else {
        kept
    };

    Decimal::from_str(&normalized).unwrap_or(Decimal::ZERO)
}

/// Same as [`to_number`] for optional input; absent means `0`.
pub fn to_number_opt(raw: Option<&str>) -> Decimal {
    raw.map(to_number).unwrap_or(Decimal::ZERO)
}

/// Parse a date typed by the user.
///
/// Accepts `YYYY-MM-DD`, a full ISO 8601 / RFC 3339 timestamp (only the date
/// part is kept) and `DD/MM/YYYY`. Empty or invalid input gives `None`.
pub fn to_date(raw: impl AsRef<str>) -> Option<NaiveDate> {
    let trimmed = raw.as_ref().trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(ts.date_naive());
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%d/%m/%Y") {
        return Some(date);
    }
    // "2024-01-01T00:00:00" without offset
    trimmed
        .split_once('T')
        .and_then(|(date, _)| NaiveDate::parse_from_str(date, "%Y-%m-%d").ok())
}

/// Same as [`to_date`] for optional input.
pub fn to_date_opt(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(to_date)
}
