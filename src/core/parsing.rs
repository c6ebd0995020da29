//! Tolerant field parsing.
//!
//! Input rows arrive as loosely formatted strings. Nothing here fails:
//! a malformed number becomes zero (or `None` for optional fields) and a
//! malformed date becomes `None`. Callers decide what an absent value means.

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;
use thiserror::Error;

/// A decimal operation left the representable range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("decimal arithmetic overflowed")]
pub struct ArithmeticOverflow;

/// Date layouts accepted for trade rows, tried in order.
pub const TRADE_DATE_FORMATS: &[&str] = &["%d/%m/%Y", "%Y-%m-%d"];

/// Date layouts accepted for points-report settlement dates, tried in order.
pub const SETTLEMENT_DATE_FORMATS: &[&str] = &["%Y/%m/%d", "%Y-%m-%d", "%d/%m/%Y"];

/// Parse a numeric string, stripping thousands separators.
///
/// Returns [`Decimal::ZERO`] for empty or unparseable input.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::parsing::parse_decimal;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(parse_decimal("1,250,000.50"), dec!(1250000.50));
/// assert_eq!(parse_decimal("n/a"), dec!(0));
/// ```
pub fn parse_decimal(s: &str) -> Decimal {
    parse_optional_decimal(s).unwrap_or(Decimal::ZERO)
}

/// Like [`parse_decimal`], but distinguishes "absent" from zero.
pub fn parse_optional_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Parse a trade-row date: `DD/MM/YYYY` first, then `YYYY-MM-DD`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    parse_date_with(s, TRADE_DATE_FORMATS)
}

/// Try each layout in `formats` in order and return the first match.
pub fn parse_date_with(s: &str, formats: &[&str]) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    formats
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Round a cashflow amount according to its currency.
///
/// JPY has no minor unit and is rounded to whole yen, half away from zero.
/// Every other currency keeps full precision.
pub fn normalize_cashflow(currency: &str, amount: Decimal) -> Decimal {
    if currency.trim().eq_ignore_ascii_case("JPY") {
        amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
    } else {
        amount
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_decimal_strips_commas() {
        assert_eq!(parse_decimal("1,000,000"), dec!(1000000));
        assert_eq!(parse_decimal("-1,100,000.25"), dec!(-1100000.25));
    }

    #[test]
    fn test_parse_decimal_failure_is_zero() {
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
        assert_eq!(parse_decimal("  "), Decimal::ZERO);
    }

    #[test]
    fn test_parse_decimal_scientific() {
        assert_eq!(parse_decimal("1.5e3"), dec!(1500));
    }

    #[test]
    fn test_parse_optional_decimal() {
        assert_eq!(parse_optional_decimal(""), None);
        assert_eq!(parse_optional_decimal("x"), None);
        assert_eq!(parse_optional_decimal("0"), Some(Decimal::ZERO));
        assert_eq!(parse_optional_decimal(" 12.5 "), Some(dec!(12.5)));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 10);
        assert_eq!(parse_date("10/01/2024"), expected);
        assert_eq!(parse_date("2024-01-10"), expected);
        assert_eq!(parse_date("2024/01/10"), None);
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("31/02/2024"), None);
    }

    #[test]
    fn test_settlement_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(parse_date_with("2024/03/05", SETTLEMENT_DATE_FORMATS), expected);
        assert_eq!(parse_date_with("05/03/2024", SETTLEMENT_DATE_FORMATS), expected);
    }

    #[test]
    fn test_normalize_jpy_rounds_half_up() {
        assert_eq!(normalize_cashflow("JPY", dec!(100.4)), dec!(100));
        assert_eq!(normalize_cashflow("JPY", dec!(100.5)), dec!(101));
        assert_eq!(normalize_cashflow("jpy", dec!(-100.5)), dec!(-101));
    }

    #[test]
    fn test_normalize_other_unchanged() {
        assert_eq!(normalize_cashflow("USD", dec!(100.456)), dec!(100.456));
        assert_eq!(normalize_cashflow("KWD", dec!(1.23456)), dec!(1.23456));
    }
}
