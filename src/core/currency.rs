use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO 4217-style currency code, always stored uppercase.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::currency::CurrencyCode;
///
/// let usd = CurrencyCode::new("usd");
/// assert_eq!(usd.as_str(), "USD");
/// assert_eq!(usd, CurrencyCode::new("USD"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyCode(String);

impl CurrencyCode {
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_ascii_uppercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn is_jpy(&self) -> bool {
        self.0 == "JPY"
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for CurrencyCode {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Divisor for points on pairs with a JPY base currency.
pub const JPY_POINTS_DIVISOR: u32 = 1_000_000;

/// Divisor for points on every other pair.
pub const STANDARD_POINTS_DIVISOR: u32 = 10_000;

/// A pair of currencies as quoted on a security code, e.g. `EUR/USD` or `EURUSD`.
///
/// `base` is the currency of Amount1, `quote` the currency of Amount2.
/// A malformed security code yields the whole code as `base` and an
/// empty `quote`; see [`CurrencyPair::is_well_formed`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CurrencyPair {
    pub base: CurrencyCode,
    pub quote: CurrencyCode,
}

impl CurrencyPair {
    pub fn new(base: CurrencyCode, quote: CurrencyCode) -> Self {
        Self { base, quote }
    }

    /// Split a security code into base and quote currencies.
    ///
    /// # Examples
    ///
    /// ```
    /// use fx_cashflow_engine::core::currency::CurrencyPair;
    ///
    /// let slash = CurrencyPair::parse("eur/usd");
    /// let packed = CurrencyPair::parse("EURUSD");
    /// assert_eq!(slash, packed);
    /// assert_eq!(packed.quote.as_str(), "USD");
    ///
    /// let bad = CurrencyPair::parse("GOLD");
    /// assert_eq!(bad.base.as_str(), "GOLD");
    /// assert!(!bad.is_well_formed());
    /// ```
    pub fn parse(code: &str) -> Self {
        let code = code.trim();
        if code.contains('/') {
            let mut parts = code.split('/');
            let base = parts.next().unwrap_or_default();
            let quote = parts.next().unwrap_or_default();
            return Self::new(CurrencyCode::new(base), CurrencyCode::new(quote));
        }
        if code.chars().count() == 6 && code.is_ascii() {
            let (base, quote) = code.split_at(3);
            return Self::new(CurrencyCode::new(base), CurrencyCode::new(quote));
        }
        Self::new(CurrencyCode::new(code), CurrencyCode::new(""))
    }

    /// Both sides present.
    pub fn is_well_formed(&self) -> bool {
        !self.base.is_empty() && !self.quote.is_empty()
    }

    pub fn is_jpy_base(&self) -> bool {
        self.base.is_jpy()
    }

    /// Scale between quoted forward points and an outright rate adjustment.
    ///
    /// JPY-based pairs quote two fewer decimal places, so their points are
    /// scaled by 1,000,000 instead of 10,000.
    pub fn points_divisor(&self) -> u32 {
        if self.is_jpy_base() {
            JPY_POINTS_DIVISOR
        } else {
            STANDARD_POINTS_DIVISOR
        }
    }

    /// Packed ticker form, e.g. `EURUSD`.
    pub fn ticker(&self) -> String {
        format!("{}{}", self.base, self.quote)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Split a security code into `(base, quote)` currencies.
pub fn parse_pair(code: &str) -> (CurrencyCode, CurrencyCode) {
    let pair = CurrencyPair::parse(code);
    (pair.base, pair.quote)
}

/// True iff the base currency of `code` is JPY.
pub fn is_jpy_base(code: &str) -> bool {
    CurrencyPair::parse(code).is_jpy_base()
}

/// Points divisor for the security `code`.
pub fn points_divisor(code: &str) -> u32 {
    CurrencyPair::parse(code).points_divisor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_code_normalized() {
        assert_eq!(CurrencyCode::new(" eur "), CurrencyCode::new("EUR"));
        assert!(CurrencyCode::new("").is_empty());
    }

    #[test]
    fn test_parse_pair_slash() {
        let (base, quote) = parse_pair("usd/jpy");
        assert_eq!(base.as_str(), "USD");
        assert_eq!(quote.as_str(), "JPY");
    }

    #[test]
    fn test_parse_pair_extra_segments_ignored() {
        let pair = CurrencyPair::parse("EUR/USD/SPOT");
        assert_eq!(pair.base.as_str(), "EUR");
        assert_eq!(pair.quote.as_str(), "USD");
        assert_eq!(pair, CurrencyPair::parse("EURUSD"));
    }

    #[test]
    fn test_parse_pair_packed() {
        let pair = CurrencyPair::parse("gbpchf");
        assert_eq!(pair.to_string(), "GBP/CHF");
        assert_eq!(pair.ticker(), "GBPCHF");
    }

    #[test]
    fn test_parse_pair_malformed() {
        let (base, quote) = parse_pair("xau");
        assert_eq!(base.as_str(), "XAU");
        assert!(quote.is_empty());
    }

    #[test]
    fn test_jpy_base_divisor() {
        assert!(is_jpy_base("JPYUSD"));
        assert_eq!(points_divisor("JPY/KRW"), 1_000_000);
        assert!(!is_jpy_base("USDJPY"));
        assert_eq!(points_divisor("USDJPY"), 10_000);
        assert_eq!(points_divisor("EURUSD"), 10_000);
    }

    #[test]
    fn test_pair_ordering() {
        let mut pairs = vec![CurrencyPair::parse("USDJPY"), CurrencyPair::parse("EURUSD")];
        pairs.sort();
        assert_eq!(pairs[0].ticker(), "EURUSD");
    }
}
