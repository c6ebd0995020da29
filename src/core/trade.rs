use crate::core::currency::CurrencyPair;
use crate::core::parsing::{parse_date, parse_decimal, parse_optional_decimal};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// One undecoded row of the trade-detail export.
///
/// Field names follow the export's column headers. Every field is a raw
/// string; [`TradeRecord::from_raw`] does the typed validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawTradeRow {
    #[serde(rename = "Folder")]
    pub folder: String,
    #[serde(rename = "Deal Id")]
    pub deal_id: String,
    #[serde(rename = "Type of Deal")]
    pub deal_type: String,
    #[serde(rename = "Security")]
    pub security: String,
    #[serde(rename = "Amount1")]
    pub amount1: String,
    #[serde(rename = "Amount2")]
    pub amount2: String,
    #[serde(rename = "Trade Date")]
    pub trade_date: String,
    #[serde(rename = "Value Date")]
    pub value_date: String,
    #[serde(rename = "Mat. Date")]
    pub maturity_date: String,
    #[serde(rename = "Rate/Price")]
    pub rate: String,
}

/// Instruments the engine knows how to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    Spot,
    OutrightForward,
    FxSwap,
}

impl DealType {
    /// Case-insensitive match on the export's deal-type labels.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spot" => Some(Self::Spot),
            "outright forward" => Some(Self::OutrightForward),
            "fx swap" => Some(Self::FxSwap),
            _ => None,
        }
    }

    /// Whether expansion needs a maturity date.
    pub fn is_forward_dated(&self) -> bool {
        !matches!(self, Self::Spot)
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Spot => "Spot",
            Self::OutrightForward => "Outright Forward",
            Self::FxSwap => "FX Swap",
        };
        f.write_str(label)
    }
}

/// Why a row produced no cashflows.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkipReason {
    #[error("folder '{0}' is excluded")]
    ExcludedFolder(String),
    #[error("missing required field '{0}'")]
    MissingField(&'static str),
    #[error("unsupported deal type '{0}'")]
    UnsupportedDealType(String),
    #[error("deal {deal_id}: missing or invalid value date")]
    MissingValueDate { deal_id: String },
    #[error("{deal_type} {deal_id}: missing maturity date")]
    MissingMaturityDate { deal_id: String, deal_type: DealType },
    #[error("FX Swap {deal_id}: Amount1 is zero")]
    ZeroNotional { deal_id: String },
    #[error("deal {deal_id}: amounts out of decimal range")]
    ArithmeticOverflow { deal_id: String },
}

impl SkipReason {
    /// Diagnostic skips are reported as warnings; the rest are routine.
    pub fn is_diagnostic(&self) -> bool {
        matches!(
            self,
            Self::MissingMaturityDate { .. }
                | Self::ZeroNotional { .. }
                | Self::ArithmeticOverflow { .. }
        )
    }
}

/// A validated trade.
///
/// Built once per input row and never mutated afterwards.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::trade::{DealType, TradeRecord};
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let trade = TradeRecord::new(
///     "D-1",
///     DealType::Spot,
///     "EUR/USD",
///     dec!(1_000_000),
///     dec!(-1_100_000),
///     NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
/// );
/// assert_eq!(trade.pair().quote.as_str(), "USD");
/// assert!(trade.maturity_date().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    deal_id: String,
    deal_type: DealType,
    security: String,
    folder: Option<String>,
    amount1: Decimal,
    amount2: Decimal,
    trade_date: Option<NaiveDate>,
    value_date: NaiveDate,
    maturity_date: Option<NaiveDate>,
    rate: Option<Decimal>,
}

impl TradeRecord {
    pub fn new(
        deal_id: impl Into<String>,
        deal_type: DealType,
        security: impl Into<String>,
        amount1: Decimal,
        amount2: Decimal,
        value_date: NaiveDate,
    ) -> Self {
        Self {
            deal_id: deal_id.into(),
            deal_type,
            security: security.into(),
            folder: None,
            amount1,
            amount2,
            trade_date: None,
            value_date,
            maturity_date: None,
            rate: None,
        }
    }

    /// Validate a raw row.
    ///
    /// Identifying fields are checked first, then the deal type, then the
    /// value date. Maturity requirements depend on the deal type and are
    /// left to the expansion engine.
    pub fn from_raw(row: &RawTradeRow) -> Result<Self, SkipReason> {
        let deal_id = required(&row.deal_id, "Deal Id")?;
        let deal_type_label = required(&row.deal_type, "Type of Deal")?;
        let security = required(&row.security, "Security")?;

        let deal_type = DealType::parse(deal_type_label)
            .ok_or_else(|| SkipReason::UnsupportedDealType(deal_type_label.to_string()))?;

        let value_date = parse_date(&row.value_date).ok_or_else(|| SkipReason::MissingValueDate {
            deal_id: deal_id.to_string(),
        })?;

        let folder = row.folder.trim();
        Ok(Self {
            deal_id: deal_id.to_string(),
            deal_type,
            security: security.to_string(),
            folder: (!folder.is_empty()).then(|| folder.to_string()),
            amount1: parse_decimal(&row.amount1),
            amount2: parse_decimal(&row.amount2),
            trade_date: parse_date(&row.trade_date),
            value_date,
            maturity_date: parse_date(&row.maturity_date),
            rate: parse_optional_decimal(&row.rate),
        })
    }

    pub fn with_maturity_date(mut self, date: NaiveDate) -> Self {
        self.maturity_date = Some(date);
        self
    }

    pub fn with_trade_date(mut self, date: NaiveDate) -> Self {
        self.trade_date = Some(date);
        self
    }

    /// Set the contracted rate / points.
    pub fn with_rate(mut self, rate: Decimal) -> Self {
        self.rate = Some(rate);
        self
    }

    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    // --- Accessors ---

    pub fn deal_id(&self) -> &str {
        &self.deal_id
    }

    pub fn deal_type(&self) -> DealType {
        self.deal_type
    }

    pub fn security(&self) -> &str {
        &self.security
    }

    /// Currency pair derived from the security code.
    pub fn pair(&self) -> CurrencyPair {
        CurrencyPair::parse(&self.security)
    }

    pub fn folder(&self) -> Option<&str> {
        self.folder.as_deref()
    }

    /// Base-currency leg amount.
    pub fn amount1(&self) -> Decimal {
        self.amount1
    }

    /// Quote-currency leg amount.
    pub fn amount2(&self) -> Decimal {
        self.amount2
    }

    pub fn trade_date(&self) -> Option<NaiveDate> {
        self.trade_date
    }

    pub fn value_date(&self) -> NaiveDate {
        self.value_date
    }

    pub fn maturity_date(&self) -> Option<NaiveDate> {
        self.maturity_date
    }

    /// Contracted rate or points, if the row carried one.
    pub fn rate(&self) -> Option<Decimal> {
        self.rate
    }
}

fn required<'a>(value: &'a str, field: &'static str) -> Result<&'a str, SkipReason> {
    let value = value.trim();
    if value.is_empty() {
        Err(SkipReason::MissingField(field))
    } else {
        Ok(value)
    }
}

/// Folders whose trades are excluded from a run.
///
/// Resolved by the caller (config file or command line); the engine only
/// performs membership checks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FolderFilter(HashSet<String>);

impl FolderFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_excluded(&self, folder: &str) -> bool {
        self.0.contains(folder.trim())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for FolderFilter {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|s| s.as_ref().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw_row() -> RawTradeRow {
        RawTradeRow {
            folder: "FX-DESK".into(),
            deal_id: "D-100".into(),
            deal_type: "FX Swap".into(),
            security: "EUR/USD".into(),
            amount1: "1,000,000".into(),
            amount2: "-1,100,000".into(),
            trade_date: "08/01/2024".into(),
            value_date: "10/01/2024".into(),
            maturity_date: "10/04/2024".into(),
            rate: "45.5".into(),
        }
    }

    #[test]
    fn test_deal_type_parse() {
        assert_eq!(DealType::parse("SPOT"), Some(DealType::Spot));
        assert_eq!(DealType::parse(" outright forward "), Some(DealType::OutrightForward));
        assert_eq!(DealType::parse("fx swap"), Some(DealType::FxSwap));
        assert_eq!(DealType::parse("NDF"), None);
    }

    #[test]
    fn test_from_raw() {
        let trade = TradeRecord::from_raw(&raw_row()).unwrap();
        assert_eq!(trade.deal_id(), "D-100");
        assert_eq!(trade.deal_type(), DealType::FxSwap);
        assert_eq!(trade.amount1(), dec!(1000000));
        assert_eq!(trade.amount2(), dec!(-1100000));
        assert_eq!(trade.value_date(), NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(trade.maturity_date(), NaiveDate::from_ymd_opt(2024, 4, 10));
        assert_eq!(trade.trade_date(), NaiveDate::from_ymd_opt(2024, 1, 8));
        assert_eq!(trade.rate(), Some(dec!(45.5)));
        assert_eq!(trade.folder(), Some("FX-DESK"));
    }

    #[test]
    fn test_from_raw_missing_identifiers() {
        let mut row = raw_row();
        row.deal_id = "  ".into();
        assert_eq!(
            TradeRecord::from_raw(&row),
            Err(SkipReason::MissingField("Deal Id"))
        );

        let mut row = raw_row();
        row.security.clear();
        assert_eq!(
            TradeRecord::from_raw(&row),
            Err(SkipReason::MissingField("Security"))
        );
    }

    #[test]
    fn test_from_raw_unsupported_type() {
        let mut row = raw_row();
        row.deal_type = "NDF".into();
        assert_eq!(
            TradeRecord::from_raw(&row),
            Err(SkipReason::UnsupportedDealType("NDF".into()))
        );
    }

    #[test]
    fn test_from_raw_missing_value_date() {
        let mut row = raw_row();
        row.value_date = "not a date".into();
        let err = TradeRecord::from_raw(&row).unwrap_err();
        assert!(matches!(err, SkipReason::MissingValueDate { .. }));
        assert!(!err.is_diagnostic());
    }

    #[test]
    fn test_from_raw_absent_rate_and_maturity() {
        let mut row = raw_row();
        row.rate.clear();
        row.maturity_date.clear();
        let trade = TradeRecord::from_raw(&row).unwrap();
        assert_eq!(trade.rate(), None);
        assert_eq!(trade.maturity_date(), None);
    }

    #[test]
    fn test_folder_filter() {
        let filter: FolderFilter = ["TEST", " ARCHIVE ", ""].into_iter().collect();
        assert_eq!(filter.len(), 2);
        assert!(filter.is_excluded("ARCHIVE"));
        assert!(filter.is_excluded(" TEST"));
        assert!(!filter.is_excluded("FX-DESK"));
    }
}
