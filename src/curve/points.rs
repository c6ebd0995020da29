use crate::core::parsing::{parse_date_with, parse_optional_decimal, SETTLEMENT_DATE_FORMATS};
use crate::curve::tenor::Tenor;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One undecoded quote row from a forward points report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPointsRow {
    #[serde(rename = "Pair")]
    pub pair: String,
    #[serde(rename = "Tenor")]
    pub tenor: String,
    #[serde(rename = "SettlementDate")]
    pub settlement_date: String,
    /// Explicit day offset, used when no settlement date is quoted.
    #[serde(rename = "Days")]
    pub days: String,
    #[serde(rename = "BidPoints")]
    pub bid_points: String,
    #[serde(rename = "AskPoints")]
    pub ask_points: String,
    #[serde(rename = "BidOutright")]
    pub bid_outright: String,
    #[serde(rename = "AskOutright")]
    pub ask_outright: String,
}

/// Where a sample sits on the term structure.
///
/// Dated samples are positioned relative to each deal's start date.
/// Offset samples are already relative and used as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettlementKey {
    Date(NaiveDate),
    Offset(i64),
}

impl SettlementKey {
    /// Days from `start` to this settlement point.
    pub fn days_from(&self, start: NaiveDate) -> i64 {
        match *self {
            Self::Date(date) => (date - start).num_days(),
            Self::Offset(days) => days,
        }
    }
}

/// A single quoted tenor on a points curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsSample {
    pub tenor: String,
    pub settlement: SettlementKey,
    pub bid_points: Decimal,
    pub ask_points: Decimal,
    pub bid_outright: Option<Decimal>,
    pub ask_outright: Option<Decimal>,
}

impl PointsSample {
    /// Build a sample from a raw row.
    ///
    /// Needs a tenor label, a settlement position and at least one side of
    /// points. A missing side mirrors the present one. The settlement
    /// position is a parseable settlement date, else the `Days` column.
    /// Rows with neither are dropped.
    pub fn from_raw(row: &RawPointsRow) -> Option<Self> {
        let tenor = row.tenor.trim();
        if tenor.is_empty() {
            return None;
        }

        let settlement = parse_date_with(&row.settlement_date, SETTLEMENT_DATE_FORMATS)
            .map(SettlementKey::Date)
            .or_else(|| row.days.trim().parse::<i64>().ok().map(SettlementKey::Offset))?;

        let (bid_points, ask_points) = match (
            parse_optional_decimal(&row.bid_points),
            parse_optional_decimal(&row.ask_points),
        ) {
            (Some(bid), Some(ask)) => (bid, ask),
            (Some(bid), None) => (bid, bid),
            (None, Some(ask)) => (ask, ask),
            (None, None) => return None,
        };

        Some(Self {
            tenor: tenor.to_string(),
            settlement,
            bid_points,
            ask_points,
            bid_outright: parse_optional_decimal(&row.bid_outright),
            ask_outright: parse_optional_decimal(&row.ask_outright),
        })
    }

    pub fn mid_points(&self) -> Decimal {
        (self.bid_points + self.ask_points) / Decimal::TWO
    }

    /// Mid of the outright quotes, or whichever side is present.
    pub fn mid_outright(&self) -> Option<Decimal> {
        mid_of(self.bid_outright, self.ask_outright)
    }

    pub fn is_spot(&self) -> bool {
        Tenor::parse(&self.tenor).is_some_and(|t| t.is_spot())
    }
}

pub(crate) fn mid_of(bid: Option<Decimal>, ask: Option<Decimal>) -> Option<Decimal> {
    match (bid, ask) {
        (Some(bid), Some(ask)) => Some((bid + ask) / Decimal::TWO),
        (Some(side), None) | (None, Some(side)) => Some(side),
        (None, None) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(tenor: &str, date: &str, bid: &str, ask: &str) -> RawPointsRow {
        RawPointsRow {
            pair: "EURUSD".into(),
            tenor: tenor.into(),
            settlement_date: date.into(),
            bid_points: bid.into(),
            ask_points: ask.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_mid_points_both_sides() {
        let sample = PointsSample::from_raw(&row("1M", "2024/02/12", "20", "24")).unwrap();
        assert_eq!(sample.mid_points(), dec!(22));
        assert_eq!(
            sample.settlement,
            SettlementKey::Date(NaiveDate::from_ymd_opt(2024, 2, 12).unwrap())
        );
    }

    #[test]
    fn test_missing_side_mirrors() {
        let sample = PointsSample::from_raw(&row("1M", "2024-02-12", "", "24")).unwrap();
        assert_eq!(sample.bid_points, dec!(24));
        assert_eq!(sample.mid_points(), dec!(24));
    }

    #[test]
    fn test_rejects_incomplete_rows() {
        assert!(PointsSample::from_raw(&row("", "2024-02-12", "1", "2")).is_none());
        assert!(PointsSample::from_raw(&row("1M", "2024-02-12", "", "")).is_none());
        assert!(PointsSample::from_raw(&row("BROKEN", "soon", "1", "2")).is_none());
    }

    #[test]
    fn test_days_column_fallback() {
        let mut explicit = row("BROKEN", "", "5", "5");
        explicit.days = "45".into();
        let sample = PointsSample::from_raw(&explicit).unwrap();
        assert_eq!(sample.settlement, SettlementKey::Offset(45));
    }

    #[test]
    fn test_undated_rows_rejected() {
        assert!(PointsSample::from_raw(&row("3M", "", "5", "5")).is_none());
        assert!(PointsSample::from_raw(&row("3M", "garbage", "5", "5")).is_none());
        assert!(PointsSample::from_raw(&row("SP", "", "0", "0")).is_none());
    }

    #[test]
    fn test_days_from() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let dated = SettlementKey::Date(NaiveDate::from_ymd_opt(2024, 1, 31).unwrap());
        assert_eq!(dated.days_from(start), 30);
        assert_eq!(SettlementKey::Offset(7).days_from(start), 7);
    }

    #[test]
    fn test_mid_outright() {
        let mut spot = row("SP", "2024-01-03", "0", "0");
        spot.bid_outright = "1.0950".into();
        spot.ask_outright = "1.0952".into();
        let sample = PointsSample::from_raw(&spot).unwrap();
        assert!(sample.is_spot());
        assert_eq!(sample.mid_outright(), Some(dec!(1.0951)));
    }
}
