//! Cashflow totals bucketed by settlement horizon.

use crate::core::cashflow::AggregatedCashflow;
use crate::core::currency::CurrencyCode;
use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Settlement horizon relative to an as-of date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HorizonBucket {
    #[serde(rename = "Today")]
    Today,
    #[serde(rename = "Next 1W")]
    NextWeek,
    #[serde(rename = "Next 1M")]
    NextMonth,
    #[serde(rename = "Next 3M")]
    NextQuarter,
    #[serde(rename = "Next 6M")]
    NextHalfYear,
    #[serde(rename = "Next 1Y")]
    NextYear,
    #[serde(rename = "Beyond 1Y")]
    BeyondYear,
}

impl HorizonBucket {
    pub const ALL: [HorizonBucket; 7] = [
        Self::Today,
        Self::NextWeek,
        Self::NextMonth,
        Self::NextQuarter,
        Self::NextHalfYear,
        Self::NextYear,
        Self::BeyondYear,
    ];

    /// Last day (relative to as-of) covered by this bucket.
    pub fn horizon_days(&self) -> Option<i64> {
        match self {
            Self::Today => Some(0),
            Self::NextWeek => Some(7),
            Self::NextMonth => Some(30),
            Self::NextQuarter => Some(90),
            Self::NextHalfYear => Some(180),
            Self::NextYear => Some(365),
            Self::BeyondYear => None,
        }
    }

    /// First bucket whose horizon covers `date`. Past dates count as today.
    pub fn classify(date: NaiveDate, as_of: NaiveDate) -> Self {
        Self::ALL
            .into_iter()
            .find(|bucket| match bucket.horizon_days() {
                Some(days) => date <= as_of + Duration::days(days),
                None => true,
            })
            .unwrap_or(Self::BeyondYear)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Today => "Today",
            Self::NextWeek => "Next 1W",
            Self::NextMonth => "Next 1M",
            Self::NextQuarter => "Next 3M",
            Self::NextHalfYear => "Next 6M",
            Self::NextYear => "Next 1Y",
            Self::BeyondYear => "Beyond 1Y",
        }
    }
}

impl fmt::Display for HorizonBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// Per-currency totals for one horizon bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonRow {
    pub bucket: HorizonBucket,
    pub totals: BTreeMap<CurrencyCode, Decimal>,
}

/// Aggregated cashflows summed per horizon bucket and currency.
///
/// Every bucket appears in the output, in horizon order, even when empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HorizonSummary {
    pub as_of: NaiveDate,
    pub currencies: Vec<CurrencyCode>,
    pub rows: Vec<HorizonRow>,
}

impl HorizonSummary {
    pub fn build(cashflows: &[AggregatedCashflow], as_of: NaiveDate) -> Self {
        let mut rows: Vec<HorizonRow> = HorizonBucket::ALL
            .into_iter()
            .map(|bucket| HorizonRow {
                bucket,
                totals: BTreeMap::new(),
            })
            .collect();
        let mut currencies = BTreeSet::new();

        for cf in cashflows {
            let bucket = HorizonBucket::classify(cf.date, as_of);
            // ALL is in declaration order, so the discriminant indexes `rows`.
            let row = &mut rows[bucket as usize];
            *row.totals.entry(cf.currency.clone()).or_insert(Decimal::ZERO) += cf.amount;
            currencies.insert(cf.currency.clone());
        }

        Self {
            as_of,
            currencies: currencies.into_iter().collect(),
            rows,
        }
    }

    /// Total for one bucket and currency, zero if nothing settles there.
    pub fn total(&self, bucket: HorizonBucket, currency: &CurrencyCode) -> Decimal {
        self.rows
            .iter()
            .find(|r| r.bucket == bucket)
            .and_then(|r| r.totals.get(currency).copied())
            .unwrap_or(Decimal::ZERO)
    }
}

impl fmt::Display for HorizonSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Horizon Summary (as of {}) ===", self.as_of)?;
        write!(f, "{:<12}", "Period")?;
        for currency in &self.currencies {
            write!(f, "{:>20}", currency)?;
        }
        writeln!(f)?;
        for row in &self.rows {
            write!(f, "{:<12}", row.bucket)?;
            for currency in &self.currencies {
                let amount = row.totals.get(currency).copied().unwrap_or(Decimal::ZERO);
                write!(f, "{:>20}", amount.round_dp(2))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
    }

    fn cf(offset: i64, ccy: &str, amount: Decimal) -> AggregatedCashflow {
        AggregatedCashflow::new(as_of() + Duration::days(offset), CurrencyCode::new(ccy), amount)
    }

    #[test]
    fn test_classify_boundaries() {
        let on = |days: i64| HorizonBucket::classify(as_of() + Duration::days(days), as_of());
        assert_eq!(on(-5), HorizonBucket::Today);
        assert_eq!(on(0), HorizonBucket::Today);
        assert_eq!(on(1), HorizonBucket::NextWeek);
        assert_eq!(on(7), HorizonBucket::NextWeek);
        assert_eq!(on(8), HorizonBucket::NextMonth);
        assert_eq!(on(90), HorizonBucket::NextQuarter);
        assert_eq!(on(181), HorizonBucket::NextYear);
        assert_eq!(on(366), HorizonBucket::BeyondYear);
    }

    #[test]
    fn test_build_sums_per_bucket() {
        let flows = vec![
            cf(0, "USD", dec!(100)),
            cf(3, "USD", dec!(50)),
            cf(5, "USD", dec!(-20)),
            cf(5, "EUR", dec!(10)),
            cf(400, "EUR", dec!(7)),
        ];
        let summary = HorizonSummary::build(&flows, as_of());

        assert_eq!(summary.rows.len(), 7);
        assert_eq!(summary.currencies.len(), 2);
        let usd = CurrencyCode::new("USD");
        let eur = CurrencyCode::new("EUR");
        assert_eq!(summary.total(HorizonBucket::Today, &usd), dec!(100));
        assert_eq!(summary.total(HorizonBucket::NextWeek, &usd), dec!(30));
        assert_eq!(summary.total(HorizonBucket::NextWeek, &eur), dec!(10));
        assert_eq!(summary.total(HorizonBucket::BeyondYear, &eur), dec!(7));
        assert_eq!(summary.total(HorizonBucket::NextMonth, &eur), Decimal::ZERO);
    }

    #[test]
    fn test_display_has_every_bucket() {
        let summary = HorizonSummary::build(&[cf(1, "USD", dec!(1))], as_of());
        let text = summary.to_string();
        for bucket in HorizonBucket::ALL {
            assert!(text.contains(bucket.label()));
        }
    }
}
