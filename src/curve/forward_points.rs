//! Forward points term structure with day-offset interpolation.
//!
//! Each currency pair owns a sorted set of quoted samples. Points for an
//! arbitrary period are found by measuring every sample against the
//! period's own start date, then interpolating linearly between the two
//! bracketing samples. Outside the quoted range the curve is clamped to
//! its end points rather than extrapolated.

use crate::core::currency::CurrencyPair;
use crate::core::parsing::parse_optional_decimal;
use crate::curve::points::{mid_of, PointsSample, RawPointsRow};
use crate::curve::tenor::Tenor;
use chrono::NaiveDate;
use log::debug;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// Samples and spot rate for one currency pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PairCurve {
    samples: Vec<PointsSample>,
    spot_rate: Option<Decimal>,
}

impl PairCurve {
    /// Samples ordered by [`SettlementKey`](crate::curve::points::SettlementKey):
    /// dated samples by date, then `Days`-offset samples by offset.
    ///
    /// Dates and offsets only become comparable against a deal's start
    /// date, so [`ForwardPointsCurve::interpolate`] re-sorts the knots by
    /// day distance for each deal.
    pub fn samples(&self) -> &[PointsSample] {
        &self.samples
    }

    pub fn spot_rate(&self) -> Option<Decimal> {
        self.spot_rate
    }
}

/// Per-pair forward points curves, built once and read-only afterwards.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::currency::CurrencyPair;
/// use fx_cashflow_engine::curve::forward_points::ForwardPointsCurve;
/// use fx_cashflow_engine::curve::points::RawPointsRow;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let quote = |tenor: &str, date: &str, pts: &str| RawPointsRow {
///     pair: "EURUSD".into(),
///     tenor: tenor.into(),
///     settlement_date: date.into(),
///     bid_points: pts.into(),
///     ask_points: pts.into(),
///     ..Default::default()
/// };
/// let curve = ForwardPointsCurve::load(vec![
///     quote("1M", "2024-01-31", "20"),
///     quote("3M", "2024-03-31", "30"),
/// ]);
///
/// let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let end = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
/// let points = curve.interpolate(&CurrencyPair::parse("EUR/USD"), start, end);
/// assert_eq!(points, Some(dec!(25)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForwardPointsCurve {
    curves: HashMap<CurrencyPair, PairCurve>,
}

impl ForwardPointsCurve {
    /// A curve with no pairs; every lookup returns `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build curves from raw quote rows.
    ///
    /// Rows are grouped by pair. Rows lacking a tenor, a settlement
    /// position or any points are dropped. When two rows of a pair share a
    /// settlement position, the first one wins. The `SP` row's outright mid
    /// becomes the pair's spot rate.
    pub fn load<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawPointsRow>,
    {
        let mut curves: HashMap<CurrencyPair, PairCurve> = HashMap::new();

        for row in rows {
            let pair = CurrencyPair::parse(&row.pair);
            if pair.base.is_empty() {
                debug!("points row without pair skipped: tenor '{}'", row.tenor);
                continue;
            }

            let curve = curves.entry(pair).or_default();
            let is_spot_row = Tenor::parse(&row.tenor).is_some_and(|t| t.is_spot());
            if is_spot_row && curve.spot_rate.is_none() {
                curve.spot_rate = mid_of(
                    parse_optional_decimal(&row.bid_outright),
                    parse_optional_decimal(&row.ask_outright),
                );
            }

            match PointsSample::from_raw(&row) {
                Some(sample) => curve.samples.push(sample),
                None => debug!(
                    "points row dropped: tenor '{}' settlement '{}'",
                    row.tenor, row.settlement_date
                ),
            }
        }

        for curve in curves.values_mut() {
            // Stable sort keeps input order among equal keys, so dedup keeps the first.
            curve.samples.sort_by_key(|s| s.settlement);
            curve.samples.dedup_by_key(|s| s.settlement);
        }
        curves.retain(|_, c| !c.samples.is_empty() || c.spot_rate.is_some());

        Self { curves }
    }

    /// Interpolated mid points for a deal running from `start` to `end`.
    ///
    /// Samples settling on or before `start` are ignored. Returns `None`
    /// when the pair is unknown or has no usable samples.
    pub fn interpolate(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<Decimal> {
        let curve = self.curves.get(pair)?;
        let target = (end - start).num_days();

        let mut knots: Vec<(i64, Decimal)> = curve
            .samples
            .iter()
            .map(|s| (s.settlement.days_from(start), s.mid_points()))
            .filter(|(days, _)| *days > 0)
            .collect();
        knots.sort_by_key(|(days, _)| *days);
        knots.dedup_by_key(|(days, _)| *days);

        let (first_day, first_points) = *knots.first()?;
        let (last_day, last_points) = *knots.last()?;

        if target <= first_day {
            return Some(first_points);
        }
        if target >= last_day {
            return Some(last_points);
        }

        knots.windows(2).find_map(|w| {
            let (d0, p0) = w[0];
            let (d1, p1) = w[1];
            if target < d0 || target > d1 {
                return None;
            }
            if d0 == d1 {
                return Some(p0);
            }
            Some(p0 + (p1 - p0) * Decimal::from(target - d0) / Decimal::from(d1 - d0))
        })
    }

    /// Mid points quoted for a tenor label, e.g. `"1M"`.
    pub fn points_at_tenor(&self, pair: &CurrencyPair, tenor: &str) -> Option<Decimal> {
        let wanted = Tenor::parse(tenor);
        self.curves.get(pair)?.samples.iter().find_map(|s| {
            let matches = match (wanted, Tenor::parse(&s.tenor)) {
                (Some(a), Some(b)) => a == b,
                _ => s.tenor.eq_ignore_ascii_case(tenor.trim()),
            };
            matches.then(|| s.mid_points())
        })
    }

    /// Spot outright mid recorded for the pair, if quoted.
    pub fn spot_rate(&self, pair: &CurrencyPair) -> Option<Decimal> {
        self.curves.get(pair)?.spot_rate
    }

    /// All spot rates, sorted by pair.
    pub fn spot_rates(&self) -> Vec<(CurrencyPair, Decimal)> {
        let mut rates: Vec<(CurrencyPair, Decimal)> = self
            .curves
            .iter()
            .filter_map(|(pair, c)| c.spot_rate.map(|r| (pair.clone(), r)))
            .collect();
        rates.sort_by(|a, b| a.0.cmp(&b.0));
        rates
    }

    pub fn pair_curve(&self, pair: &CurrencyPair) -> Option<&PairCurve> {
        self.curves.get(pair)
    }

    /// Known pairs, sorted.
    pub fn pairs(&self) -> Vec<&CurrencyPair> {
        let mut pairs: Vec<&CurrencyPair> = self.curves.keys().collect();
        pairs.sort();
        pairs
    }

    pub fn pair_count(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }
}
