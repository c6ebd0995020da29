//! Synthetic trade books for benchmarks, property tests and demos.
//!
//! Generates raw trade rows and a matching forward points report so the
//! whole pipeline, parsing included, can be exercised without real data.

use crate::core::currency::CurrencyPair;
use crate::core::trade::{DealType, RawTradeRow};
use crate::curve::points::RawPointsRow;
use crate::curve::tenor::Tenor;
use chrono::{Duration, NaiveDate};
use rand::Rng;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Tenors quoted on generated points reports.
pub const GENERATED_TENORS: &[&str] = &["SP", "1W", "1M", "2M", "3M", "6M", "9M", "1Y"];

/// Configuration for a random trade book.
#[derive(Debug, Clone)]
pub struct TradeBookConfig {
    pub trade_count: usize,
    /// Security codes to draw from.
    pub pairs: Vec<String>,
    pub folders: Vec<String>,
    /// Earliest value date; value dates fall within the following 30 days.
    pub start_date: NaiveDate,
    /// Longest swap / forward term in days.
    pub max_term_days: i64,
    pub min_amount: Decimal,
    pub max_amount: Decimal,
}

impl Default for TradeBookConfig {
    fn default() -> Self {
        Self {
            trade_count: 100,
            pairs: vec!["EUR/USD".into(), "USD/JPY".into(), "GBP/USD".into()],
            folders: vec!["FX-SPOT".into(), "FX-SWAPS".into()],
            start_date: NaiveDate::from_ymd_opt(2024, 1, 2).unwrap_or_default(),
            max_term_days: 365,
            min_amount: Decimal::from(100_000),
            max_amount: Decimal::from(50_000_000),
        }
    }
}

/// Indicative spot rate used to size the quote leg of generated trades.
fn indicative_spot(pair: &CurrencyPair) -> Decimal {
    match pair.ticker().as_str() {
        "EURUSD" => Decimal::new(1095, 3),
        "GBPUSD" => Decimal::new(1270, 3),
        "USDJPY" => Decimal::new(14500, 2),
        "USDCHF" => Decimal::new(880, 3),
        "AUDUSD" => Decimal::new(665, 3),
        _ => Decimal::ONE,
    }
}

/// Indicative forward points per day of term.
fn points_per_day(pair: &CurrencyPair) -> Decimal {
    if pair.quote.is_jpy() {
        Decimal::new(-65, 2)
    } else {
        Decimal::new(18, 2)
    }
}

/// Generate a random trade book as raw CSV-style rows.
pub fn generate_trade_book(config: &TradeBookConfig) -> Vec<RawTradeRow> {
    let mut rng = rand::thread_rng();
    let deal_types = [DealType::Spot, DealType::OutrightForward, DealType::FxSwap];
    let mut rows = Vec::with_capacity(config.trade_count);

    if config.pairs.is_empty() {
        return rows;
    }

    let min = config.min_amount.to_i64().unwrap_or(1).max(1);
    let max = config.max_amount.to_i64().unwrap_or(min).max(min + 1);

    for _ in 0..config.trade_count {
        let security = &config.pairs[rng.gen_range(0..config.pairs.len())];
        let pair = CurrencyPair::parse(security);
        let deal_type = deal_types[rng.gen_range(0..deal_types.len())];

        let value_date = config.start_date + Duration::days(rng.gen_range(0..30));
        let term = rng.gen_range(1..=config.max_term_days.max(1));
        let maturity = value_date + Duration::days(term);

        let notional = Decimal::from(rng.gen_range(min..max));
        let direction = if rng.gen_bool(0.5) { Decimal::ONE } else { -Decimal::ONE };
        let amount1 = notional * direction;
        let amount2 = (-amount1 * indicative_spot(&pair)).round_dp(2);

        let contracted_points = points_per_day(&pair) * Decimal::from(term)
            + Decimal::new(rng.gen_range(-500..500), 2);

        let folder = if config.folders.is_empty() {
            String::new()
        } else {
            config.folders[rng.gen_range(0..config.folders.len())].clone()
        };

        rows.push(RawTradeRow {
            folder,
            deal_id: Uuid::new_v4().to_string(),
            deal_type: deal_type.to_string(),
            security: security.clone(),
            amount1: amount1.to_string(),
            amount2: amount2.to_string(),
            trade_date: (value_date - Duration::days(2)).format("%d/%m/%Y").to_string(),
            value_date: value_date.format("%d/%m/%Y").to_string(),
            maturity_date: if deal_type.is_forward_dated() {
                maturity.format("%d/%m/%Y").to_string()
            } else {
                String::new()
            },
            rate: if deal_type.is_forward_dated() {
                contracted_points.round_dp(2).to_string()
            } else {
                indicative_spot(&pair).to_string()
            },
        });
    }

    rows
}

/// Generate a points report for `pairs` with settlement dates from `spot_date`.
///
/// Points grow linearly with the tenor's nominal day count; bid and ask
/// are one point apart.
pub fn generate_points_report(pairs: &[String], spot_date: NaiveDate) -> Vec<RawPointsRow> {
    let mut rows = Vec::new();
    for security in pairs {
        let pair = CurrencyPair::parse(security);
        let spot = indicative_spot(&pair);
        for label in GENERATED_TENORS {
            let Some(tenor) = Tenor::parse(label) else {
                continue;
            };
            let (settlement, mid) = if tenor.is_spot() {
                (spot_date, Decimal::ZERO)
            } else {
                let days = tenor.nominal_days();
                (spot_date + Duration::days(days), points_per_day(&pair) * Decimal::from(days))
            };
            let half_spread = Decimal::new(5, 1);
            let (bid_outright, ask_outright) = if tenor.is_spot() {
                (
                    (spot - Decimal::new(1, 4)).to_string(),
                    (spot + Decimal::new(1, 4)).to_string(),
                )
            } else {
                (String::new(), String::new())
            };
            rows.push(RawPointsRow {
                pair: pair.ticker(),
                tenor: tenor.to_string(),
                settlement_date: settlement.format("%Y/%m/%d").to_string(),
                days: String::new(),
                bid_points: (mid - half_spread).to_string(),
                ask_points: (mid + half_spread).to_string(),
                bid_outright,
                ask_outright,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::trade::{FolderFilter, TradeRecord};
    use crate::curve::forward_points::ForwardPointsCurve;
    use crate::engine::expansion::CashflowEngine;

    #[test]
    fn test_generated_rows_validate() {
        let config = TradeBookConfig {
            trade_count: 50,
            ..Default::default()
        };
        let rows = generate_trade_book(&config);
        assert_eq!(rows.len(), 50);
        for row in &rows {
            let trade = TradeRecord::from_raw(row).unwrap();
            assert!(!trade.amount1().is_zero());
            if trade.deal_type().is_forward_dated() {
                assert!(trade.maturity_date().unwrap() > trade.value_date());
            }
        }
    }

    #[test]
    fn test_generated_book_expands_fully() {
        let config = TradeBookConfig::default();
        let rows = generate_trade_book(&config);
        let curve = ForwardPointsCurve::load(generate_points_report(&config.pairs, config.start_date));
        let result = CashflowEngine::with_curve(&curve).process(&rows, &FolderFilter::new());

        assert_eq!(result.summary.expanded, config.trade_count);
        assert!(result.legs.len() >= 2 * config.trade_count);
    }

    #[test]
    fn test_generated_points_report() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let rows = generate_points_report(&["EUR/USD".to_string()], start);
        assert_eq!(rows.len(), GENERATED_TENORS.len());

        let curve = ForwardPointsCurve::load(rows);
        let pair = CurrencyPair::parse("EURUSD");
        assert_eq!(curve.spot_rate(&pair), Some(Decimal::new(1095, 3)));
        assert_eq!(curve.points_at_tenor(&pair, "1M"), Some(Decimal::new(54, 1)));
    }

    #[test]
    fn test_empty_pairs_generate_nothing() {
        let config = TradeBookConfig {
            pairs: Vec::new(),
            ..Default::default()
        };
        assert!(generate_trade_book(&config).is_empty());
    }
}
