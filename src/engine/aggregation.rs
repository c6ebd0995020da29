use crate::core::cashflow::{AggregatedCashflow, DatedAmount};
use crate::core::currency::CurrencyCode;
use crate::core::parsing::normalize_cashflow;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Net cashflows sharing a (date, currency) key.
///
/// Sums are exact; each total is then normalized for its currency, so JPY
/// totals are rounded after summing rather than only leg by leg. Output is
/// ordered by date, then currency code. A leg that would push its total out
/// of decimal range is logged and left out.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::cashflow::{CashflowLeg, LegType};
/// use fx_cashflow_engine::core::currency::CurrencyCode;
/// use fx_cashflow_engine::engine::aggregation::aggregate;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
/// let legs = vec![
///     CashflowLeg::new(day, CurrencyCode::new("USD"), dec!(-500), "A", LegType::Spot),
///     CashflowLeg::new(day, CurrencyCode::new("USD"), dec!(200), "B", LegType::Spot),
/// ];
/// let net = aggregate(&legs);
/// assert_eq!(net.len(), 1);
/// assert_eq!(net[0].amount, dec!(-300));
/// ```
pub fn aggregate<'a, T, I>(items: I) -> Vec<AggregatedCashflow>
where
    T: DatedAmount + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let mut totals: BTreeMap<(NaiveDate, CurrencyCode), Decimal> = BTreeMap::new();
    for item in items {
        let total = totals
            .entry((item.date(), item.currency().clone()))
            .or_insert(Decimal::ZERO);
        match total.checked_add(item.amount()) {
            Some(sum) => *total = sum,
            None => warn!(
                "{} {} total out of range, dropped {}",
                item.date(),
                item.currency(),
                item.amount()
            ),
        }
    }

    totals
        .into_iter()
        .map(|((date, currency), amount)| {
            let amount = normalize_cashflow(currency.as_str(), amount);
            AggregatedCashflow::new(date, currency, amount)
        })
        .collect()
}

/// Sum of aggregated cashflows per currency across all dates.
pub fn totals_by_currency(cashflows: &[AggregatedCashflow]) -> BTreeMap<CurrencyCode, Decimal> {
    let mut totals = BTreeMap::new();
    for cf in cashflows {
        *totals.entry(cf.currency.clone()).or_insert(Decimal::ZERO) += cf.amount;
    }
    totals
}
