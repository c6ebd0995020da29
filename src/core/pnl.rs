use crate::core::currency::CurrencyCode;
use crate::core::parsing::ArithmeticOverflow;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Accumulated forward-points PnL per currency.
///
/// PnL is always attributed to the quote currency of the deal that
/// produced it. Ledgers from independent batches combine with
/// [`PnlLedger::merge`], which is associative and commutative.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::currency::CurrencyCode;
/// use fx_cashflow_engine::core::pnl::PnlLedger;
/// use rust_decimal_macros::dec;
///
/// let mut a = PnlLedger::new();
/// a.add(CurrencyCode::new("USD"), dec!(-1000));
/// let mut b = PnlLedger::new();
/// b.add(CurrencyCode::new("USD"), dec!(250));
///
/// let merged = a.merge(b);
/// assert_eq!(merged.get(&CurrencyCode::new("USD")), dec!(-750));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PnlLedger {
    entries: BTreeMap<CurrencyCode, Decimal>,
}

impl PnlLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the running total for `currency`.
    ///
    /// Zero amounts are ignored so that a currency only appears once it
    /// has actually accrued PnL. An amount that would push the total out of
    /// decimal range is logged and dropped.
    pub fn add(&mut self, currency: CurrencyCode, amount: Decimal) {
        if amount.is_zero() {
            return;
        }
        match self.get(&currency).checked_add(amount) {
            Some(total) => {
                self.entries.insert(currency, total);
            }
            None => warn!("{} PnL out of range, dropped {}", currency, amount),
        }
    }

    /// Fold every entry of `other` into this ledger, all or nothing.
    ///
    /// On overflow the ledger is left exactly as it was.
    pub fn try_absorb(&mut self, other: &PnlLedger) -> Result<(), ArithmeticOverflow> {
        let mut totals = Vec::with_capacity(other.entries.len());
        for (currency, amount) in &other.entries {
            let total = self.get(currency).checked_add(*amount).ok_or(ArithmeticOverflow)?;
            totals.push((currency.clone(), total));
        }
        self.entries.extend(totals);
        Ok(())
    }

    /// Like [`PnlLedger::try_absorb`], logging instead of failing.
    pub fn absorb(&mut self, other: PnlLedger) {
        if let Err(e) = self.try_absorb(&other) {
            warn!("PnL ledger not merged: {}", e);
        }
    }

    pub fn merge(mut self, other: PnlLedger) -> PnlLedger {
        self.absorb(other);
        self
    }

    /// PnL for a currency, zero if none accrued.
    pub fn get(&self, currency: &CurrencyCode) -> Decimal {
        self.entries.get(currency).copied().unwrap_or(Decimal::ZERO)
    }

    /// Entries in currency order.
    pub fn iter(&self) -> impl Iterator<Item = (&CurrencyCode, &Decimal)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(CurrencyCode, Decimal)> for PnlLedger {
    fn from_iter<T: IntoIterator<Item = (CurrencyCode, Decimal)>>(iter: T) -> Self {
        let mut ledger = PnlLedger::new();
        for (currency, amount) in iter {
            ledger.add(currency, amount);
        }
        ledger
    }
}

impl fmt::Display for PnlLedger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Forward Points PnL ===")?;
        if self.entries.is_empty() {
            return writeln!(f, "(no PnL)");
        }
        for (currency, amount) in &self.entries {
            writeln!(f, "{:<6}{}", currency, amount)?;
        }
        Ok(())
    }
}
