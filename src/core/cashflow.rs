use crate::core::currency::CurrencyCode;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which part of a deal a leg belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegType {
    Spot,
    FxSwapNear,
    FxSwapFar,
    OutrightForward,
}

impl fmt::Display for LegType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            Self::Spot => "spot",
            Self::FxSwapNear => "fx_swap_near",
            Self::FxSwapFar => "fx_swap_far",
            Self::OutrightForward => "outright_forward",
        };
        f.write_str(tag)
    }
}

/// Anything carrying a signed amount in one currency on one date.
pub trait DatedAmount {
    fn date(&self) -> NaiveDate;
    fn currency(&self) -> &CurrencyCode;
    fn amount(&self) -> Decimal;
}

/// A single dated cashflow produced by one deal.
///
/// Positive amounts are received, negative amounts are paid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CashflowLeg {
    date: NaiveDate,
    currency: CurrencyCode,
    amount: Decimal,
    deal_id: String,
    leg_type: LegType,
}

impl CashflowLeg {
    pub fn new(
        date: NaiveDate,
        currency: CurrencyCode,
        amount: Decimal,
        deal_id: impl Into<String>,
        leg_type: LegType,
    ) -> Self {
        Self {
            date,
            currency,
            amount,
            deal_id: deal_id.into(),
            leg_type,
        }
    }

    pub fn deal_id(&self) -> &str {
        &self.deal_id
    }

    pub fn leg_type(&self) -> LegType {
        self.leg_type
    }
}

impl DatedAmount for CashflowLeg {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

/// Net cashflow for one (date, currency) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatedCashflow {
    pub date: NaiveDate,
    pub currency: CurrencyCode,
    pub amount: Decimal,
}

impl AggregatedCashflow {
    pub fn new(date: NaiveDate, currency: CurrencyCode, amount: Decimal) -> Self {
        Self {
            date,
            currency,
            amount,
        }
    }
}

impl DatedAmount for AggregatedCashflow {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn currency(&self) -> &CurrencyCode {
        &self.currency
    }

    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl fmt::Display for AggregatedCashflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}  {}", self.date, self.currency, self.amount)
    }
}
