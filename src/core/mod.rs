//! Foundational types: parsing helpers, currencies, trades, cashflows, PnL.

pub mod cashflow;
pub mod currency;
pub mod parsing;
pub mod pnl;
pub mod trade;
