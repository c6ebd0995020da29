//! # fx-cashflow-engine
//!
//! Turns FX trade records into dated per-currency cashflows and derives a
//! forward-points PnL for forward-dated deals.
//!
//! Given a trade export and, optionally, a forward points report, the engine
//! expands every Spot, Outright Forward and FX Swap deal into cashflow legs,
//! nets them per date and currency, and attributes the gap between each
//! deal's contracted points and the interpolated curve points to the deal's
//! quote currency.
//!
//! ## Architecture
//!
//! - **core**: Parsing helpers, currencies, trades, cashflow legs, PnL ledger
//! - **curve**: Tenors, points samples and the interpolating points curve
//! - **engine**: Cashflow expansion, aggregation and horizon buckets
//! - **io**: Trade/points CSV input, filter config and report output
//! - **simulation**: Synthetic trade books and points reports

pub mod core;
pub mod curve;
pub mod engine;
pub mod io;
pub mod simulation;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::core::cashflow::{AggregatedCashflow, CashflowLeg, DatedAmount, LegType};
    pub use crate::core::currency::{CurrencyCode, CurrencyPair};
    pub use crate::core::pnl::PnlLedger;
    pub use crate::core::trade::{DealType, FolderFilter, RawTradeRow, SkipReason, TradeRecord};
    pub use crate::curve::forward_points::ForwardPointsCurve;
    pub use crate::curve::points::RawPointsRow;
    pub use crate::engine::aggregation::aggregate;
    pub use crate::engine::expansion::{BatchResult, CashflowEngine, Expansion};
}
