use crate::core::cashflow::{CashflowLeg, LegType};
use crate::core::currency::{CurrencyCode, CurrencyPair};
use crate::core::parsing::{normalize_cashflow, ArithmeticOverflow};
use crate::core::pnl::PnlLedger;
use crate::core::trade::{DealType, FolderFilter, RawTradeRow, SkipReason, TradeRecord};
use crate::curve::forward_points::ForwardPointsCurve;
use chrono::NaiveDate;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Cashflows and PnL produced by a single deal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub legs: Vec<CashflowLeg>,
    pub pnl: PnlLedger,
}

/// Row counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessingSummary {
    pub rows_read: usize,
    pub expanded: usize,
    pub legs_emitted: usize,
    pub excluded_folder: usize,
    pub missing_fields: usize,
    pub unsupported_deal_type: usize,
    pub missing_value_date: usize,
    pub missing_maturity_date: usize,
    pub zero_notional: usize,
    pub arithmetic_overflow: usize,
}

impl ProcessingSummary {
    fn record_skip(&mut self, reason: &SkipReason) {
        let counter = match reason {
            SkipReason::ExcludedFolder(_) => &mut self.excluded_folder,
            SkipReason::MissingField(_) => &mut self.missing_fields,
            SkipReason::UnsupportedDealType(_) => &mut self.unsupported_deal_type,
            SkipReason::MissingValueDate { .. } => &mut self.missing_value_date,
            SkipReason::MissingMaturityDate { .. } => &mut self.missing_maturity_date,
            SkipReason::ZeroNotional { .. } => &mut self.zero_notional,
            SkipReason::ArithmeticOverflow { .. } => &mut self.arithmetic_overflow,
        };
        *counter += 1;
    }

    /// Rows that produced no cashflows.
    pub fn skipped(&self) -> usize {
        self.rows_read - self.expanded
    }
}

impl fmt::Display for ProcessingSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Processing Summary ===")?;
        writeln!(f, "Rows read:              {}", self.rows_read)?;
        writeln!(f, "Deals expanded:         {}", self.expanded)?;
        writeln!(f, "Cashflow legs:          {}", self.legs_emitted)?;
        writeln!(f, "Excluded by folder:     {}", self.excluded_folder)?;
        writeln!(f, "Missing identifiers:    {}", self.missing_fields)?;
        writeln!(f, "Unsupported deal type:  {}", self.unsupported_deal_type)?;
        writeln!(f, "Missing value date:     {}", self.missing_value_date)?;
        writeln!(f, "Missing maturity date:  {}", self.missing_maturity_date)?;
        writeln!(f, "Zero-notional swaps:    {}", self.zero_notional)?;
        writeln!(f, "Amounts out of range:   {}", self.arithmetic_overflow)?;
        Ok(())
    }
}

/// Output of [`CashflowEngine::process`].
#[derive(Debug, Clone, Default)]
pub struct BatchResult {
    pub legs: Vec<CashflowLeg>,
    pub pnl: PnlLedger,
    pub summary: ProcessingSummary,
}

/// Expands trades into dated cashflow legs and forward-points PnL.
///
/// The points curve is optional. Without one, forward-dated deals still
/// produce cashflows but swaps roll at their near rate and no PnL accrues.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::prelude::*;
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
///
/// let trade = TradeRecord::new(
///     "SWP-1",
///     DealType::FxSwap,
///     "EURUSD",
///     dec!(1_000_000),
///     dec!(-1_100_000),
///     NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
/// )
/// .with_maturity_date(NaiveDate::from_ymd_opt(2024, 4, 10).unwrap());
///
/// let expansion = CashflowEngine::new().expand(&trade).unwrap();
/// assert_eq!(expansion.legs.len(), 4);
/// assert!(expansion.pnl.is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CashflowEngine<'a> {
    curve: Option<&'a ForwardPointsCurve>,
}

impl<'a> CashflowEngine<'a> {
    /// An engine without market data.
    pub fn new() -> Self {
        Self { curve: None }
    }

    pub fn with_curve(curve: &'a ForwardPointsCurve) -> Self {
        Self { curve: Some(curve) }
    }

    pub fn curve(&self) -> Option<&'a ForwardPointsCurve> {
        self.curve
    }

    /// Expand one validated trade.
    pub fn expand(&self, trade: &TradeRecord) -> Result<Expansion, SkipReason> {
        match trade.deal_type() {
            DealType::Spot => Ok(self.expand_spot(trade)),
            DealType::OutrightForward => self.expand_outright(trade),
            DealType::FxSwap => self.expand_swap(trade),
        }
    }

    /// Filter, validate and expand one raw row.
    pub fn process_row(
        &self,
        row: &RawTradeRow,
        filter: &FolderFilter,
    ) -> Result<Expansion, SkipReason> {
        if filter.is_excluded(&row.folder) {
            return Err(SkipReason::ExcludedFolder(row.folder.trim().to_string()));
        }
        let trade = TradeRecord::from_raw(row)?;
        self.expand(&trade)
    }

    /// Expand a batch of raw rows.
    ///
    /// Bad rows are skipped and counted; nothing here aborts the batch.
    pub fn process(&self, rows: &[RawTradeRow], filter: &FolderFilter) -> BatchResult {
        let mut result = BatchResult::default();

        for row in rows {
            result.summary.rows_read += 1;
            let outcome = self.process_row(row, filter).and_then(|expansion| {
                result
                    .pnl
                    .try_absorb(&expansion.pnl)
                    .map_err(|_| SkipReason::ArithmeticOverflow {
                        deal_id: row.deal_id.trim().to_string(),
                    })?;
                Ok(expansion)
            });
            match outcome {
                Ok(expansion) => {
                    result.summary.expanded += 1;
                    result.summary.legs_emitted += expansion.legs.len();
                    result.legs.extend(expansion.legs);
                }
                Err(reason) => {
                    if reason.is_diagnostic() {
                        warn!("skipping row: {}", reason);
                    } else {
                        debug!("skipping row: {}", reason);
                    }
                    result.summary.record_skip(&reason);
                }
            }
        }

        info!(
            "expanded {} of {} rows into {} cashflow legs",
            result.summary.expanded, result.summary.rows_read, result.summary.legs_emitted
        );
        result
    }

    fn expand_spot(&self, trade: &TradeRecord) -> Expansion {
        Expansion {
            legs: pair_legs(
                trade,
                trade.value_date(),
                trade.amount1(),
                trade.amount2(),
                LegType::Spot,
            )
            .into(),
            pnl: PnlLedger::new(),
        }
    }

    fn expand_outright(&self, trade: &TradeRecord) -> Result<Expansion, SkipReason> {
        let maturity = require_maturity(trade)?;
        let pair = trade.pair();

        let mut pnl = PnlLedger::new();
        if let Some(curve_points) = self.curve_points(&pair, trade.value_date(), maturity) {
            if let Some((currency, amount)) =
                forward_pnl(&pair, trade.amount1(), trade.rate(), curve_points)
                    .map_err(|_| overflow(trade))?
            {
                pnl.add(currency, amount);
            }
        }

        Ok(Expansion {
            legs: pair_legs(
                trade,
                maturity,
                trade.amount1(),
                trade.amount2(),
                LegType::OutrightForward,
            )
            .into(),
            pnl,
        })
    }

    fn expand_swap(&self, trade: &TradeRecord) -> Result<Expansion, SkipReason> {
        let maturity = require_maturity(trade)?;
        if trade.amount1().is_zero() {
            return Err(SkipReason::ZeroNotional {
                deal_id: trade.deal_id().to_string(),
            });
        }
        let pair = trade.pair();

        let near_rate = trade
            .amount2()
            .checked_div(trade.amount1())
            .ok_or_else(|| overflow(trade))?;
        let mut far_rate = near_rate;
        let mut pnl = PnlLedger::new();

        if let Some(curve_points) = self.curve_points(&pair, trade.value_date(), maturity) {
            far_rate = curve_points
                .checked_div(Decimal::from(pair.points_divisor()))
                .and_then(|adjustment| near_rate.checked_add(adjustment))
                .ok_or_else(|| overflow(trade))?;
            if let Some((currency, amount)) =
                forward_pnl(&pair, trade.amount1(), trade.rate(), curve_points)
                    .map_err(|_| overflow(trade))?
            {
                pnl.add(currency, amount);
            }
        }
        let far_quote = (-trade.amount1())
            .checked_mul(far_rate)
            .ok_or_else(|| overflow(trade))?;

        let near = pair_legs(
            trade,
            trade.value_date(),
            trade.amount1(),
            trade.amount2(),
            LegType::FxSwapNear,
        );
        let far = pair_legs(
            trade,
            maturity,
            -trade.amount1(),
            far_quote,
            LegType::FxSwapFar,
        );

        Ok(Expansion {
            legs: near.into_iter().chain(far).collect(),
            pnl,
        })
    }

    fn curve_points(
        &self,
        pair: &CurrencyPair,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Option<Decimal> {
        self.curve?.interpolate(pair, start, end)
    }
}

/// PnL from the gap between curve points and the contracted points.
///
/// `pnl = -amount1 * (curve_points - contracted) / divisor`, attributed to
/// the quote currency. Returns `Ok(None)` when either points figure is
/// absent or zero, when the pair has no quote currency, or when the result
/// is zero.
///
/// # Examples
///
/// ```
/// use fx_cashflow_engine::core::currency::CurrencyPair;
/// use fx_cashflow_engine::engine::expansion::forward_pnl;
/// use rust_decimal_macros::dec;
///
/// let pair = CurrencyPair::parse("EURUSD");
/// let (ccy, pnl) = forward_pnl(&pair, dec!(1_000_000), Some(dec!(40)), dec!(50))
///     .unwrap()
///     .unwrap();
/// assert_eq!(ccy.as_str(), "USD");
/// assert_eq!(pnl, dec!(-1000));
/// ```
pub fn forward_pnl(
    pair: &CurrencyPair,
    amount1: Decimal,
    contracted: Option<Decimal>,
    curve_points: Decimal,
) -> Result<Option<(CurrencyCode, Decimal)>, ArithmeticOverflow> {
    let Some(contracted) = contracted.filter(|p| !p.is_zero()) else {
        return Ok(None);
    };
    if curve_points.is_zero() || pair.quote.is_empty() {
        return Ok(None);
    }
    let divisor = Decimal::from(pair.points_divisor());
    let pnl = curve_points
        .checked_sub(contracted)
        .and_then(|gap| (-amount1).checked_mul(gap))
        .and_then(|scaled| scaled.checked_div(divisor))
        .ok_or(ArithmeticOverflow)?;
    Ok((!pnl.is_zero()).then(|| (pair.quote.clone(), pnl)))
}

fn overflow(trade: &TradeRecord) -> SkipReason {
    SkipReason::ArithmeticOverflow {
        deal_id: trade.deal_id().to_string(),
    }
}

fn require_maturity(trade: &TradeRecord) -> Result<NaiveDate, SkipReason> {
    trade
        .maturity_date()
        .ok_or_else(|| SkipReason::MissingMaturityDate {
            deal_id: trade.deal_id().to_string(),
            deal_type: trade.deal_type(),
        })
}

/// Base and quote legs of one exchange on one date.
fn pair_legs(
    trade: &TradeRecord,
    date: NaiveDate,
    base_amount: Decimal,
    quote_amount: Decimal,
    leg_type: LegType,
) -> [CashflowLeg; 2] {
    let pair = trade.pair();
    let base = CashflowLeg::new(
        date,
        pair.base.clone(),
        normalize_cashflow(pair.base.as_str(), base_amount),
        trade.deal_id(),
        leg_type,
    );
    let quote = CashflowLeg::new(
        date,
        pair.quote.clone(),
        normalize_cashflow(pair.quote.as_str(), quote_amount),
        trade.deal_id(),
        leg_type,
    );
    [base, quote]
}
