//! Order sizing for the portfolio ledger.
//!
//! Sizing is planned here as pure functions of cash, price and the current
//! position; [`Portfolio::execute`](super::portfolio::Portfolio::execute)
//! applies the plan. There is no leverage, borrowing or shorting: a plan
//! never spends more cash than is available and never sells more shares than
//! are held.

use std::fmt;

use super::position::{Position, TradeRecord};

pub const DEFAULT_POSITION_FRACTION: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BuySizing {
    /// Invest `cash * fraction` of the cash available at the time of the order.
    FixedFraction(f64),
    /// Buy exactly this many shares, or nothing.
    FixedQuantity(u64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SellSizing {
    /// Sell the whole position.
    FullLiquidation,
    /// Sell exactly this many shares, or nothing.
    FixedQuantity(u64),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizingPolicy {
    pub buy: BuySizing,
    pub sell: SellSizing,
}

impl Default for SizingPolicy {
    fn default() -> Self {
        SizingPolicy {
            buy: BuySizing::FixedFraction(DEFAULT_POSITION_FRACTION),
            sell: SellSizing::FullLiquidation,
        }
    }
}

/// Why a BUY or SELL decision did not produce a fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    InvalidPrice,
    InsufficientCash,
    NoShares,
    InsufficientShares { held: u64, requested: u64 },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::InvalidPrice => write!(f, "invalid price"),
            SkipReason::InsufficientCash => write!(f, "insufficient cash"),
            SkipReason::NoShares => write!(f, "no shares held"),
            SkipReason::InsufficientShares { held, requested } => {
                write!(f, "holding {held} shares, {requested} requested")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    Filled(TradeRecord),
    Skipped(SkipReason),
    Held,
}

impl ExecutionOutcome {
    pub fn trade(&self) -> Option<&TradeRecord> {
        match self {
            ExecutionOutcome::Filled(trade) => Some(trade),
            _ => None,
        }
    }
}

fn valid_price(price: f64) -> bool {
    price.is_finite() && price > 0.0
}

/// Whole shares purchasable with `budget` at `price` without the cost
/// exceeding `cash`.
///
/// The float quotient is floored, then walked down while the product still
/// overshoots `cash`, which can happen when `budget / price` rounds up to an
/// integer.
pub fn affordable_shares(budget: f64, cash: f64, price: f64) -> u64 {
    if !valid_price(price) || !budget.is_finite() || budget <= 0.0 {
        return 0;
    }
    let mut shares = (budget.min(cash) / price).floor() as u64;
    while shares > 0 && shares as f64 * price > cash {
        shares -= 1;
    }
    shares
}

/// Shares to buy under `sizing`, or the reason no order can be placed.
pub fn plan_buy(cash: f64, price: f64, sizing: &BuySizing) -> Result<u64, SkipReason> {
    if !valid_price(price) {
        return Err(SkipReason::InvalidPrice);
    }
    let shares = match *sizing {
        BuySizing::FixedFraction(fraction) => affordable_shares(cash * fraction, cash, price),
        BuySizing::FixedQuantity(quantity) => {
            if quantity as f64 * price <= cash {
                quantity
            } else {
                0
            }
        }
    };
    if shares == 0 {
        return Err(SkipReason::InsufficientCash);
    }
    Ok(shares)
}

/// Shares to sell under `sizing`, or the reason no order can be placed.
pub fn plan_sell(position: &Position, price: f64, sizing: &SellSizing) -> Result<u64, SkipReason> {
    if !valid_price(price) {
        return Err(SkipReason::InvalidPrice);
    }
    if position.shares == 0 {
        return Err(SkipReason::NoShares);
    }
    match *sizing {
        SellSizing::FullLiquidation => Ok(position.shares),
        SellSizing::FixedQuantity(quantity) if quantity > 0 && position.shares >= quantity => {
            Ok(quantity)
        }
        SellSizing::FixedQuantity(quantity) => Err(SkipReason::InsufficientShares {
            held: position.shares,
            requested: quantity,
        }),
    }
}
