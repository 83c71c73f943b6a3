//! Portfolio ledger: cash, per-instrument positions and the trade log.
//!
//! [`Portfolio::execute`] is the only way to change the ledger once it is
//! created. Cash never goes negative and no position ever drops below zero
//! shares. Cash is held as a [`Decimal`], so a buy followed by a sell of the
//! same shares at the same price restores it exactly.

use chrono::NaiveDate;
use log::debug;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use std::collections::HashMap;

use super::execution::{plan_buy, plan_sell, BuySizing, ExecutionOutcome, SkipReason, SizingPolicy};
use super::position::{Position, Side, TradeRecord};
use super::signal::Decision;

#[derive(Debug, Clone, PartialEq)]
pub struct Portfolio {
    cash: Decimal,
    initial_cash: f64,
    positions: HashMap<String, Position>,
    trades: Vec<TradeRecord>,
}

impl Portfolio {
    pub fn new(initial_cash: f64) -> Self {
        Portfolio {
            cash: Decimal::from_f64(initial_cash).unwrap_or_default(),
            initial_cash,
            positions: HashMap::new(),
            trades: Vec::new(),
        }
    }

    pub fn cash(&self) -> f64 {
        self.cash.to_f64().unwrap_or_default()
    }

    pub fn initial_cash(&self) -> f64 {
        self.initial_cash
    }

    /// Current holding for `symbol`; flat if it was never traded.
    pub fn position(&self, symbol: &str) -> Position {
        self.positions.get(symbol).copied().unwrap_or_default()
    }

    pub fn positions(&self) -> &HashMap<String, Position> {
        &self.positions
    }

    pub fn trades(&self) -> &[TradeRecord] {
        &self.trades
    }

    pub fn into_trades(self) -> Vec<TradeRecord> {
        self.trades
    }

    /// Cash plus every position marked at the price in `price_map`.
    /// Positions without a price contribute nothing.
    pub fn total_value(&self, price_map: &HashMap<String, f64>) -> f64 {
        let position_value: f64 = self
            .positions
            .iter()
            .filter_map(|(symbol, pos)| price_map.get(symbol).map(|&p| pos.market_value(p)))
            .sum();
        self.cash() + position_value
    }

    /// Apply a signal decision at `price`.
    ///
    /// BUY and SELL orders that cannot be sized (not enough cash, nothing to
    /// sell, bad price) are returned as `Skipped` and leave the ledger
    /// untouched.
    pub fn execute(
        &mut self,
        decision: Decision,
        symbol: &str,
        price: f64,
        date: NaiveDate,
        sizing: &SizingPolicy,
    ) -> ExecutionOutcome {
        let planned = match decision {
            Decision::Hold => return ExecutionOutcome::Held,
            Decision::Buy => plan_buy(self.cash(), price, &sizing.buy).map(|s| (Side::Buy, s)),
            Decision::Sell => {
                plan_sell(&self.position(symbol), price, &sizing.sell).map(|s| (Side::Sell, s))
            }
        };

        let planned = planned.and_then(|(side, shares)| {
            let unit = Decimal::from_f64(price).ok_or(SkipReason::InvalidPrice)?;
            let shares = match side {
                Side::Buy => self.settle_buy(shares, unit, &sizing.buy)?,
                Side::Sell => shares,
            };
            Ok((side, shares, unit))
        });

        let (side, shares, unit) = match planned {
            Ok(plan) => plan,
            Err(reason) => {
                debug!("{date} {decision} {symbol} @ {price:.2} skipped: {reason}");
                return ExecutionOutcome::Skipped(reason);
            }
        };

        let notional = Decimal::from(shares) * unit;
        let position = self.positions.entry(symbol.to_string()).or_default();
        match side {
            Side::Buy => {
                self.cash -= notional;
                position.add(shares, price);
            }
            Side::Sell => {
                self.cash += notional;
                position.remove(shares);
            }
        }

        let trade = TradeRecord {
            symbol: symbol.to_string(),
            side,
            shares,
            price,
            date,
        };
        debug!(
            "{date} {side} {shares} {symbol} @ {price:.2}, cash now {:.2}",
            self.cash
        );
        self.trades.push(trade.clone());
        ExecutionOutcome::Filled(trade)
    }

    /// Re-check a planned buy against the exact cash balance. Fractional
    /// sizing sheds shares until it fits; a fixed quantity is all or nothing.
    fn settle_buy(&self, planned: u64, unit: Decimal, sizing: &BuySizing) -> Result<u64, SkipReason> {
        let mut shares = planned;
        while shares > 0 && Decimal::from(shares) * unit > self.cash {
            if matches!(sizing, BuySizing::FixedQuantity(_)) {
                return Err(SkipReason::InsufficientCash);
            }
            shares -= 1;
        }
        if shares == 0 {
            return Err(SkipReason::InsufficientCash);
        }
        Ok(shares)
    }
}
