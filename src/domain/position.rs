//! Per-instrument holdings and trade records.

use chrono::NaiveDate;
use std::fmt;

/// Long-only holding. `avg_cost` is 0 whenever `shares` is 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub shares: u64,
    pub avg_cost: f64,
}

impl Position {
    pub fn is_open(&self) -> bool {
        self.shares > 0
    }

    pub fn market_value(&self, price: f64) -> f64 {
        self.shares as f64 * price
    }

    /// True when an open position trades below `avg_cost * fraction`.
    pub fn breaches_stop(&self, price: f64, fraction: f64) -> bool {
        self.is_open() && price < self.avg_cost * fraction
    }

    pub(crate) fn add(&mut self, shares: u64, price: f64) {
        let total_cost = self.avg_cost * self.shares as f64 + shares as f64 * price;
        self.shares += shares;
        self.avg_cost = total_cost / self.shares as f64;
    }

    pub(crate) fn remove(&mut self, shares: u64) {
        self.shares -= shares;
        if self.shares == 0 {
            self.avg_cost = 0.0;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "BUY"),
            Side::Sell => write!(f, "SELL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TradeRecord {
    pub symbol: String,
    pub side: Side,
    pub shares: u64,
    pub price: f64,
    pub date: NaiveDate,
}

impl TradeRecord {
    pub fn notional(&self) -> f64 {
        self.shares as f64 * self.price
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn held(shares: u64, avg_cost: f64) -> Position {
        Position { shares, avg_cost }
    }

    #[test]
    fn default_is_flat() {
        let pos = Position::default();
        assert!(!pos.is_open());
        assert_eq!(pos.avg_cost, 0.0);
    }

    #[test]
    fn market_value_marks_shares() {
        let pos = held(100, 50.0);
        assert!((pos.market_value(55.0) - 5500.0).abs() < f64::EPSILON);
        assert_eq!(Position::default().market_value(55.0), 0.0);
    }

    #[test]
    fn add_weights_average_cost() {
        let mut pos = held(10, 10.0);
        pos.add(10, 20.0);
        assert_eq!(pos.shares, 20);
        assert!((pos.avg_cost - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn add_to_flat_position_uses_fill_price() {
        let mut pos = Position::default();
        pos.add(7, 12.5);
        assert_eq!(pos.shares, 7);
        assert!((pos.avg_cost - 12.5).abs() < f64::EPSILON);
    }

    #[test]
    fn remove_all_resets_cost() {
        let mut pos = held(10, 10.0);
        pos.remove(4);
        assert_eq!(pos.shares, 6);
        assert!((pos.avg_cost - 10.0).abs() < f64::EPSILON);
        pos.remove(6);
        assert_eq!(pos.shares, 0);
        assert_eq!(pos.avg_cost, 0.0);
    }

    #[test]
    fn stop_breach() {
        let pos = held(10, 10.0);
        assert!(pos.breaches_stop(8.0, 0.9));
        assert!(!pos.breaches_stop(9.0, 0.9));
        assert!(!pos.breaches_stop(9.5, 0.9));
        assert!(!Position::default().breaches_stop(0.01, 0.9));
    }

    #[test]
    fn side_display() {
        assert_eq!(Side::Buy.to_string(), "BUY");
        assert_eq!(Side::Sell.to_string(), "SELL");
    }

    #[test]
    fn trade_notional() {
        let trade = TradeRecord {
            symbol: "AAPL".into(),
            side: Side::Buy,
            shares: 10,
            price: 12.5,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        };
        assert!((trade.notional() - 125.0).abs() < f64::EPSILON);
    }
}
