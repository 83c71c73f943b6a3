#![allow(dead_code)]

use chrono::NaiveDate;
use std::collections::HashMap;
use trendtrader::domain::backtest::BacktestConfig;
use trendtrader::domain::error::TraderError;
use trendtrader::domain::indicator::{IndicatorParams, Smoothing};
pub use trendtrader::domain::price::{PriceBar, PriceSeries};
use trendtrader::ports::data_port::DataPort;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_closes(mut self, symbol: &str, closes: &[f64]) -> Self {
        self.data.insert(symbol.to_string(), make_bars(closes));
        self
    }

    pub fn with_error(mut self, symbol: &str, reason: &str) -> Self {
        self.errors.insert(symbol.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TraderError> {
        if let Some(reason) = self.errors.get(symbol) {
            return Err(TraderError::DataSource {
                symbol: symbol.to_string(),
                reason: reason.clone(),
            });
        }
        let bars = self
            .data
            .get(symbol)
            .map(|bars| {
                bars.iter()
                    .filter(|b| b.date >= start_date && b.date <= end_date)
                    .copied()
                    .collect()
            })
            .unwrap_or_default();
        Ok(PriceSeries::new(symbol, bars))
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day starting 2024-01-01.
pub fn make_bars(closes: &[f64]) -> Vec<PriceBar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| PriceBar {
            date: date(2024, 1, 1) + chrono::Duration::days(i as i64),
            close,
        })
        .collect()
}

pub fn make_series(symbol: &str, closes: &[f64]) -> PriceSeries {
    PriceSeries::new(symbol, make_bars(closes))
}

/// Rises for `up` bars, then falls for `down` bars, with a small zig-zag so
/// the momentum oscillator always has both gains and losses.
pub fn wave(start: f64, up: usize, down: usize) -> Vec<f64> {
    let mut closes = Vec::with_capacity(up + down);
    let mut price = start;
    for i in 0..up + down {
        let drift = if i < up { 0.3 } else { -1.0 };
        let wiggle = if i % 2 == 0 { 1.0 } else { -1.0 };
        price += drift + wiggle;
        closes.push(price);
    }
    closes
}

pub fn sample_config(symbols: &[&str]) -> BacktestConfig {
    let mut config = BacktestConfig::new(
        symbols.iter().map(|s| s.to_string()).collect(),
        date(2024, 1, 1),
        date(2024, 12, 31),
    );
    config.indicators = IndicatorParams {
        short_window: 3,
        long_window: 8,
        momentum_window: 5,
        smoothing: Smoothing::Ema,
    };
    config
}
