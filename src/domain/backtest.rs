//! Backtest runner.
//!
//! Each instrument is replayed on its own, one bar at a time and in the
//! configured order, against a single shared cash balance. Instrument order
//! therefore changes the outcome, and the run is fully deterministic for a
//! given order.

use chrono::NaiveDate;
use log::{info, warn};
use std::collections::HashMap;

use super::benchmark::{Comparison, DEFAULT_BENCHMARK};
use super::error::TraderError;
use super::execution::{ExecutionOutcome, SizingPolicy};
use super::indicator::{compute_indicators, IndicatorParams};
use super::portfolio::Portfolio;
use super::position::TradeRecord;
use super::price::PriceSeries;
use super::signal::{SignalConfig, SignalEngine, SignalInputs};
use crate::ports::data_port::DataPort;

pub const DEFAULT_INITIAL_CASH: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub symbols: Vec<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_cash: f64,
    pub benchmark: String,
    pub indicators: IndicatorParams,
    pub signal: SignalConfig,
    pub sizing: SizingPolicy,
}

impl BacktestConfig {
    /// Bot defaults for `symbols` over `[start_date, end_date]`.
    pub fn new(symbols: Vec<String>, start_date: NaiveDate, end_date: NaiveDate) -> Self {
        BacktestConfig {
            symbols,
            start_date,
            end_date,
            initial_cash: DEFAULT_INITIAL_CASH,
            benchmark: DEFAULT_BENCHMARK.to_string(),
            indicators: IndicatorParams::default(),
            signal: SignalConfig::default(),
            sizing: SizingPolicy::default(),
        }
    }

    /// First bar index at which a decision is attempted.
    pub fn start_index(&self) -> usize {
        self.indicators.short_window.max(self.indicators.long_window)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Holding {
    Priced {
        shares: u64,
        last_price: f64,
        market_value: f64,
    },
    NoData,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HoldingSnapshot {
    pub symbol: String,
    pub holding: Holding,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub initial_cash: f64,
    pub cash: f64,
    pub final_value: f64,
    pub trades: Vec<TradeRecord>,
    /// One entry per configured symbol, in configured order.
    pub holdings: Vec<HoldingSnapshot>,
}

impl BacktestResult {
    pub fn traded_symbols(&self) -> usize {
        self.holdings
            .iter()
            .filter(|h| matches!(h.holding, Holding::Priced { .. }))
            .count()
    }
}

/// Everything the report needs: the run result and the benchmark comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct BacktestReport {
    pub result: BacktestResult,
    pub comparison: Comparison,
}

/// Walk one instrument's bars, feeding each decision to the ledger.
fn replay_instrument(
    series: &PriceSeries,
    engine: &SignalEngine,
    portfolio: &mut Portfolio,
    config: &BacktestConfig,
) -> usize {
    let indicators = compute_indicators(series, &config.indicators);
    let mut fills = 0;

    for (i, bar) in series.bars().iter().enumerate().skip(config.start_index()) {
        let position = portfolio.position(&series.symbol);
        let decision = engine.decide(&SignalInputs {
            short_trend: indicators.short_trend[i],
            long_trend: indicators.long_trend[i],
            momentum: indicators.momentum[i],
            price: bar.close,
            position: &position,
        });
        let outcome = portfolio.execute(decision, &series.symbol, bar.close, bar.date, &config.sizing);
        if matches!(outcome, ExecutionOutcome::Filled(_)) {
            fills += 1;
        }
    }

    fills
}

/// Replay every symbol in `config.symbols` order.
///
/// Symbols missing from `data`, or with an empty series, are reported as
/// [`Holding::NoData`] and skipped. Fails with [`TraderError::NoValidData`]
/// when no symbol has any bars.
pub fn run_backtest(data: &[PriceSeries], config: &BacktestConfig) -> Result<BacktestResult, TraderError> {
    let by_symbol: HashMap<&str, &PriceSeries> =
        data.iter().map(|s| (s.symbol.as_str(), s)).collect();
    let available: Vec<&PriceSeries> = config
        .symbols
        .iter()
        .filter_map(|sym| by_symbol.get(sym.as_str()).copied())
        .filter(|s| !s.is_empty())
        .collect();

    if available.is_empty() {
        return Err(TraderError::NoValidData);
    }

    let engine = SignalEngine::new(&config.signal);
    let mut portfolio = Portfolio::new(config.initial_cash);

    for series in &available {
        let fills = replay_instrument(series, &engine, &mut portfolio, config);
        info!(
            "{}: {} bars replayed, {} trades",
            series.symbol,
            series.len(),
            fills
        );
    }

    let mut last_prices = HashMap::new();
    let mut holdings = Vec::with_capacity(config.symbols.len());
    for symbol in &config.symbols {
        let last = by_symbol.get(symbol.as_str()).and_then(|s| s.last_close());
        let holding = match last {
            Some(last_price) => {
                last_prices.insert(symbol.clone(), last_price);
                let shares = portfolio.position(symbol).shares;
                Holding::Priced {
                    shares,
                    last_price,
                    market_value: shares as f64 * last_price,
                }
            }
            None => Holding::NoData,
        };
        holdings.push(HoldingSnapshot {
            symbol: symbol.clone(),
            holding,
        });
    }

    let final_value = portfolio.total_value(&last_prices);
    let cash = portfolio.cash();
    Ok(BacktestResult {
        initial_cash: config.initial_cash,
        cash,
        final_value,
        trades: portfolio.into_trades(),
        holdings,
    })
}

fn fetch_or_empty(port: &dyn DataPort, symbol: &str, config: &BacktestConfig) -> PriceSeries {
    match port.fetch_prices(symbol, config.start_date, config.end_date) {
        Ok(series) => {
            if series.is_empty() {
                warn!("no data for {symbol}");
            }
            series
        }
        Err(e) => {
            warn!("skipping {symbol} ({e})");
            PriceSeries::empty(symbol)
        }
    }
}

/// Fetch every symbol and the benchmark through `port`, run the backtest and
/// compare the outcome with buy-and-hold of the benchmark.
pub fn run_with_port(port: &dyn DataPort, config: &BacktestConfig) -> Result<BacktestReport, TraderError> {
    info!(
        "Running backtest: {} symbols, {} to {}",
        config.symbols.len(),
        config.start_date,
        config.end_date
    );

    let data: Vec<PriceSeries> = config
        .symbols
        .iter()
        .map(|symbol| fetch_or_empty(port, symbol, config))
        .collect();

    let result = run_backtest(&data, config)?;

    let benchmark = fetch_or_empty(port, &config.benchmark, config);
    let comparison = Comparison::new(&benchmark, result.final_value, result.initial_cash);

    Ok(BacktestReport { result, comparison })
}
