//! Buy-and-hold benchmark comparison.

use super::price::PriceSeries;

pub const DEFAULT_BENCHMARK: &str = "SPY";

/// `last / first - 1`. `None` for an empty series or a zero first close.
pub fn benchmark_return(series: &PriceSeries) -> Option<f64> {
    let first = series.first_close()?;
    let last = series.last_close()?;
    if first == 0.0 {
        return None;
    }
    Some(last / first - 1.0)
}

/// `final_value / initial_cash - 1`. `None` when no cash was committed.
pub fn strategy_return(final_value: f64, initial_cash: f64) -> Option<f64> {
    if initial_cash == 0.0 {
        return None;
    }
    Some(final_value / initial_cash - 1.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub benchmark_symbol: String,
    pub benchmark_return: Option<f64>,
    pub strategy_return: Option<f64>,
}

impl Comparison {
    pub fn new(benchmark: &PriceSeries, final_value: f64, initial_cash: f64) -> Self {
        Comparison {
            benchmark_symbol: benchmark.symbol.clone(),
            benchmark_return: benchmark_return(benchmark),
            strategy_return: strategy_return(final_value, initial_cash),
        }
    }

    /// Strategy return minus benchmark return, when both are known.
    pub fn excess_return(&self) -> Option<f64> {
        Some(self.strategy_return? - self.benchmark_return?)
    }
}
