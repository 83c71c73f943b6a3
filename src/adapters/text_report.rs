//! Plain-text portfolio summary.
//!
//! Money is printed with two decimals and returns as percentages with two
//! decimals.

use std::io::Write;

use crate::domain::backtest::{BacktestReport, Holding};
use crate::domain::error::TraderError;
use crate::ports::report_port::ReportPort;

fn percent(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v * 100.0),
        None => "n/a".to_string(),
    }
}

pub fn render(report: &BacktestReport) -> String {
    let result = &report.result;
    let mut out = String::new();

    out.push_str("=== Portfolio Summary ===\n");
    out.push_str(&format!("Cash: ${:.2}\n", result.cash));
    for snapshot in &result.holdings {
        match snapshot.holding {
            Holding::Priced {
                shares,
                last_price,
                market_value,
            } => out.push_str(&format!(
                "{}: {} shares @ ${:.2} = ${:.2}\n",
                snapshot.symbol, shares, last_price, market_value
            )),
            Holding::NoData => out.push_str(&format!("{}: No data\n", snapshot.symbol)),
        }
    }
    out.push_str(&format!("Total Portfolio Value: ${:.2}\n", result.final_value));

    out.push_str("\n=== Trade History ===\n");
    if result.trades.is_empty() {
        out.push_str("(no trades)\n");
    }
    for trade in &result.trades {
        out.push_str(&format!(
            "{} {} {} {} @ ${:.2}\n",
            trade.date, trade.side, trade.shares, trade.symbol, trade.price
        ));
    }

    let cmp = &report.comparison;
    out.push_str(&format!(
        "\n{} Benchmark Return: {}\n",
        cmp.benchmark_symbol,
        percent(cmp.benchmark_return)
    ));
    out.push_str(&format!("Strategy Return: {}\n", percent(cmp.strategy_return)));
    if let Some(excess) = cmp.excess_return() {
        out.push_str(&format!("Excess Return: {}\n", percent(Some(excess))));
    }
    out
}

/// Writes the rendered report to any byte sink (stdout in the binary).
pub struct TextReport<W: Write> {
    out: W,
}

impl<W: Write> TextReport<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ReportPort for TextReport<W> {
    fn write(&mut self, report: &BacktestReport) -> Result<(), TraderError> {
        self.out.write_all(render(report).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::backtest::{BacktestResult, HoldingSnapshot};
    use crate::domain::benchmark::Comparison;
    use crate::domain::position::{Side, TradeRecord};
    use chrono::NaiveDate;

    fn sample_report() -> BacktestReport {
        BacktestReport {
            result: BacktestResult {
                initial_cash: 1000.0,
                cash: 900.0,
                final_value: 1050.0,
                trades: vec![TradeRecord {
                    symbol: "AAPL".into(),
                    side: Side::Buy,
                    shares: 10,
                    price: 10.0,
                    date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                }],
                holdings: vec![
                    HoldingSnapshot {
                        symbol: "AAPL".into(),
                        holding: Holding::Priced {
                            shares: 10,
                            last_price: 15.0,
                            market_value: 150.0,
                        },
                    },
                    HoldingSnapshot {
                        symbol: "CNO".into(),
                        holding: Holding::NoData,
                    },
                ],
            },
            comparison: Comparison {
                benchmark_symbol: "SPY".into(),
                benchmark_return: Some(0.1234),
                strategy_return: Some(0.05),
            },
        }
    }

    #[test]
    fn render_full_layout() {
        let expected = "=== Portfolio Summary ===\n\
            Cash: $900.00\n\
            AAPL: 10 shares @ $15.00 = $150.00\n\
            CNO: No data\n\
            Total Portfolio Value: $1050.00\n\
            \n\
            === Trade History ===\n\
            2024-01-15 BUY 10 AAPL @ $10.00\n\
            \n\
            SPY Benchmark Return: 12.34%\n\
            Strategy Return: 5.00%\n\
            Excess Return: -7.34%\n";
        assert_eq!(render(&sample_report()), expected);
    }

    #[test]
    fn render_summary_lines() {
        let text = render(&sample_report());
        assert!(text.contains("Cash: $900.00"));
        assert!(text.contains("AAPL: 10 shares @ $15.00 = $150.00"));
        assert!(text.contains("CNO: No data"));
        assert!(text.contains("Total Portfolio Value: $1050.00"));
    }

    #[test]
    fn render_trade_history() {
        let text = render(&sample_report());
        assert!(text.contains("=== Trade History ===\n2024-01-15 BUY 10 AAPL @ $10.00"));
    }

    #[test]
    fn render_returns_as_percent() {
        let text = render(&sample_report());
        assert!(text.contains("SPY Benchmark Return: 12.34%"));
        assert!(text.contains("Strategy Return: 5.00%"));
        assert!(text.contains("Excess Return: -7.34%"));
    }

    #[test]
    fn render_missing_benchmark() {
        let mut report = sample_report();
        report.comparison.benchmark_return = None;
        report.result.trades.clear();
        let text = render(&report);
        assert!(text.contains("SPY Benchmark Return: n/a"));
        assert!(text.contains("(no trades)"));
        assert!(!text.contains("Excess Return"));
    }

    #[test]
    fn text_report_writes_to_sink() {
        let mut port = TextReport::new(Vec::new());
        port.write(&sample_report()).unwrap();
        let written = String::from_utf8(port.into_inner()).unwrap();
        assert_eq!(written, render(&sample_report()));
    }
}
