//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use log::{error, info};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::text_report::TextReport;
use crate::domain::backtest::{self as backtest_engine, BacktestConfig, DEFAULT_INITIAL_CASH};
use crate::domain::benchmark::DEFAULT_BENCHMARK;
use crate::domain::config_validation::{parse_date, validate_backtest_config, validate_strategy_config};
use crate::domain::error::TraderError;
use crate::domain::execution::{BuySizing, SellSizing, SizingPolicy, DEFAULT_POSITION_FRACTION};
use crate::domain::indicator::{IndicatorParams, Smoothing, DEFAULT_MOMENTUM_WINDOW};
use crate::domain::signal::{
    SignalConfig, StrategyVariant, DEFAULT_ENTRY_CEILING, DEFAULT_OVERBOUGHT, DEFAULT_STOP_LOSS,
};
use crate::ports::config_port::ConfigPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "trendtrader", about = "Trend/momentum strategy backtester")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a backtest and print the portfolio summary
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory of <SYMBOL>.csv price files (overrides [data] dir)
        #[arg(long)]
        data_dir: Option<PathBuf>,
        /// Comma-separated symbols (overrides [backtest] symbols)
        #[arg(long)]
        symbols: Option<String>,
    },
    /// Validate a configuration file without running it
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            data_dir,
            symbols,
        } => run_backtest(&config, data_dir.as_deref(), symbols.as_deref()),
        Command::Validate { config } => run_validate(&config),
    }
}

fn fail(err: &TraderError) -> ExitCode {
    error!("{err}");
    err.into()
}

/// Config source with `[backtest] symbols` optionally replaced from the CLI.
struct SymbolOverride<'a> {
    inner: &'a dyn ConfigPort,
    symbols: Option<&'a str>,
}

impl ConfigPort for SymbolOverride<'_> {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        match self.symbols {
            Some(symbols) if section == "backtest" && key == "symbols" => Some(symbols.to_string()),
            _ => self.inner.get_string(section, key),
        }
    }

    fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.inner.get_int(section, key, default)
    }

    fn get_double(&self, section: &str, key: &str, default: f64) -> f64 {
        self.inner.get_double(section, key, default)
    }
}

fn run_backtest(config_path: &Path, data_dir: Option<&Path>, symbols: Option<&str>) -> ExitCode {
    info!("Loading config from {}", config_path.display());
    let file_config = match FileConfigAdapter::from_file(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    let adapter = SymbolOverride {
        inner: &file_config,
        symbols,
    };

    let bt_config = match load_backtest_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    let data_dir = resolve_data_dir(data_dir, &adapter, config_path);
    info!("Reading prices from {}", data_dir.display());
    let data_port = CsvAdapter::new(data_dir);

    let report = match backtest_engine::run_with_port(&data_port, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    let mut report_port = TextReport::new(io::stdout().lock());
    if let Err(e) = report_port.write(&report) {
        return fail(&e);
    }
    ExitCode::SUCCESS
}

fn run_validate(config_path: &Path) -> ExitCode {
    info!("Validating {}", config_path.display());
    let adapter = match FileConfigAdapter::from_file(config_path) {
        Ok(a) => a,
        Err(e) => return fail(&e),
    };
    match load_backtest_config(&adapter) {
        Ok(config) => {
            info!(
                "{} on {} symbols, {} to {}, {}({}/{}), benchmark {}",
                config.signal.variant,
                config.symbols.len(),
                config.start_date,
                config.end_date,
                config.indicators.smoothing,
                config.indicators.short_window,
                config.indicators.long_window,
                config.benchmark,
            );
            info!("Configuration is valid.");
            ExitCode::SUCCESS
        }
        Err(e) => fail(&e),
    }
}

/// Validate both config sections, then build the run configuration.
pub fn load_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, TraderError> {
    validate_backtest_config(adapter)?;
    validate_strategy_config(adapter)?;
    build_backtest_config(adapter)
}

/// `--data-dir`, else `[data] dir` relative to the config file, else `data`
/// next to the config file.
pub fn resolve_data_dir(cli_dir: Option<&Path>, config: &dyn ConfigPort, config_path: &Path) -> PathBuf {
    if let Some(dir) = cli_dir {
        return dir.to_path_buf();
    }
    let base = config_path.parent().unwrap_or_else(|| Path::new("."));
    match config.get_string("data", "dir") {
        Some(dir) => base.join(dir),
        None => base.join("data"),
    }
}

fn window(adapter: &dyn ConfigPort, key: &str, default: usize) -> usize {
    usize::try_from(adapter.get_int("strategy", key, default as i64)).unwrap_or(default)
}

fn quantity(adapter: &dyn ConfigPort, key: &str) -> u64 {
    u64::try_from(adapter.get_int("strategy", key, 1)).unwrap_or(1)
}

pub fn build_backtest_config(adapter: &dyn ConfigPort) -> Result<BacktestConfig, TraderError> {
    let start_date = parse_date(adapter, "start_date")?;
    let end_date = parse_date(adapter, "end_date")?;

    let variant = match adapter.get_string("strategy", "variant") {
        Some(name) => StrategyVariant::parse(&name).ok_or_else(|| {
            TraderError::invalid("strategy", "variant", format!("unknown variant '{}'", name))
        })?,
        None => StrategyVariant::default(),
    };
    let smoothing = match adapter.get_string("strategy", "smoothing") {
        Some(name) => Smoothing::parse(&name).ok_or_else(|| {
            TraderError::invalid("strategy", "smoothing", format!("unknown smoothing '{}'", name))
        })?,
        None => Smoothing::default(),
    };

    let stop_loss = adapter.get_double("strategy", "stop_loss", DEFAULT_STOP_LOSS);

    let buy = match adapter.get_string("strategy", "buy_sizing").as_deref() {
        Some(s) if s.eq_ignore_ascii_case("quantity") => {
            BuySizing::FixedQuantity(quantity(adapter, "buy_quantity"))
        }
        _ => BuySizing::FixedFraction(adapter.get_double(
            "strategy",
            "position_fraction",
            DEFAULT_POSITION_FRACTION,
        )),
    };
    let sell = match adapter.get_string("strategy", "sell_sizing").as_deref() {
        Some(s) if s.eq_ignore_ascii_case("quantity") => {
            SellSizing::FixedQuantity(quantity(adapter, "sell_quantity"))
        }
        _ => SellSizing::FullLiquidation,
    };

    Ok(BacktestConfig {
        symbols: adapter.get_symbols("backtest", "symbols"),
        start_date,
        end_date,
        initial_cash: adapter.get_double("backtest", "initial_cash", DEFAULT_INITIAL_CASH),
        benchmark: adapter
            .get_string("backtest", "benchmark")
            .map(|b| b.to_uppercase())
            .unwrap_or_else(|| DEFAULT_BENCHMARK.to_string()),
        indicators: IndicatorParams {
            short_window: window(adapter, "short_window", 20),
            long_window: window(adapter, "long_window", 50),
            momentum_window: window(adapter, "momentum_window", DEFAULT_MOMENTUM_WINDOW),
            smoothing,
        },
        signal: SignalConfig {
            variant,
            stop_loss: (stop_loss > 0.0).then_some(stop_loss),
            overbought: adapter.get_double("strategy", "overbought", DEFAULT_OVERBOUGHT),
            entry_ceiling: adapter.get_double("strategy", "entry_ceiling", DEFAULT_ENTRY_CEILING),
        },
        sizing: SizingPolicy { buy, sell },
    })
}
