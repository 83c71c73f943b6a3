//! Configuration validation.
//!
//! Checks every field before a backtest runs so the simulation itself never
//! sees a nonsensical parameter.

use crate::domain::error::TraderError;
use crate::domain::indicator::Smoothing;
use crate::domain::signal::StrategyVariant;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::str::FromStr;

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_initial_cash(config)?;
    validate_dates(config)?;
    validate_symbols(config)?;
    Ok(())
}

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), TraderError> {
    validate_names(config)?;
    validate_windows(config)?;
    validate_thresholds(config)?;
    validate_stop_loss(config)?;
    validate_sizing(config)?;
    Ok(())
}

/// Value of `section.key` parsed as `T`, or `default` when the key is absent.
/// A present value that does not parse is `ConfigInvalid`.
fn parsed<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: T,
) -> Result<T, TraderError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.parse().map_err(|_| {
            TraderError::invalid(section, key, format!("'{}' is not a valid number", raw))
        }),
    }
}

fn validate_initial_cash(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value: f64 = parsed(config, "backtest", "initial_cash", 100_000.0)?;
    if !(value.is_finite() && value > 0.0) {
        return Err(TraderError::invalid(
            "backtest",
            "initial_cash",
            "initial_cash must be positive",
        ));
    }
    Ok(())
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let start_date = parse_date(config, "start_date")?;
    let end_date = parse_date(config, "end_date")?;

    if start_date >= end_date {
        return Err(TraderError::invalid(
            "backtest",
            "start_date",
            "start_date must be before end_date",
        ));
    }
    Ok(())
}

pub fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<NaiveDate, TraderError> {
    match config.get_string("backtest", field) {
        None => Err(TraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: field.to_string(),
        }),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d").map_err(|_| {
            TraderError::invalid(
                "backtest",
                field,
                format!("invalid {} format, expected YYYY-MM-DD", field),
            )
        }),
    }
}

fn validate_symbols(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let symbols = config.get_symbols("backtest", "symbols");
    if symbols.is_empty() {
        return Err(TraderError::ConfigMissing {
            section: "backtest".to_string(),
            key: "symbols".to_string(),
        });
    }
    let mut seen = HashSet::new();
    for symbol in &symbols {
        if !seen.insert(symbol) {
            return Err(TraderError::invalid(
                "backtest",
                "symbols",
                format!("duplicate symbol {}", symbol),
            ));
        }
    }
    Ok(())
}

fn validate_names(config: &dyn ConfigPort) -> Result<(), TraderError> {
    if let Some(name) = config.get_string("strategy", "variant") {
        if StrategyVariant::parse(&name).is_none() {
            return Err(TraderError::invalid(
                "strategy",
                "variant",
                format!("unknown variant '{}' (expected trend_momentum or crossover)", name),
            ));
        }
    }
    if let Some(name) = config.get_string("strategy", "smoothing") {
        if Smoothing::parse(&name).is_none() {
            return Err(TraderError::invalid(
                "strategy",
                "smoothing",
                format!("unknown smoothing '{}' (expected ema or sma)", name),
            ));
        }
    }
    Ok(())
}

fn validate_windows(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let short: i64 = parsed(config, "strategy", "short_window", 20)?;
    let long: i64 = parsed(config, "strategy", "long_window", 50)?;
    let momentum: i64 = parsed(config, "strategy", "momentum_window", 14)?;

    for (key, value) in [
        ("short_window", short),
        ("long_window", long),
        ("momentum_window", momentum),
    ] {
        if value < 1 {
            return Err(TraderError::invalid(
                "strategy",
                key,
                format!("{} must be at least 1", key),
            ));
        }
    }
    if short >= long {
        return Err(TraderError::invalid(
            "strategy",
            "short_window",
            "short_window must be less than long_window",
        ));
    }
    Ok(())
}

fn validate_thresholds(config: &dyn ConfigPort) -> Result<(), TraderError> {
    for (key, default) in [("overbought", 80.0), ("entry_ceiling", 70.0)] {
        let value: f64 = parsed(config, "strategy", key, default)?;
        if !(0.0..=100.0).contains(&value) {
            return Err(TraderError::invalid(
                "strategy",
                key,
                format!("{} must be between 0 and 100", key),
            ));
        }
    }
    Ok(())
}

fn validate_stop_loss(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let value: f64 = parsed(config, "strategy", "stop_loss", 0.9)?;
    if !(0.0..1.0).contains(&value) {
        return Err(TraderError::invalid(
            "strategy",
            "stop_loss",
            "stop_loss must be a fraction in [0, 1) (0 disables it)",
        ));
    }
    Ok(())
}

fn validate_sizing(config: &dyn ConfigPort) -> Result<(), TraderError> {
    let buy = config
        .get_string("strategy", "buy_sizing")
        .unwrap_or_else(|| "fraction".to_string());
    match buy.to_lowercase().as_str() {
        "fraction" => {
            let fraction: f64 = parsed(config, "strategy", "position_fraction", 0.1)?;
            if !(fraction > 0.0 && fraction <= 1.0) {
                return Err(TraderError::invalid(
                    "strategy",
                    "position_fraction",
                    "position_fraction must be in (0, 1]",
                ));
            }
        }
        "quantity" => validate_quantity(config, "buy_quantity")?,
        other => {
            return Err(TraderError::invalid(
                "strategy",
                "buy_sizing",
                format!("unknown buy_sizing '{}' (expected fraction or quantity)", other),
            ));
        }
    }

    let sell = config
        .get_string("strategy", "sell_sizing")
        .unwrap_or_else(|| "all".to_string());
    match sell.to_lowercase().as_str() {
        "all" => {}
        "quantity" => validate_quantity(config, "sell_quantity")?,
        other => {
            return Err(TraderError::invalid(
                "strategy",
                "sell_sizing",
                format!("unknown sell_sizing '{}' (expected all or quantity)", other),
            ));
        }
    }
    Ok(())
}

fn validate_quantity(config: &dyn ConfigPort, key: &str) -> Result<(), TraderError> {
    if parsed::<i64>(config, "strategy", key, 0)? < 1 {
        return Err(TraderError::invalid(
            "strategy",
            key,
            format!("{} must be at least 1", key),
        ));
    }
    Ok(())
}
