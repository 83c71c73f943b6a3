//! Simulation core: indicators, signals, ledger, runner and benchmark.

pub mod price;
pub mod position;
pub mod portfolio;
pub mod execution;
pub mod indicator;
pub mod signal;
pub mod backtest;
pub mod benchmark;
pub mod config_validation;
pub mod error;
