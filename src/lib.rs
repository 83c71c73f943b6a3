//! trendtrader: daily-bar trend/momentum backtester.
//!
//! Hexagonal architecture: simulation core in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`], process wiring in [`cli`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;
