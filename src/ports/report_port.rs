//! Report output port trait.

use crate::domain::backtest::BacktestReport;
use crate::domain::error::TraderError;

/// Port for presenting a finished backtest.
pub trait ReportPort {
    fn write(&mut self, report: &BacktestReport) -> Result<(), TraderError>;
}
