//! CSV file data adapter.
//!
//! One file per symbol, `<base_path>/<SYMBOL>.csv`, with a header row naming
//! at least a `date` (YYYY-MM-DD) and a `close` column. Other columns are
//! ignored, so full OHLCV exports load unchanged.

use crate::domain::error::TraderError;
use crate::domain::price::{PriceBar, PriceSeries};
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, symbol: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", symbol))
    }
}

fn column(headers: &csv::StringRecord, name: &str, symbol: &str) -> Result<usize, TraderError> {
    headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(name))
        .ok_or_else(|| TraderError::DataSource {
            symbol: symbol.to_string(),
            reason: format!("missing {} column", name),
        })
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        symbol: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<PriceSeries, TraderError> {
        let path = self.csv_path(symbol);
        if !path.exists() {
            return Ok(PriceSeries::empty(symbol));
        }

        let source_err = |reason: String| TraderError::DataSource {
            symbol: symbol.to_string(),
            reason,
        };

        let mut rdr = csv::Reader::from_path(&path)
            .map_err(|e| source_err(format!("failed to read {}: {}", path.display(), e)))?;
        let headers = rdr
            .headers()
            .map_err(|e| source_err(format!("CSV header error: {}", e)))?
            .clone();
        let date_idx = column(&headers, "date", symbol)?;
        let close_idx = column(&headers, "close", symbol)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| source_err(format!("CSV parse error: {}", e)))?;

            let date_str = record
                .get(date_idx)
                .ok_or_else(|| source_err("missing date value".into()))?;
            let date = NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
                .map_err(|e| source_err(format!("invalid date format: {}", e)))?;

            if date < start_date || date > end_date {
                continue;
            }

            let close: f64 = record
                .get(close_idx)
                .ok_or_else(|| source_err("missing close value".into()))?
                .trim()
                .parse()
                .map_err(|e| source_err(format!("invalid close value: {}", e)))?;
            if !(close.is_finite() && close > 0.0) {
                return Err(source_err(format!("invalid close value {} on {}", close, date)));
            }

            bars.push(PriceBar { date, close });
        }

        Ok(PriceSeries::new(symbol, bars))
    }
}
