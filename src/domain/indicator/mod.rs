//! Technical indicators derived from a closing price series.
//!
//! Every indicator returns an [`IndicatorSeries`]: one `Option<f64>` per source
//! bar, `None` while the lookback window has not filled or when the value is
//! mathematically undefined (e.g. a momentum bar with no losses).

pub mod ema;
pub mod momentum;
pub mod sma;

use std::fmt;

use crate::domain::price::PriceSeries;

pub type IndicatorSeries = Vec<Option<f64>>;

pub const DEFAULT_MOMENTUM_WINDOW: usize = 14;

/// Trend smoothing applied to the short and long windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Smoothing {
    #[default]
    Ema,
    Sma,
}

impl Smoothing {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "ema" => Some(Smoothing::Ema),
            "sma" => Some(Smoothing::Sma),
            _ => None,
        }
    }
}

impl fmt::Display for Smoothing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Smoothing::Ema => write!(f, "EMA"),
            Smoothing::Sma => write!(f, "SMA"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorParams {
    pub short_window: usize,
    pub long_window: usize,
    pub momentum_window: usize,
    pub smoothing: Smoothing,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        IndicatorParams {
            short_window: 20,
            long_window: 50,
            momentum_window: DEFAULT_MOMENTUM_WINDOW,
            smoothing: Smoothing::Ema,
        }
    }
}

/// Indicator set consumed by the signal engine, aligned with the source bars.
#[derive(Debug, Clone, PartialEq)]
pub struct Indicators {
    pub short_trend: IndicatorSeries,
    pub long_trend: IndicatorSeries,
    pub momentum: IndicatorSeries,
}

impl Indicators {
    pub fn len(&self) -> usize {
        self.short_trend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short_trend.is_empty()
    }
}

fn trend(closes: &[f64], window: usize, smoothing: Smoothing) -> IndicatorSeries {
    match smoothing {
        Smoothing::Ema => ema::calculate_ema(closes, window),
        Smoothing::Sma => sma::calculate_sma(closes, window),
    }
}

pub fn compute_indicators(series: &PriceSeries, params: &IndicatorParams) -> Indicators {
    let closes = series.closes();
    Indicators {
        short_trend: trend(&closes, params.short_window, params.smoothing),
        long_trend: trend(&closes, params.long_window, params.smoothing),
        momentum: momentum::calculate_momentum(&closes, params.momentum_window),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceBar;
    use chrono::NaiveDate;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PriceBar {
                date: start + chrono::Duration::days(i as i64),
                close,
            })
            .collect();
        PriceSeries::new("TEST", bars)
    }

    #[test]
    fn smoothing_parse() {
        assert_eq!(Smoothing::parse("ema"), Some(Smoothing::Ema));
        assert_eq!(Smoothing::parse(" SMA "), Some(Smoothing::Sma));
        assert_eq!(Smoothing::parse("wma"), None);
    }

    #[test]
    fn smoothing_display() {
        assert_eq!(Smoothing::Ema.to_string(), "EMA");
        assert_eq!(Smoothing::Sma.to_string(), "SMA");
    }

    #[test]
    fn all_series_align_with_source() {
        let s = series(&[10.0, 11.0, 12.0, 11.0, 13.0, 14.0, 12.0]);
        let params = IndicatorParams {
            short_window: 2,
            long_window: 3,
            momentum_window: 3,
            smoothing: Smoothing::Sma,
        };
        let ind = compute_indicators(&s, &params);
        assert_eq!(ind.len(), s.len());
        assert_eq!(ind.long_trend.len(), s.len());
        assert_eq!(ind.momentum.len(), s.len());
    }

    #[test]
    fn empty_series_gives_empty_indicators() {
        let s = PriceSeries::empty("NONE");
        let ind = compute_indicators(&s, &IndicatorParams::default());
        assert!(ind.is_empty());
        assert!(ind.momentum.is_empty());
    }

    #[test]
    fn smoothing_selects_trend_calculation() {
        let s = series(&[10.0, 20.0, 30.0]);
        let base = IndicatorParams {
            short_window: 2,
            long_window: 3,
            momentum_window: 14,
            smoothing: Smoothing::Ema,
        };
        let ema = compute_indicators(&s, &base);
        assert!(ema.long_trend.iter().all(Option::is_some));

        let sma = compute_indicators(
            &s,
            &IndicatorParams {
                smoothing: Smoothing::Sma,
                ..base
            },
        );
        assert_eq!(sma.long_trend, vec![None, None, Some(20.0)]);
    }

    #[test]
    fn long_windows_leave_momentum_undefined() {
        let s = series(&[10.0, 11.0, 9.0, 12.0]);
        let ind = compute_indicators(&s, &IndicatorParams::default());
        assert!(ind.momentum.iter().all(Option::is_none));
    }
}
