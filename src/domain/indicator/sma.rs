//! Simple Moving Average: arithmetic mean of the trailing `window` closes.
//! Warmup: first (window-1) bars are undefined, as is any bar whose window
//! holds a non-finite close.

use super::IndicatorSeries;

pub fn calculate_sma(closes: &[f64], window: usize) -> IndicatorSeries {
    if window == 0 {
        return vec![None; closes.len()];
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut sum = 0.0;

    for (i, &close) in closes.iter().enumerate() {
        sum += close;
        if i >= window {
            sum -= closes[i - window];
        }
        if !sum.is_finite() {
            // NaN/inf poisons the running sum; rebuild it from the window
            sum = closes[(i + 1).saturating_sub(window)..=i].iter().sum();
        }
        let mean = sum / window as f64;
        if i + 1 >= window && mean.is_finite() {
            values.push(Some(mean));
        } else {
            values.push(None);
        }
    }

    values
}
