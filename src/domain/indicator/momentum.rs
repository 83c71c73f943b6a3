//! RSI-style momentum oscillator.
//!
//! Over the trailing `window` close-to-close changes:
//! gain = mean of positive changes, loss = mean of |negative changes|,
//! value = 100 - 100 / (1 + gain / loss).
//!
//! Plain rolling means (no Wilder smoothing). The first `window` bars are
//! undefined, and so is any bar whose window contains no losses.

use super::IndicatorSeries;

pub fn calculate_momentum(closes: &[f64], window: usize) -> IndicatorSeries {
    let mut values = vec![None; closes.len()];
    if window == 0 || closes.len() <= window {
        return values;
    }

    let changes: Vec<f64> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    for (i, value) in values.iter_mut().enumerate().skip(window) {
        // changes[j] is the move into bar j + 1
        let recent = &changes[i - window..i];
        let gain = recent.iter().filter(|&&c| c > 0.0).sum::<f64>() / window as f64;
        let loss = recent.iter().filter(|&&c| c < 0.0).map(|c| -c).sum::<f64>() / window as f64;
        *value = oscillator(gain, loss);
    }

    values
}

fn oscillator(gain: f64, loss: f64) -> Option<f64> {
    if loss == 0.0 {
        return None;
    }
    let value = 100.0 - 100.0 / (1.0 + gain / loss);
    value.is_finite().then_some(value)
}
