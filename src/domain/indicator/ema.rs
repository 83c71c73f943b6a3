//! Exponential Moving Average.
//!
//! α = 2/(span+1), EMA[0] = C[0], then EMA[i] = C[i]*α + EMA[i-1]*(1-α).
//! Seeded with the first close, so every bar is defined. A non-finite close
//! leaves its bar undefined and the average carries over to the next bar.

use super::IndicatorSeries;

pub fn calculate_ema(closes: &[f64], span: usize) -> IndicatorSeries {
    if span == 0 {
        return vec![None; closes.len()];
    }

    let alpha = 2.0 / (span as f64 + 1.0);
    let mut values = Vec::with_capacity(closes.len());
    let mut ema: Option<f64> = None;

    for &close in closes {
        let next = match ema {
            None => close,
            Some(prev) => close * alpha + prev * (1.0 - alpha),
        };
        if next.is_finite() {
            ema = Some(next);
            values.push(ema);
        } else {
            values.push(None);
        }
    }

    values
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn ema_known_sequence_span_2() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 2);
        let values: Vec<f64> = series.into_iter().map(Option::unwrap).collect();
        assert_abs_diff_eq!(values[0], 10.0, epsilon = 1e-3);
        assert_abs_diff_eq!(values[1], 16.667, epsilon = 1e-3);
        assert_abs_diff_eq!(values[2], 25.556, epsilon = 1e-3);
    }

    #[test]
    fn ema_seeded_with_first_close() {
        let series = calculate_ema(&[42.0, 50.0], 20);
        assert_eq!(series[0], Some(42.0));
    }

    #[test]
    fn ema_span_1_tracks_close() {
        let series = calculate_ema(&[10.0, 20.0, 30.0], 1);
        assert_eq!(series, vec![Some(10.0), Some(20.0), Some(30.0)]);
    }

    #[test]
    fn ema_equal_prices() {
        let series = calculate_ema(&[100.0; 5], 3);
        for v in series {
            assert_abs_diff_eq!(v.unwrap(), 100.0, epsilon = f64::EPSILON);
        }
    }

    #[test]
    fn ema_recursive_calculation() {
        let closes = [10.0, 20.0, 30.0, 40.0];
        let series = calculate_ema(&closes, 3);
        let k = 2.0 / 4.0;
        let mut expected = 10.0;
        for (i, &c) in closes.iter().enumerate().skip(1) {
            expected = c * k + expected * (1.0 - k);
            assert_abs_diff_eq!(series[i].unwrap(), expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn ema_empty_closes() {
        assert!(calculate_ema(&[], 3).is_empty());
    }

    #[test]
    fn ema_skips_non_finite_closes() {
        let series = calculate_ema(&[10.0, f64::NAN, 20.0, f64::INFINITY, 30.0], 2);
        assert_eq!(series[1], None);
        assert_eq!(series[3], None);
        // the NaN and infinite bars are skipped, so this matches [10, 20, 30]
        assert_abs_diff_eq!(series[2].unwrap(), 16.667, epsilon = 1e-3);
        assert_abs_diff_eq!(series[4].unwrap(), 25.556, epsilon = 1e-3);
    }

    #[test]
    fn ema_span_0_is_undefined() {
        assert_eq!(calculate_ema(&[10.0, 20.0], 0), vec![None, None]);
    }
}
