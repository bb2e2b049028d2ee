//! Relative Strength Index (RSI).
//!
//! Uses Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: period.
//! Edge cases: avg_loss == 0 → RSI = 100; avg_gain == 0 → RSI = 0; both zero → 50.

use super::{closes, Indicator};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    name: String,
}

impl Rsi {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "RSI period must be >= 1");
        Self {
            period,
            name: format!("rsi_{period}"),
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        rsi_of_series(&closes(candles), self.period)
    }
}

pub fn rsi_of_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period + 1 {
        return result;
    }

    let changes: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();

    // Seed: simple mean of the first `period` changes
    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for &ch in &changes[..period] {
        if ch > 0.0 {
            avg_gain += ch;
        } else {
            avg_loss -= ch;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;

    result[period] = Some(compute_rsi(avg_gain, avg_loss));

    let p = period as f64;
    for i in (period + 1)..n {
        let ch = changes[i - 1];
        let gain = ch.max(0.0);
        let loss = (-ch).max(0.0);

        avg_gain = (avg_gain * (p - 1.0) + gain) / p;
        avg_loss = (avg_loss * (p - 1.0) + loss) / p;

        result[i] = Some(compute_rsi(avg_gain, avg_loss));
    }

    result
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        (100.0 - 100.0 / (1.0 + avg_gain / avg_loss)).clamp(0.0, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, value_at};

    #[test]
    fn rsi_all_gains() {
        let candles = make_candles(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        let result = Rsi::new(3).compute(&candles);
        assert_approx(value_at(&result, 3), 100.0, 1e-6);
        assert_approx(value_at(&result, 5), 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let candles = make_candles(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        let result = Rsi::new(3).compute(&candles);
        assert_approx(value_at(&result, 3), 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_is_neutral() {
        let candles = make_candles(&[50.0; 10]);
        let result = Rsi::new(3).compute(&candles);
        assert_approx(value_at(&result, 9), 50.0, 1e-12);
    }

    #[test]
    fn rsi_mixed_known_value() {
        // Changes: +0.34, -0.25, -0.48
        // avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100/(1 + 0.34/0.73) = 31.7757...
        let candles = make_candles(&[44.0, 44.34, 44.09, 43.61, 44.33]);
        let result = Rsi::new(3).compute(&candles);

        assert!(result[..3].iter().all(Option::is_none));
        assert_approx(value_at(&result, 3), 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-9);

        // Wilder step with +0.72
        let g = (0.34 / 3.0 * 2.0 + 0.72) / 3.0;
        let l = (0.73 / 3.0 * 2.0) / 3.0;
        assert_approx(value_at(&result, 4), 100.0 - 100.0 / (1.0 + g / l), 1e-9);
    }

    #[test]
    fn rsi_bounds() {
        let candles = make_candles(&[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0]);
        let result = Rsi::new(3).compute(&candles);
        for (i, v) in result.iter().enumerate() {
            if let Some(v) = v {
                assert!((0.0..=100.0).contains(v), "RSI out of bounds at {i}: {v}");
            }
        }
    }

    #[test]
    fn rsi_too_short() {
        let candles = make_candles(&[1.0, 2.0, 3.0]);
        assert!(Rsi::new(3).compute(&candles).iter().all(Option::is_none));
    }

    #[test]
    fn rsi_lookback() {
        assert_eq!(Rsi::new(14).lookback(), 14);
    }
}
