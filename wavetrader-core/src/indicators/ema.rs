//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2 / (period + 1).
//! Seed: EMA[period-1] = SMA of the first `period` closes.
//! Lookback: period - 1.

use super::{closes, window_mean, Indicator};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    name: String,
}

impl Ema {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "EMA period must be >= 1");
        Self {
            period,
            name: format!("ema_{period}"),
        }
    }

    pub fn alpha(&self) -> f64 {
        smoothing_factor(self.period)
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        ema_of_series(&closes(candles), self.period)
    }
}

fn smoothing_factor(period: usize) -> f64 {
    2.0 / (period as f64 + 1.0)
}

/// Compute EMA values from a pre-extracted f64 slice.
pub fn ema_of_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    let alpha = smoothing_factor(period);

    let seed = window_mean(&values[..period]);
    result[period - 1] = Some(seed);

    let mut prev = seed;
    for i in period..n {
        // Same recurrence, written so a value equal to `prev` leaves it unchanged.
        let ema = prev + alpha * (values[i] - prev);
        result[i] = Some(ema);
        prev = ema;
    }

    result
}

/// EMA over a series that itself has a warmup prefix (e.g. the MACD line).
///
/// Leading `None`s are skipped and the seed is the SMA of the first `period`
/// defined values. A gap after the first defined value ends the output.
pub fn ema_of_optional(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    let Some(start) = values.iter().position(Option::is_some) else {
        return result;
    };

    let defined: Vec<f64> = values[start..].iter().map_while(|v| *v).collect();
    for (offset, value) in ema_of_series(&defined, period).into_iter().enumerate() {
        result[start + offset] = value;
    }

    result
}
