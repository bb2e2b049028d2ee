//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: period - 1 (first value at index period-1).

use super::{closes, window_mean, Indicator};
use crate::domain::Candle;

#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    name: String,
}

impl Sma {
    pub fn new(period: usize) -> Self {
        assert!(period >= 1, "SMA period must be >= 1");
        Self {
            period,
            name: format!("sma_{period}"),
        }
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        sma_of_series(&closes(candles), self.period)
    }
}

/// Rolling mean of an arbitrary series.
pub fn sma_of_series(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let n = values.len();
    let mut result = vec![None; n];

    if period == 0 || n < period {
        return result;
    }

    for (offset, window) in values.windows(period).enumerate() {
        result[offset + period - 1] = Some(window_mean(window));
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_candles, value_at, DEFAULT_EPSILON};

    #[test]
    fn sma_5_basic() {
        let candles = make_candles(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0]);
        let result = Sma::new(5).compute(&candles);

        assert_eq!(result.len(), 7);
        for (i, value) in result.iter().enumerate().take(4) {
            assert!(value.is_none(), "expected warmup at index {i}");
        }
        assert_approx(value_at(&result, 4), 12.0, DEFAULT_EPSILON);
        assert_approx(value_at(&result, 5), 13.0, DEFAULT_EPSILON);
        assert_approx(value_at(&result, 6), 14.0, DEFAULT_EPSILON);
    }

    #[test]
    fn sma_1_is_close() {
        let candles = make_candles(&[100.0, 200.0, 300.0]);
        let result = Sma::new(1).compute(&candles);
        assert_eq!(result, vec![Some(100.0), Some(200.0), Some(300.0)]);
    }

    #[test]
    fn sma_lookback() {
        assert_eq!(Sma::new(20).lookback(), 19);
        assert_eq!(Sma::new(1).lookback(), 0);
    }

    #[test]
    fn sma_flat_window_is_exact() {
        for price in [36.7, 0.3, 19_999.99] {
            let result = sma_of_series(&[price; 30], 20);
            assert!(result[19..].iter().all(|v| *v == Some(price)), "drift at {price}");
        }
    }

    #[test]
    fn sma_too_few_values() {
        let candles = make_candles(&[10.0, 11.0]);
        assert!(Sma::new(5).compute(&candles).iter().all(Option::is_none));
    }
}
