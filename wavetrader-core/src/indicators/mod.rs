//! Indicator implementations and the per-candle indicator frame.
//!
//! Indicators are pure functions: candle history in, optional numeric series
//! out. `None` marks warmup (not enough lookback yet) and is never confused
//! with a computed zero. Everything is computed once over the full series per
//! analysis call; nothing is carried between calls.
//!
//! Multi-series indicators (MACD, Bollinger) are exposed as separate named
//! instances per line, keeping the single-series `Indicator` trait unchanged.
//! The frame builder computes their lines in one pass instead.

pub mod bollinger;
pub mod ema;
pub mod frame;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod volatility;
pub mod vwap;

pub use bollinger::{Bollinger, BollingerBand, BollingerBands};
pub use ema::Ema;
pub use frame::{IndicatorFrame, IndicatorRow};
pub use macd::{Macd, MacdLine, MacdLines};
pub use rsi::Rsi;
pub use sma::Sma;
pub use volatility::pct_change_volatility;
pub use vwap::Vwap;

use crate::domain::Candle;

/// Trait for indicators.
///
/// Implementations take a full candle series and produce an output series of
/// the same length. The first `lookback()` values are `None` (warmup).
///
/// # Look-ahead guard
/// No indicator value at index t may depend on data from index t+1 or later.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_20", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading positions that are `None`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire candle series.
    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>>;
}

pub(crate) fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Arithmetic mean of a non-empty window, clamped to the window's range.
///
/// Summation error can push the raw mean of a constant window an ulp away
/// from the constant; the clamp pins it back.
pub(crate) fn window_mean(window: &[f64]) -> f64 {
    let (min, max) = window
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    let mean = window.iter().sum::<f64>() / window.len() as f64;
    mean.clamp(min, max)
}

/// Create synthetic candles from close prices for testing.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000,
/// one-minute spacing.
#[cfg(test)]
pub fn make_candles(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Candle {
                timestamp: 1_700_000_000_000 + i as i64 * 60_000,
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Candles that never move: every price field equals `price`.
#[cfg(test)]
pub fn make_flat_candles(price: f64, n: usize) -> Vec<Candle> {
    (0..n)
        .map(|i| Candle {
            timestamp: 1_700_000_000_000 + i as i64 * 60_000,
            open: price,
            high: price,
            low: price,
            close: price,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Unwrap a present value, failing loudly on warmup positions.
#[cfg(test)]
pub fn value_at(series: &[Option<f64>], index: usize) -> f64 {
    series[index].unwrap_or_else(|| panic!("expected a value at index {index}"))
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
