//! Volume-Weighted Average Price (VWAP), cumulative from the first candle.
//!
//! VWAP[t] = sum(typical * volume) / max(sum(volume), 1e-9) over candles 0..=t.
//! Lookback: 0.

use super::Indicator;
use crate::domain::Candle;

const MIN_CUMULATIVE_VOLUME: f64 = 1e-9;

#[derive(Debug, Clone, Default)]
pub struct Vwap;

impl Vwap {
    pub fn new() -> Self {
        Self
    }
}

impl Indicator for Vwap {
    fn name(&self) -> &str {
        "vwap"
    }

    fn lookback(&self) -> usize {
        0
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let mut cum_pv = 0.0;
        let mut cum_volume = 0.0;
        candles
            .iter()
            .map(|c| {
                cum_pv += c.typical_price() * c.volume;
                cum_volume += c.volume;
                Some(cum_pv / cum_volume.max(MIN_CUMULATIVE_VOLUME))
            })
            .collect()
    }
}
