//! Bollinger Bands: moving average +/- standard deviation multiplier.
//!
//! Three bands (separate Indicator instances):
//! - Middle: SMA(close, period)
//! - Upper: middle + mult * stddev(close, period)
//! - Lower: middle - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::{closes, window_mean, Indicator};
use crate::domain::Candle;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Middle,
    Lower,
}

/// All three bands, index-aligned with the input.
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub upper: Vec<Option<f64>>,
    pub middle: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Middle => "middle",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Upper)
    }

    pub fn middle(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Middle)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Lower)
    }

    pub fn bands(&self, candles: &[Candle]) -> BollingerBands {
        bollinger_bands(&closes(candles), self.period, self.multiplier)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, candles: &[Candle]) -> Vec<Option<f64>> {
        let bands = self.bands(candles);
        match self.band {
            BollingerBand::Upper => bands.upper,
            BollingerBand::Middle => bands.middle,
            BollingerBand::Lower => bands.lower,
        }
    }
}

pub fn bollinger_bands(values: &[f64], period: usize, multiplier: f64) -> BollingerBands {
    let n = values.len();
    let mut bands = BollingerBands {
        upper: vec![None; n],
        middle: vec![None; n],
        lower: vec![None; n],
    };

    if period == 0 || n < period {
        return bands;
    }

    for i in (period - 1)..n {
        let window = &values[(i + 1 - period)..=i];
        let mean = window_mean(window);
        let variance = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum::<f64>()
            / period as f64;
        let width = multiplier * variance.sqrt();

        bands.middle[i] = Some(mean);
        bands.upper[i] = Some(mean + width);
        bands.lower[i] = Some(mean - width);
    }

    bands
}
