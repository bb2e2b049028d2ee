//! IndicatorFrame: every indicator the analysis uses, index-aligned with the
//! candle series.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bollinger::bollinger_bands;
use super::macd::macd_lines;
use super::{Ema, Indicator, Rsi, Vwap};
use crate::config::{AnalysisConfig, MIN_RSI_PERIOD};
use crate::domain::CandleSeries;
use crate::error::AnalysisError;

/// Fewest candles for which the frame is computed at all.
pub const MIN_FRAME_CANDLES: usize = 20;

pub const EMA_FAST_PERIOD: usize = 20;
pub const EMA_SLOW_PERIOD: usize = 50;
pub const MACD_FAST_PERIOD: usize = 12;
pub const MACD_SLOW_PERIOD: usize = 26;
pub const MACD_SIGNAL_PERIOD: usize = 9;
pub const BOLLINGER_PERIOD: usize = 20;
pub const BOLLINGER_MULTIPLIER: f64 = 2.0;

/// Fixed set of indicator columns. Each column has one entry per candle;
/// `None` means the indicator is still warming up at that index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorFrame {
    pub rsi: Vec<Option<f64>>,
    pub ema20: Vec<Option<f64>>,
    pub ema50: Vec<Option<f64>>,
    pub macd: Vec<Option<f64>>,
    pub macd_signal: Vec<Option<f64>>,
    pub macd_histogram: Vec<Option<f64>>,
    pub bb_upper: Vec<Option<f64>>,
    pub bb_middle: Vec<Option<f64>>,
    pub bb_lower: Vec<Option<f64>>,
    pub vwap: Vec<Option<f64>>,
}

/// Indicator values at a single candle index.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorRow {
    pub rsi: Option<f64>,
    pub ema20: Option<f64>,
    pub ema50: Option<f64>,
    pub macd: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bb_upper: Option<f64>,
    pub bb_middle: Option<f64>,
    pub bb_lower: Option<f64>,
    pub vwap: Option<f64>,
}

impl IndicatorFrame {
    /// Compute every indicator over the full series.
    ///
    /// Fails with `InsufficientData` below [`MIN_FRAME_CANDLES`]; callers treat
    /// that as "indicators unavailable". An RSI period below two is rejected
    /// as malformed input.
    pub fn compute(
        series: &CandleSeries,
        config: &AnalysisConfig,
    ) -> Result<Self, AnalysisError> {
        if config.rsi_period < MIN_RSI_PERIOD {
            return Err(AnalysisError::malformed(format!(
                "rsi_period must be >= {MIN_RSI_PERIOD}, got {}",
                config.rsi_period
            )));
        }
        if series.len() < MIN_FRAME_CANDLES {
            return Err(AnalysisError::InsufficientData {
                required: MIN_FRAME_CANDLES,
                actual: series.len(),
            });
        }

        let candles = series.as_slice();
        let closes = series.closes();

        let macd = macd_lines(
            &closes,
            MACD_FAST_PERIOD,
            MACD_SLOW_PERIOD,
            MACD_SIGNAL_PERIOD,
        );
        let bands = bollinger_bands(&closes, BOLLINGER_PERIOD, BOLLINGER_MULTIPLIER);

        let frame = Self {
            rsi: Rsi::new(config.rsi_period).compute(candles),
            ema20: Ema::new(EMA_FAST_PERIOD).compute(candles),
            ema50: Ema::new(EMA_SLOW_PERIOD).compute(candles),
            macd: macd.macd,
            macd_signal: macd.signal,
            macd_histogram: macd.histogram,
            bb_upper: bands.upper,
            bb_middle: bands.middle,
            bb_lower: bands.lower,
            vwap: Vwap::new().compute(candles),
        };

        debug!(
            candles = series.len(),
            rsi_period = config.rsi_period,
            "computed indicator frame"
        );

        Ok(frame)
    }

    /// Number of rows (equals the candle count).
    pub fn len(&self) -> usize {
        self.rsi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rsi.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<IndicatorRow> {
        // Columns are public, so a hand-built or deserialized frame may be ragged.
        Some(IndicatorRow {
            rsi: *self.rsi.get(index)?,
            ema20: *self.ema20.get(index)?,
            ema50: *self.ema50.get(index)?,
            macd: *self.macd.get(index)?,
            macd_signal: *self.macd_signal.get(index)?,
            macd_histogram: *self.macd_histogram.get(index)?,
            bb_upper: *self.bb_upper.get(index)?,
            bb_middle: *self.bb_middle.get(index)?,
            bb_lower: *self.bb_lower.get(index)?,
            vwap: *self.vwap.get(index)?,
        })
    }

    /// Row for the most recent candle.
    pub fn latest(&self) -> IndicatorRow {
        self.len()
            .checked_sub(1)
            .and_then(|i| self.row(i))
            .unwrap_or_default()
    }
}
