//! Headline metrics for the latest candle.

use serde::{Deserialize, Serialize};

use crate::domain::CandleSeries;
use crate::indicators::IndicatorFrame;
use crate::signal::RsiBand;

/// Trailing window for the average volume comparison.
pub const VOLUME_AVERAGE_WINDOW: usize = 20;

/// RSI shown when the frame has no value yet.
pub const NEUTRAL_RSI: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub timestamp: i64,
    pub price: f64,
    /// Close-to-close change of the last candle, in percent.
    pub price_change_pct: Option<f64>,
    pub rsi: f64,
    pub rsi_band: RsiBand,
    pub volume: f64,
    /// Last volume relative to the trailing average, in percent (+25.0 = 25% above).
    pub volume_vs_average_pct: Option<f64>,
}

impl MarketSnapshot {
    pub fn from_series(series: &CandleSeries, frame: Option<&IndicatorFrame>) -> Self {
        let candles = series.as_slice();
        let last = series.last();

        let price_change_pct = candles
            .len()
            .checked_sub(2)
            .map(|i| candles[i].close)
            .filter(|prev| *prev != 0.0)
            .map(|prev| (last.close - prev) / prev * 100.0);

        let rsi = frame
            .and_then(|f| f.latest().rsi)
            .unwrap_or(NEUTRAL_RSI);

        let window = &candles[candles.len().saturating_sub(VOLUME_AVERAGE_WINDOW)..];
        let avg_volume = window.iter().map(|c| c.volume).sum::<f64>() / window.len() as f64;
        let volume_vs_average_pct =
            (avg_volume > 0.0).then(|| (last.volume / avg_volume - 1.0) * 100.0);

        Self {
            timestamp: last.timestamp,
            price: last.close,
            price_change_pct,
            rsi,
            rsi_band: RsiBand::of(rsi),
            volume: last.volume,
            volume_vs_average_pct,
        }
    }
}
