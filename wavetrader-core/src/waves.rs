//! Simplified wave segmentation from local price extrema.
//!
//! This is a local-extrema heuristic, not an Elliott-wave count. A candle
//! whose high strictly exceeds both neighbours is a high peak (tagged as an
//! impulse point); one whose low is strictly below both neighbours is a low
//! peak (tagged as a correction point). `CurrentWaveState` is only the
//! balance of those peaks over the trailing window, a coarse trend proxy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::Candle;

/// Number of trailing candles inspected for the current wave state.
pub const WAVE_WINDOW: usize = 20;

/// Tag attached to an extremum candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaveLabel {
    Impulse,
    Correction,
}

/// Balance of high vs. low peaks in the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CurrentWaveState {
    ImpulsiveMajority,
    CorrectiveMajority,
    Undetermined,
}

impl CurrentWaveState {
    pub fn label(&self) -> &'static str {
        match self {
            Self::ImpulsiveMajority => "impulsive majority",
            Self::CorrectiveMajority => "corrective majority",
            Self::Undetermined => "undetermined",
        }
    }
}

/// Raw extremum flags for one candle. Both may be set at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakFlags {
    pub high_peak: bool,
    pub low_peak: bool,
}

impl PeakFlags {
    /// High peak takes precedence when a candle is both.
    pub fn label(&self) -> Option<WaveLabel> {
        if self.high_peak {
            Some(WaveLabel::Impulse)
        } else if self.low_peak {
            Some(WaveLabel::Correction)
        } else {
            None
        }
    }
}

/// A labeled candle, priced at the extremum that produced the label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WavePoint {
    pub index: usize,
    pub timestamp: i64,
    pub label: WaveLabel,
    pub price: f64,
}

/// Output of the segmenter for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveAnalysis {
    pub peaks: Vec<PeakFlags>,
    pub labels: Vec<Option<WaveLabel>>,
    pub current: CurrentWaveState,
    /// Raw high-peak flags in the trailing window.
    pub window_high_peaks: usize,
    /// Raw low-peak flags in the trailing window.
    pub window_low_peaks: usize,
    /// Every labeled candle, oldest first.
    pub points: Vec<WavePoint>,
}

impl WaveAnalysis {
    /// The last `n` labeled candles, oldest first.
    pub fn recent_points(&self, n: usize) -> &[WavePoint] {
        let start = self.points.len().saturating_sub(n);
        &self.points[start..]
    }
}

/// Flag local extrema. Index 0 and N-1 are never peaks.
pub fn detect_peaks(candles: &[Candle]) -> Vec<PeakFlags> {
    let n = candles.len();
    let mut flags = vec![PeakFlags::default(); n];

    for i in 1..n.saturating_sub(1) {
        let (prev, cur, next) = (&candles[i - 1], &candles[i], &candles[i + 1]);
        flags[i] = PeakFlags {
            high_peak: cur.high > prev.high && cur.high > next.high,
            low_peak: cur.low < prev.low && cur.low < next.low,
        };
    }

    flags
}

/// Classify the trailing window of raw peak flags.
pub fn current_wave_state(peaks: &[PeakFlags]) -> (CurrentWaveState, usize, usize) {
    let window = &peaks[peaks.len().saturating_sub(WAVE_WINDOW)..];
    let highs = window.iter().filter(|p| p.high_peak).count();
    let lows = window.iter().filter(|p| p.low_peak).count();

    let state = match highs.cmp(&lows) {
        std::cmp::Ordering::Greater => CurrentWaveState::ImpulsiveMajority,
        std::cmp::Ordering::Less => CurrentWaveState::CorrectiveMajority,
        std::cmp::Ordering::Equal => CurrentWaveState::Undetermined,
    };
    (state, highs, lows)
}

/// Run the segmenter over a candle slice.
pub fn segment(candles: &[Candle]) -> WaveAnalysis {
    let peaks = detect_peaks(candles);
    let labels: Vec<Option<WaveLabel>> = peaks.iter().map(PeakFlags::label).collect();
    let (current, window_high_peaks, window_low_peaks) = current_wave_state(&peaks);

    let points = labels
        .iter()
        .enumerate()
        .filter_map(|(index, label)| {
            let label = (*label)?;
            let candle = &candles[index];
            let price = match label {
                WaveLabel::Impulse => candle.high,
                WaveLabel::Correction => candle.low,
            };
            Some(WavePoint {
                index,
                timestamp: candle.timestamp,
                label,
                price,
            })
        })
        .collect();

    debug!(
        candles = candles.len(),
        high_peaks = window_high_peaks,
        low_peaks = window_low_peaks,
        state = current.label(),
        "segmented waves"
    );

    WaveAnalysis {
        peaks,
        labels,
        current,
        window_high_peaks,
        window_low_peaks,
        points,
    }
}
