//! The analysis pipeline: candles → indicators → wave labels → signal.
//!
//! One call per series. The pipeline keeps no state between calls, so
//! independent series may be analyzed concurrently from any thread.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AnalysisConfig;
use crate::domain::CandleSeries;
use crate::error::AnalysisError;
use crate::indicators::IndicatorFrame;
use crate::signal::{self, Signal};
use crate::snapshot::MarketSnapshot;
use crate::waves::{self, WaveAnalysis};

/// Everything the presentation layer renders for one series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub candles: usize,
    /// `None` when the series is shorter than the indicator minimum.
    pub indicators: Option<IndicatorFrame>,
    pub waves: WaveAnalysis,
    pub signal: Signal,
    pub snapshot: MarketSnapshot,
}

/// Run the full pipeline over one validated series.
///
/// Short series never fail: indicators become unavailable and the signal
/// degrades to HOLD. Only an invalid configuration is rejected.
pub fn analyze(series: &CandleSeries, config: &AnalysisConfig) -> Result<Analysis, AnalysisError> {
    let indicators = match IndicatorFrame::compute(series, config) {
        Ok(frame) => Some(frame),
        Err(err) if err.is_insufficient_data() => {
            warn!(%err, "indicators unavailable");
            None
        }
        Err(err) => return Err(err),
    };

    let waves = waves::segment(series.as_slice());
    let signal = signal::evaluate(series, indicators.as_ref());
    let snapshot = MarketSnapshot::from_series(series, indicators.as_ref());

    debug!(
        candles = series.len(),
        signal = %signal.kind,
        wave = waves.current.label(),
        "analysis complete"
    );

    Ok(Analysis {
        candles: series.len(),
        indicators,
        waves,
        signal,
        snapshot,
    })
}
