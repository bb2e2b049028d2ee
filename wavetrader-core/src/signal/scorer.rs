//! Weighted-vote scorer.
//!
//! | Condition            | buy | sell |
//! |----------------------|-----|------|
//! | RSI < 35             | +2  |      |
//! | RSI > 65             |     | +2   |
//! | macd > macd_signal   | +1  |      |
//! | macd <= macd_signal  |     | +1   |
//! | Uptrend              | +1  |      |
//! | Downtrend            |     | +1   |
//!
//! Decision, first match wins: buy >= 3 && sell <= 1 → BUY/High;
//! sell >= 3 && buy <= 1 → SELL/High; otherwise HOLD/Medium.

use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::debug;

use super::trend::{classify_trend, Trend};
use super::{Confidence, RsiBand, Signal, SignalKind};
use crate::domain::CandleSeries;
use crate::indicators::{pct_change_volatility, IndicatorFrame};

/// Fewest candles for which a signal is scored (EMA50 must be populated).
pub const MIN_SCORING_CANDLES: usize = 50;

pub const INSUFFICIENT_DATA_RATIONALE: &str = "insufficient data for analysis";

pub const RSI_BUY_BELOW: f64 = 35.0;
pub const RSI_SELL_ABOVE: f64 = 65.0;

const RSI_WEIGHT: u32 = 2;
const MACD_WEIGHT: u32 = 1;
const TREND_WEIGHT: u32 = 1;
const CONVERGENCE_VOTES: u32 = 3;
const MAX_OPPOSING_VOTES: u32 = 1;

const BULLISH_REASON: &str = "strong bullish indicator convergence";
const BEARISH_REASON: &str = "strong bearish indicator convergence";
const HOLD_REASON: &str = "awaiting clear signal";

/// Everything the decision rule looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreInputs {
    pub rsi: f64,
    pub macd: f64,
    pub macd_signal: f64,
    pub trend: Trend,
}

/// Decision rule output, before any descriptive text is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub kind: SignalKind,
    pub confidence: Confidence,
    pub buy_score: u32,
    pub sell_score: u32,
    pub reason: &'static str,
}

/// Pure decision function over (RSI, MACD relation, trend).
pub fn score(inputs: &ScoreInputs) -> Verdict {
    let mut buy_score = 0;
    let mut sell_score = 0;

    if inputs.rsi < RSI_BUY_BELOW {
        buy_score += RSI_WEIGHT;
    } else if inputs.rsi > RSI_SELL_ABOVE {
        sell_score += RSI_WEIGHT;
    }

    if inputs.macd > inputs.macd_signal {
        buy_score += MACD_WEIGHT;
    } else {
        sell_score += MACD_WEIGHT;
    }

    match inputs.trend {
        Trend::Uptrend => buy_score += TREND_WEIGHT,
        Trend::Downtrend => sell_score += TREND_WEIGHT,
        Trend::Sideways => {}
    }

    let (kind, confidence, reason) =
        if buy_score >= CONVERGENCE_VOTES && sell_score <= MAX_OPPOSING_VOTES {
            (SignalKind::Buy, Confidence::High, BULLISH_REASON)
        } else if sell_score >= CONVERGENCE_VOTES && buy_score <= MAX_OPPOSING_VOTES {
            (SignalKind::Sell, Confidence::High, BEARISH_REASON)
        } else {
            (SignalKind::Hold, Confidence::Medium, HOLD_REASON)
        };

    Verdict {
        kind,
        confidence,
        buy_score,
        sell_score,
        reason,
    }
}

/// Score the most recent candle of `series`.
///
/// Short-circuits to [`Signal::insufficient_data`] below
/// [`MIN_SCORING_CANDLES`], when the frame is unavailable, or when any input
/// is still warming up at the latest index.
pub fn evaluate(series: &CandleSeries, frame: Option<&IndicatorFrame>) -> Signal {
    if series.len() < MIN_SCORING_CANDLES {
        debug!(
            candles = series.len(),
            required = MIN_SCORING_CANDLES,
            "too few candles to score"
        );
        return Signal::insufficient_data();
    }

    let Some(frame) = frame else {
        debug!("indicator frame unavailable, holding");
        return Signal::insufficient_data();
    };

    let latest = frame.latest();
    let (Some(rsi), Some(ema20), Some(ema50), Some(macd), Some(macd_signal)) = (
        latest.rsi,
        latest.ema20,
        latest.ema50,
        latest.macd,
        latest.macd_signal,
    ) else {
        debug!("latest indicator row incomplete, holding");
        return Signal::insufficient_data();
    };

    let close = series.last().close;
    let inputs = ScoreInputs {
        rsi,
        macd,
        macd_signal,
        trend: classify_trend(close, ema20, ema50),
    };
    let verdict = score(&inputs);
    let volatility = pct_change_volatility(&series.closes());

    debug!(
        kind = %verdict.kind,
        buy = verdict.buy_score,
        sell = verdict.sell_score,
        "scored signal"
    );

    Signal {
        kind: verdict.kind,
        confidence: verdict.confidence,
        rationale: rationale(&verdict, close, &inputs, volatility),
        buy_score: verdict.buy_score,
        sell_score: verdict.sell_score,
        reason: verdict.reason.to_string(),
        recommendation: verdict.kind.recommendation().to_string(),
    }
}

fn rationale(verdict: &Verdict, price: f64, inputs: &ScoreInputs, volatility: Option<f64>) -> String {
    let mut text = String::new();
    let _ = writeln!(text, "Signal: {}", verdict.kind);
    let _ = writeln!(text, "Confidence: {}", verdict.confidence);
    let _ = writeln!(text, "Current price: ${price:.2}");
    let _ = writeln!(text, "Indicators:");
    let _ = writeln!(text, "- RSI: {:.1} ({})", inputs.rsi, RsiBand::of(inputs.rsi));
    let _ = writeln!(text, "- Trend: {}", inputs.trend);
    match volatility {
        Some(v) => {
            let _ = writeln!(text, "- Volatility: {v:.2}%");
        }
        None => {
            let _ = writeln!(text, "- Volatility: n/a");
        }
    }
    let _ = writeln!(text, "Recommendation: {}", verdict.kind.recommendation());
    let _ = write!(text, "Reason: {}", verdict.reason);
    text
}
