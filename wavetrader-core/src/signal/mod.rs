//! Signal scoring: turns the latest indicator values into a BUY/SELL/HOLD
//! recommendation.
//!
//! A signal is a value object: built fresh per analysis call, never mutated,
//! never persisted.

pub mod scorer;
pub mod trend;

pub use scorer::{
    evaluate, score, ScoreInputs, Verdict, INSUFFICIENT_DATA_RATIONALE, MIN_SCORING_CANDLES,
};
pub use trend::{classify_trend, Trend};

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalKind {
    Buy,
    Sell,
    Hold,
}

impl SignalKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
            Self::Hold => "HOLD",
        }
    }

    /// Action hint shown next to the signal.
    pub fn recommendation(&self) -> &'static str {
        match self {
            Self::Buy => "consider buying",
            Self::Sell => "consider selling",
            Self::Hold => "wait for a better entry point",
        }
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse qualitative strength, not a probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::High => "High",
            Self::Medium => "Medium",
        })
    }
}

/// Qualitative RSI band used in the rationale only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RsiBand {
    Oversold,
    Overbought,
    Neutral,
}

impl RsiBand {
    pub const OVERSOLD_BELOW: f64 = 30.0;
    pub const OVERBOUGHT_ABOVE: f64 = 70.0;

    pub fn of(rsi: f64) -> Self {
        if rsi < Self::OVERSOLD_BELOW {
            Self::Oversold
        } else if rsi > Self::OVERBOUGHT_ABOVE {
            Self::Overbought
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for RsiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Oversold => "Oversold",
            Self::Overbought => "Overbought",
            Self::Neutral => "Neutral",
        })
    }
}

/// Final recommendation for one analysis call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub kind: SignalKind,
    pub confidence: Confidence,
    pub rationale: String,
    pub buy_score: u32,
    pub sell_score: u32,
    /// Short decision phrase, also embedded in `rationale`.
    pub reason: String,
    pub recommendation: String,
}

impl Signal {
    /// Safe fallback when the series is too short to score.
    pub fn insufficient_data() -> Self {
        Self {
            kind: SignalKind::Hold,
            confidence: Confidence::Medium,
            rationale: INSUFFICIENT_DATA_RATIONALE.to_string(),
            buy_score: 0,
            sell_score: 0,
            reason: INSUFFICIENT_DATA_RATIONALE.to_string(),
            recommendation: SignalKind::Hold.recommendation().to_string(),
        }
    }

    pub fn is_insufficient_data(&self) -> bool {
        self.kind == SignalKind::Hold && self.rationale == INSUFFICIENT_DATA_RATIONALE
    }
}
