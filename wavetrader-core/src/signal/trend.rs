//! Trend classification from the last close and the two EMAs.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Uptrend => "Uptrend",
            Self::Downtrend => "Downtrend",
            Self::Sideways => "Sideways",
        })
    }
}

/// Uptrend iff close > ema20 > ema50; Downtrend iff close < ema20 < ema50.
pub fn classify_trend(close: f64, ema20: f64, ema50: f64) -> Trend {
    if close > ema20 && ema20 > ema50 {
        Trend::Uptrend
    } else if close < ema20 && ema20 < ema50 {
        Trend::Downtrend
    } else {
        Trend::Sideways
    }
}
