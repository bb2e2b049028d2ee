//! Candle: the fundamental market data unit.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// OHLCV candle for one interval.
///
/// `timestamp` is the candle open time in epoch milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    /// Open time as a UTC datetime, if the timestamp is representable.
    pub fn open_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp)
    }

    /// Typical price: (high + low + close) / 3.
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    fn check_fields(&self, index: usize) -> Result<(), AnalysisError> {
        let fields = [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
            ("volume", self.volume),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::malformed(format!(
                    "candle {index}: {name} is not a finite number"
                )));
            }
            if value < 0.0 {
                return Err(AnalysisError::malformed(format!(
                    "candle {index}: {name} is negative ({value})"
                )));
            }
        }
        Ok(())
    }
}

/// Validated, ordered candle series. Index 0 is the oldest candle.
///
/// Invariants: at least one candle, strictly increasing timestamps, all
/// fields finite and non-negative. The only way to build one is through
/// [`CandleSeries::new`], so every analysis entry point can rely on them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandleSeries {
    candles: Vec<Candle>,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self, AnalysisError> {
        if candles.is_empty() {
            return Err(AnalysisError::malformed("candle series is empty"));
        }

        for (i, candle) in candles.iter().enumerate() {
            candle.check_fields(i)?;
        }

        for (i, pair) in candles.windows(2).enumerate() {
            if pair[1].timestamp <= pair[0].timestamp {
                return Err(AnalysisError::malformed(format!(
                    "timestamps not strictly increasing at index {}: {} after {}",
                    i + 1,
                    pair[1].timestamp,
                    pair[0].timestamp
                )));
            }
        }

        Ok(Self { candles })
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Always false: a series holds at least one candle.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn as_slice(&self) -> &[Candle] {
        &self.candles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Candle> {
        self.candles.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Candle> {
        self.candles.get(index)
    }

    /// Most recent candle.
    pub fn last(&self) -> &Candle {
        // Non-empty by construction.
        &self.candles[self.candles.len() - 1]
    }

    pub fn closes(&self) -> Vec<f64> {
        self.candles.iter().map(|c| c.close).collect()
    }

    pub fn into_inner(self) -> Vec<Candle> {
        self.candles
    }
}

impl<'de> Deserialize<'de> for CandleSeries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            candles: Vec<Candle>,
        }
        let raw = Raw::deserialize(deserializer)?;
        CandleSeries::new(raw.candles).map_err(serde::de::Error::custom)
    }
}

impl<'a> IntoIterator for &'a CandleSeries {
    type Item = &'a Candle;
    type IntoIter = std::slice::Iter<'a, Candle>;

    fn into_iter(self) -> Self::IntoIter {
        self.candles.iter()
    }
}
