//! Data provider trait and structured error types.
//!
//! The `MarketDataProvider` trait abstracts over candle sources (Binance REST,
//! CSV files, synthetic data) so callers can swap implementations and mock
//! them in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::CandleSeries;
use crate::error::AnalysisError;

/// Largest `limit` the klines endpoint accepts.
pub const MAX_LIMIT: usize = 1000;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("hard stop: provider has blocked requests (circuit breaker tripped)")]
    CircuitBreakerTripped,

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Malformed(#[from] AnalysisError),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// Candle interval accepted by the klines endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "3m")]
    ThreeMinutes,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
}

impl Interval {
    pub const ALL: [Interval; 8] = [
        Self::OneMinute,
        Self::ThreeMinutes,
        Self::FiveMinutes,
        Self::FifteenMinutes,
        Self::ThirtyMinutes,
        Self::OneHour,
        Self::FourHours,
        Self::OneDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::ThreeMinutes => "3m",
            Self::FiveMinutes => "5m",
            Self::FifteenMinutes => "15m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::FourHours => "4h",
            Self::OneDay => "1d",
        }
    }

    pub fn millis(&self) -> i64 {
        const MINUTE: i64 = 60_000;
        match self {
            Self::OneMinute => MINUTE,
            Self::ThreeMinutes => 3 * MINUTE,
            Self::FiveMinutes => 5 * MINUTE,
            Self::FifteenMinutes => 15 * MINUTE,
            Self::ThirtyMinutes => 30 * MINUTE,
            Self::OneHour => 60 * MINUTE,
            Self::FourHours => 240 * MINUTE,
            Self::OneDay => 1_440 * MINUTE,
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| DataError::InvalidRequest(format!("unsupported interval '{s}'")))
    }
}

/// One (symbol, interval, limit) request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KlineRequest {
    pub symbol: String,
    pub interval: Interval,
    pub limit: usize,
}

impl KlineRequest {
    pub fn new(symbol: impl Into<String>, interval: Interval, limit: usize) -> Result<Self, DataError> {
        let symbol = symbol.into().trim().to_uppercase();
        if symbol.is_empty() {
            return Err(DataError::InvalidRequest("symbol is empty".into()));
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(DataError::InvalidRequest(format!(
                "limit must be within 1..={MAX_LIMIT}, got {limit}"
            )));
        }
        Ok(Self {
            symbol,
            interval,
            limit,
        })
    }
}

/// Where the candles came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    Binance,
    CsvImport,
    Synthetic,
}

/// Result of a successful fetch for a single symbol.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub request: KlineRequest,
    pub series: CandleSeries,
    pub source: DataSource,
}

/// Trait for candle providers.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the most recent `limit` candles, oldest first.
    fn fetch(&self, request: &KlineRequest) -> Result<FetchResult, DataError>;

    /// Check if the provider is currently available (not rate-limited, not blocked).
    fn is_available(&self) -> bool;
}
