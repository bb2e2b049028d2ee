//! WaveTrader Core: candle validation, indicators, wave labels, signal scoring.
//!
//! This crate contains the analysis pipeline:
//! - Domain types (candles and validated candle series)
//! - Indicator calculator producing a per-candle indicator frame
//! - Wave segmenter labelling local peaks as impulse or correction
//! - Weighted-vote signal scorer (BUY / SELL / HOLD)
//! - Market-data collaborators (Binance klines, CSV, synthetic)
//!
//! The pipeline is a pure function of its input series. Fetching, retrying,
//! and rendering belong to callers.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod indicators;
pub mod signal;
pub mod snapshot;
pub mod waves;

pub use analysis::{analyze, Analysis};
pub use config::{AnalysisConfig, ConfigError};
pub use domain::{Candle, CandleSeries};
pub use error::AnalysisError;
pub use indicators::{IndicatorFrame, IndicatorRow};
pub use signal::{Confidence, Signal, SignalKind};
pub use snapshot::MarketSnapshot;
pub use waves::{CurrentWaveState, WaveAnalysis, WaveLabel};
