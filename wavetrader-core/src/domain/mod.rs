//! Domain types for WaveTrader

pub mod candle;

pub use candle::{Candle, CandleSeries};
