//! Market-data collaborators.
//!
//! Nothing in here is called by the analysis pipeline. Callers fetch or load a
//! `CandleSeries` first, then hand it to `analysis::analyze`.

pub mod binance;
pub mod circuit_breaker;
pub mod csv_io;
pub mod klines;
pub mod provider;
pub mod synthetic;

pub use binance::{BinanceConfig, BinanceProvider};
pub use circuit_breaker::CircuitBreaker;
pub use csv_io::{read_csv, write_csv, CsvProvider};
pub use klines::{parse_kline_rows, parse_klines};
pub use provider::{
    DataError, DataSource, FetchResult, Interval, KlineRequest, MarketDataProvider, MAX_LIMIT,
};
pub use synthetic::SyntheticProvider;
