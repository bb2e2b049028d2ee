//! CSV import and export of candle series.
//!
//! Format: header `open_time,open,high,low,close,volume`, one candle per row,
//! `open_time` in epoch milliseconds, oldest first.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::provider::{DataError, DataSource, FetchResult, KlineRequest, MarketDataProvider};
use crate::domain::{Candle, CandleSeries};

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    open_time: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

impl From<&Candle> for CsvRow {
    fn from(c: &Candle) -> Self {
        Self {
            open_time: c.timestamp,
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            volume: c.volume,
        }
    }
}

impl From<CsvRow> for Candle {
    fn from(r: CsvRow) -> Self {
        Candle {
            timestamp: r.open_time,
            open: r.open,
            high: r.high,
            low: r.low,
            close: r.close,
            volume: r.volume,
        }
    }
}

/// Read and validate a candle CSV.
pub fn read_csv(path: &Path) -> Result<CandleSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    let candles = reader
        .deserialize::<CsvRow>()
        .map(|row| row.map(Candle::from))
        .collect::<Result<Vec<_>, _>>()?;
    debug!(path = %path.display(), rows = candles.len(), "read candle csv");
    Ok(CandleSeries::new(candles)?)
}

/// Write a series to `path`, creating parent directories as needed.
pub fn write_csv(path: &Path, series: &CandleSeries) -> Result<(), DataError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let mut writer = csv::Writer::from_path(path)?;
    for candle in series {
        writer.serialize(CsvRow::from(candle))?;
    }
    writer.flush()?;
    Ok(())
}

/// Serves requests from `{dir}/{SYMBOL}_{interval}.csv` files.
///
/// Only the last `limit` rows are returned.
pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, request: &KlineRequest) -> PathBuf {
        self.dir
            .join(format!("{}_{}.csv", request.symbol, request.interval))
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, request: &KlineRequest) -> Result<FetchResult, DataError> {
        let path = self.path_for(request);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: request.symbol.clone(),
            });
        }
        let mut candles = read_csv(&path)?.into_inner();
        if candles.len() > request.limit {
            candles.drain(..candles.len() - request.limit);
        }
        Ok(FetchResult {
            request: request.clone(),
            series: CandleSeries::new(candles)?,
            source: DataSource::CsvImport,
        })
    }

    fn is_available(&self) -> bool {
        self.dir.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Interval;

    fn series(n: usize) -> CandleSeries {
        let candles = (0..n)
            .map(|i| {
                let p = 100.0 + i as f64;
                Candle {
                    timestamp: 1_700_000_000_000 + i as i64 * 3_600_000,
                    open: p,
                    high: p + 1.5,
                    low: p - 0.5,
                    close: p + 0.25,
                    volume: 10.0 * (i + 1) as f64,
                }
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }

    #[test]
    fn write_then_read_preserves_candles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("BTCUSDT_1h.csv");
        let original = series(5);

        write_csv(&path, &original).unwrap();
        let loaded = read_csv(&path).unwrap();

        assert_eq!(loaded, original);
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("open_time,open,high,low,close,volume"));
    }

    #[test]
    fn unordered_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "open_time,open,high,low,close,volume\n2000,1,2,0.5,1.5,10\n1000,1,2,0.5,1.5,10\n",
        )
        .unwrap();

        assert!(matches!(read_csv(&path), Err(DataError::Malformed(_))));
    }

    #[test]
    fn non_numeric_field_is_a_csv_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "open_time,open,high,low,close,volume\n1000,x,2,0.5,1.5,10\n").unwrap();

        assert!(matches!(read_csv(&path), Err(DataError::Csv(_))));
    }

    #[test]
    fn provider_returns_most_recent_rows() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        let request = KlineRequest::new("btcusdt", Interval::OneHour, 3).unwrap();
        write_csv(&provider.path_for(&request), &series(10)).unwrap();

        let result = provider.fetch(&request).unwrap();
        assert_eq!(result.source, DataSource::CsvImport);
        assert_eq!(result.series.len(), 3);
        assert_eq!(result.series.last().close, 109.25);
    }

    #[test]
    fn provider_missing_file_is_symbol_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let provider = CsvProvider::new(dir.path());
        let request = KlineRequest::new("ETHUSDT", Interval::OneDay, 3).unwrap();
        assert!(matches!(
            provider.fetch(&request),
            Err(DataError::SymbolNotFound { .. })
        ));
    }
}
