//! Kline codec: Binance-style `[open_time, open, high, low, close, volume, ...]`
//! rows into a validated `CandleSeries`.
//!
//! Prices arrive as numeric strings on the wire and as plain numbers in some
//! exports; both are accepted. Trailing fields (close time, quote volume,
//! trade count, ...) are ignored.

use serde_json::Value;

use crate::domain::{Candle, CandleSeries};
use crate::error::AnalysisError;

const PRICE_FIELDS: [&str; 5] = ["open", "high", "low", "close", "volume"];

/// Parse a JSON array of kline rows.
pub fn parse_klines(body: &str) -> Result<CandleSeries, AnalysisError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| AnalysisError::malformed(format!("klines payload is not JSON: {e}")))?;
    let rows = value
        .as_array()
        .ok_or_else(|| AnalysisError::malformed("klines payload is not an array"))?;
    parse_kline_rows(rows)
}

/// Parse already-decoded kline rows.
pub fn parse_kline_rows(rows: &[Value]) -> Result<CandleSeries, AnalysisError> {
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, row)| parse_row(i, row))
        .collect::<Result<Vec<_>, _>>()?;
    CandleSeries::new(candles)
}

fn parse_row(index: usize, row: &Value) -> Result<Candle, AnalysisError> {
    let fields = row
        .as_array()
        .ok_or_else(|| AnalysisError::malformed(format!("kline {index} is not an array")))?;
    if fields.len() < 6 {
        return Err(AnalysisError::malformed(format!(
            "kline {index} has {} fields, expected at least 6",
            fields.len()
        )));
    }

    let timestamp = parse_timestamp(&fields[0]).ok_or_else(|| {
        AnalysisError::malformed(format!("kline {index}: open_time is not an integer"))
    })?;

    let mut values = [0.0; 5];
    for (slot, (name, field)) in values.iter_mut().zip(PRICE_FIELDS.iter().zip(&fields[1..6])) {
        *slot = parse_real(field).ok_or_else(|| {
            AnalysisError::malformed(format!("kline {index}: {name} is not numeric ({field})"))
        })?;
    }
    let [open, high, low, close, volume] = values;

    Ok(Candle {
        timestamp,
        open,
        high,
        low,
        close,
        volume,
    })
}

fn parse_timestamp(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_real(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    parsed.is_finite().then_some(parsed)
}
