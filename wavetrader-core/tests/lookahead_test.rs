//! Look-ahead contamination tests for every indicator.
//!
//! No indicator value at candle t may depend on candles t+1 or later.
//!
//! Method: compute on a truncated series (candles 0..100) and the full series
//! (candles 0..200). Candles 0..100 must be identical between both runs.

use wavetrader_core::indicators::*;
use wavetrader_core::{AnalysisConfig, Candle, CandleSeries, IndicatorFrame};

/// Deterministic pseudo-random walk using a simple LCG.
fn make_test_candles(n: usize) -> Vec<Candle> {
    let mut candles = Vec::with_capacity(n);
    let mut price = 100.0;

    for i in 0..n {
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05;
        price += change;
        price = price.max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        candles.push(Candle {
            timestamp: 1_700_000_000_000 + i as i64 * 60_000,
            open,
            high: open.max(close) + 2.0,
            low: open.min(close) - 2.0,
            close,
            volume: 1000.0 + i as f64 * 100.0,
        });
    }

    candles
}

fn assert_no_lookahead(indicator: &dyn Indicator, full: &[Candle], truncated_len: usize) {
    let full_result = indicator.compute(full);
    let truncated_result = indicator.compute(&full[..truncated_len]);

    assert_eq!(
        truncated_result.len(),
        truncated_len,
        "{}: truncated result length mismatch",
        indicator.name()
    );

    for i in 0..truncated_len {
        assert_eq!(
            truncated_result[i],
            full_result[i],
            "{}: look-ahead at index {i}",
            indicator.name()
        );
    }
}

fn all_indicators() -> Vec<Box<dyn Indicator>> {
    vec![
        Box::new(Sma::new(20)),
        Box::new(Ema::new(20)),
        Box::new(Ema::new(50)),
        Box::new(Rsi::new(14)),
        Box::new(Rsi::new(7)),
        Box::new(Macd::standard(MacdLine::Macd)),
        Box::new(Macd::standard(MacdLine::Signal)),
        Box::new(Macd::standard(MacdLine::Histogram)),
        Box::new(Bollinger::upper(20, 2.0)),
        Box::new(Bollinger::middle(20, 2.0)),
        Box::new(Bollinger::lower(20, 2.0)),
        Box::new(Vwap::new()),
    ]
}

#[test]
fn no_indicator_looks_ahead() {
    let candles = make_test_candles(200);
    for indicator in all_indicators() {
        assert_no_lookahead(indicator.as_ref(), &candles, 100);
    }
}

#[test]
fn warmup_matches_declared_lookback() {
    let candles = make_test_candles(200);
    for indicator in all_indicators() {
        let values = indicator.compute(&candles);
        let lookback = indicator.lookback();
        assert!(
            values[..lookback].iter().all(Option::is_none),
            "{}: value inside warmup",
            indicator.name()
        );
        assert!(
            values[lookback..].iter().all(Option::is_some),
            "{}: missing value after warmup",
            indicator.name()
        );
    }
}

#[test]
fn frame_rows_do_not_depend_on_later_candles() {
    let candles = make_test_candles(200);
    let config = AnalysisConfig::default();
    let full = IndicatorFrame::compute(&CandleSeries::new(candles.clone()).unwrap(), &config).unwrap();
    let truncated =
        IndicatorFrame::compute(&CandleSeries::new(candles[..100].to_vec()).unwrap(), &config)
            .unwrap();

    for i in 0..100 {
        assert_eq!(truncated.row(i), full.row(i), "frame look-ahead at row {i}");
    }
}
