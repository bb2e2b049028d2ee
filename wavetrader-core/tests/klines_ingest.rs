//! Ingest path: provider payloads and files into validated series, then analysis.

use std::sync::atomic::{AtomicUsize, Ordering};

use wavetrader_core::data::{
    parse_klines, read_csv, write_csv, DataError, DataSource, FetchResult, Interval, KlineRequest,
    MarketDataProvider, SyntheticProvider,
};
use wavetrader_core::{analyze, AnalysisConfig, AnalysisError, SignalKind};

/// Binance-shaped rows: string prices plus the trailing fields the API sends.
fn binance_payload(n: usize) -> String {
    let rows: Vec<String> = (0..n)
        .map(|i| {
            let open_time = 1_700_000_000_000_i64 + i as i64 * 900_000;
            let close = 30_000.0 + (i as f64 * 0.4).sin() * 250.0;
            format!(
                r#"[{open_time},"{:.2}","{:.2}","{:.2}","{:.2}","{:.4}",{},"0.0",10,"0.0","0.0","0"]"#,
                close - 5.0,
                close + 20.0,
                close - 20.0,
                close,
                12.5 + i as f64,
                open_time + 899_999,
            )
        })
        .collect();
    format!("[{}]", rows.join(","))
}

#[test]
fn binance_payload_feeds_the_pipeline() {
    let series = parse_klines(&binance_payload(120)).unwrap();
    assert_eq!(series.len(), 120);
    assert_eq!(series.as_slice()[1].timestamp - series.as_slice()[0].timestamp, 900_000);

    let analysis = analyze(&series, &AnalysisConfig::default()).unwrap();
    assert_eq!(analysis.candles, 120);
    assert!(analysis.indicators.is_some());
    assert!(!analysis.signal.is_insufficient_data());
    assert!(!analysis.waves.points.is_empty());
}

#[test]
fn empty_payload_is_malformed() {
    assert!(matches!(parse_klines("[]"), Err(AnalysisError::MalformedInput(_))));
}

#[test]
fn non_numeric_price_is_malformed() {
    let body = r#"[[1700000000000,"1.0","abc","0.5","1.5","10.0"]]"#;
    let err = parse_klines(body).unwrap_err();
    assert!(err.to_string().contains("high"));
}

#[test]
fn duplicate_open_time_is_rejected() {
    let body = r#"[
        [1700000000000,"1.0","2.0","0.5","1.5","10.0"],
        [1700000000000,"1.0","2.0","0.5","1.5","10.0"]
    ]"#;
    assert!(parse_klines(body).is_err());
}

#[test]
fn csv_export_round_trips_through_analysis() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ETHUSDT_15m.csv");
    let series = parse_klines(&binance_payload(60)).unwrap();

    write_csv(&path, &series).unwrap();
    let loaded = read_csv(&path).unwrap();

    let config = AnalysisConfig::default();
    let before = analyze(&series, &config).unwrap();
    let after = analyze(&loaded, &config).unwrap();
    assert_eq!(before.signal.kind, after.signal.kind);
    assert_eq!(before.waves, after.waves);
}

/// Provider that fails a fixed number of times before serving synthetic data.
struct FlakyProvider {
    failures_left: AtomicUsize,
    inner: SyntheticProvider,
}

impl MarketDataProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    fn fetch(&self, request: &KlineRequest) -> Result<FetchResult, DataError> {
        if self
            .failures_left
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
        {
            return Err(DataError::UpstreamUnavailable("connection reset".into()));
        }
        self.inner.fetch(request)
    }

    fn is_available(&self) -> bool {
        true
    }
}

#[test]
fn failed_fetch_never_reaches_analysis() {
    let provider = FlakyProvider {
        failures_left: AtomicUsize::new(1),
        inner: SyntheticProvider::default(),
    };
    let request = KlineRequest::new("BTCUSDT", Interval::OneHour, 100).unwrap();

    assert!(matches!(
        provider.fetch(&request),
        Err(DataError::UpstreamUnavailable(_))
    ));

    let result = provider.fetch(&request).unwrap();
    assert_eq!(result.source, DataSource::Synthetic);
    let analysis = analyze(&result.series, &AnalysisConfig::default()).unwrap();
    assert!(matches!(
        analysis.signal.kind,
        SignalKind::Buy | SignalKind::Sell | SignalKind::Hold
    ));
    assert_eq!(analysis.candles, 100);
}
