//! Text and JSON rendering of analysis results.

use serde::Serialize;
use std::fmt::Write as _;
use wavetrader_core::data::{DataSource, Interval};
use wavetrader_core::{Analysis, Candle};

/// Number of wave points listed in the text report.
const RECENT_WAVE_POINTS: usize = 5;

/// One analyzed symbol, as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct SymbolReport {
    pub symbol: String,
    pub interval: Interval,
    pub source: DataSource,
    pub analysis: Analysis,
}

/// One `scan` row. `error` is set when the symbol produced no signal.
#[derive(Debug, Serialize)]
pub struct ScanRow {
    pub symbol: String,
    pub report: Option<SymbolReport>,
    pub error: Option<String>,
}

pub fn format_time(candle: &Candle) -> String {
    candle
        .open_time()
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| candle.timestamp.to_string())
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:+.2}%"))
}

pub fn render_report(report: &SymbolReport, last: &Candle) -> String {
    let a = &report.analysis;
    let s = &a.snapshot;
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "=== {} {} ===", report.symbol, report.interval);
    let _ = writeln!(out, "Last candle:    {}", format_time(last));
    let _ = writeln!(out, "Candles:        {} ({:?})", a.candles, report.source);
    let _ = writeln!(out, "Price:          {:.2}", s.price);
    let _ = writeln!(out, "Change:         {}", pct(s.price_change_pct));
    let _ = writeln!(out, "RSI:            {:.1} ({})", s.rsi, s.rsi_band);
    let _ = writeln!(out, "Volume:         {:.2} ({} vs avg)", s.volume, pct(s.volume_vs_average_pct));

    if let Some(frame) = &a.indicators {
        let row = frame.latest();
        let _ = writeln!(out);
        let _ = writeln!(out, "--- Indicators ---");
        for (name, value) in [
            ("EMA 20", row.ema20),
            ("EMA 50", row.ema50),
            ("MACD", row.macd),
            ("MACD signal", row.macd_signal),
            ("MACD hist", row.macd_histogram),
            ("BB upper", row.bb_upper),
            ("BB middle", row.bb_middle),
            ("BB lower", row.bb_lower),
            ("VWAP", row.vwap),
        ] {
            let shown = value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.4}"));
            let _ = writeln!(out, "{:<15} {shown}", format!("{name}:"));
        }
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "--- Waves ---");
    let _ = writeln!(
        out,
        "State:          {} ({} highs / {} lows in window)",
        a.waves.current.label(),
        a.waves.window_high_peaks,
        a.waves.window_low_peaks
    );
    for point in a.waves.recent_points(RECENT_WAVE_POINTS) {
        let _ = writeln!(
            out,
            "  #{:<5} {:?} at {:.2}",
            point.index, point.label, point.price
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "--- Signal ---");
    let _ = writeln!(out, "{}", a.signal.rationale);
    out
}

pub fn render_scan(rows: &[ScanRow]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<10} {:>12} {:>9} {:>6} {:<6} {:<7} {:<20}",
        "Symbol", "Price", "Change", "RSI", "Signal", "Conf", "Wave"
    );
    let _ = writeln!(out, "{}", "-".repeat(76));
    for row in rows {
        match (&row.report, &row.error) {
            (Some(r), _) => {
                let a = &r.analysis;
                let _ = writeln!(
                    out,
                    "{:<10} {:>12.2} {:>9} {:>6.1} {:<6} {:<7} {:<20}",
                    row.symbol,
                    a.snapshot.price,
                    pct(a.snapshot.price_change_pct),
                    a.snapshot.rsi,
                    a.signal.kind.as_str(),
                    a.signal.confidence.to_string(),
                    a.waves.current.label()
                );
            }
            (None, err) => {
                let _ = writeln!(
                    out,
                    "{:<10} no signal: {}",
                    row.symbol,
                    err.as_deref().unwrap_or("unknown error")
                );
            }
        }
    }
    out
}
