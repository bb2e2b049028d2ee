//! WaveTrader CLI: fetch candles, analyze, scan a watchlist, export CSV.
//!
//! Commands:
//! - `analyze`: full report (indicators, waves, signal) for one symbol
//! - `scan`: one-line signal per symbol, analyzed in parallel
//! - `download`: fetch klines and write them to CSV
//!
//! Defaults come from `wavetrader.toml` (see [`config::AppConfig`]).

mod config;
mod report;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wavetrader_core::data::{
    read_csv, write_csv, BinanceProvider, CircuitBreaker, DataSource, FetchResult, Interval,
    KlineRequest, MarketDataProvider, SyntheticProvider,
};
use wavetrader_core::{analyze, Analysis, AnalysisConfig};

use config::AppConfig;
use report::{render_report, render_scan, ScanRow, SymbolReport};

#[derive(Parser)]
#[command(
    name = "wavetrader",
    about = "WaveTrader CLI: candle indicators, wave labels and trading signals"
)]
struct Cli {
    /// Path to a TOML config file. Defaults to ./wavetrader.toml if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that fetches candles.
#[derive(Args)]
struct FetchArgs {
    /// Candle interval (1m, 3m, 5m, 15m, 30m, 1h, 4h, 1d).
    #[arg(long)]
    interval: Option<Interval>,

    /// Number of candles to fetch (1..=1000).
    #[arg(long)]
    limit: Option<usize>,

    /// Use deterministic synthetic candles instead of the network.
    #[arg(long, default_value_t = false)]
    synthetic: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze one symbol and print the full report.
    Analyze {
        /// Symbol (e.g., BTCUSDT). Defaults to the configured symbol.
        symbol: Option<String>,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Read candles from a CSV file instead of fetching.
        #[arg(long, conflicts_with = "synthetic")]
        csv: Option<PathBuf>,

        /// Override the RSI period.
        #[arg(long)]
        rsi_period: Option<usize>,

        /// Print JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Analyze several symbols in parallel and print one line each.
    Scan {
        /// Symbols to scan. Defaults to the configured watchlist.
        symbols: Vec<String>,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Print JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Fetch candles and write them to CSV.
    Download {
        /// Symbol (e.g., BTCUSDT). Defaults to the configured symbol.
        symbol: Option<String>,

        #[command(flatten)]
        fetch: FetchArgs,

        /// Output file. Defaults to ./data/{SYMBOL}_{interval}.csv.
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wavetrader=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let app = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Analyze {
            symbol,
            fetch,
            csv,
            rsi_period,
            json,
        } => run_analyze(&app, symbol, &fetch, csv, rsi_period, json),
        Commands::Scan {
            symbols,
            fetch,
            json,
        } => run_scan(&app, symbols, &fetch, json),
        Commands::Download {
            symbol,
            fetch,
            output,
        } => run_download(&app, symbol, &fetch, output),
    }
}

fn build_request(app: &AppConfig, symbol: Option<&str>, fetch: &FetchArgs) -> Result<KlineRequest> {
    let symbol = symbol.unwrap_or(&app.symbol);
    Ok(KlineRequest::new(
        symbol,
        fetch.interval.unwrap_or(app.interval),
        fetch.limit.unwrap_or(app.limit),
    )?)
}

fn build_provider(app: &AppConfig, synthetic: bool) -> Result<Box<dyn MarketDataProvider>> {
    if synthetic {
        warn!("using synthetic candles; signals are not based on market data");
        return Ok(Box::new(SyntheticProvider::default()));
    }
    let breaker = Arc::new(CircuitBreaker::default_provider());
    Ok(Box::new(BinanceProvider::new(app.binance.clone(), breaker)?))
}

fn run_analyze(
    app: &AppConfig,
    symbol: Option<String>,
    fetch: &FetchArgs,
    csv: Option<PathBuf>,
    rsi_period: Option<usize>,
    json: bool,
) -> Result<()> {
    let analysis_config = match rsi_period {
        Some(period) => AnalysisConfig::with_rsi_period(period)?,
        None => app.analysis.clone(),
    };
    let request = build_request(app, symbol.as_deref(), fetch)?;

    let (fetched, analysis) = match load_and_analyze(app, &request, fetch, csv, &analysis_config) {
        Ok(outcome) => outcome,
        Err(err) => {
            println!("{}", no_signal_line(&request.symbol, &err));
            bail!("no signal for {}", request.symbol);
        }
    };
    let last = *fetched.series.last();
    info!(
        symbol = %request.symbol,
        signal = %analysis.signal.kind,
        "analyzed"
    );

    let report = SymbolReport {
        symbol: request.symbol,
        interval: request.interval,
        source: fetched.source,
        analysis,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report, &last));
    }
    Ok(())
}

/// Load candles from CSV or the provider, then run the analysis.
fn load_and_analyze(
    app: &AppConfig,
    request: &KlineRequest,
    fetch: &FetchArgs,
    csv: Option<PathBuf>,
    analysis_config: &AnalysisConfig,
) -> Result<(FetchResult, Analysis)> {
    let fetched = match csv {
        Some(path) => FetchResult {
            series: read_csv(&path)
                .with_context(|| format!("failed to load {}", path.display()))?,
            request: request.clone(),
            source: DataSource::CsvImport,
        },
        None => build_provider(app, fetch.synthetic)?
            .fetch(request)
            .with_context(|| format!("fetch failed for {}", request.symbol))?,
    };
    let analysis = analyze(&fetched.series, analysis_config)?;
    Ok((fetched, analysis))
}

fn no_signal_line(symbol: &str, err: &anyhow::Error) -> String {
    format!("{symbol}: no signal ({err:#})")
}

fn scan_one(
    provider: &dyn MarketDataProvider,
    request: &KlineRequest,
    analysis_config: &AnalysisConfig,
) -> Result<SymbolReport> {
    let fetched = provider.fetch(request)?;
    let analysis = analyze(&fetched.series, analysis_config)?;
    Ok(SymbolReport {
        symbol: request.symbol.clone(),
        interval: request.interval,
        source: fetched.source,
        analysis,
    })
}

fn run_scan(app: &AppConfig, symbols: Vec<String>, fetch: &FetchArgs, json: bool) -> Result<()> {
    let symbols = if symbols.is_empty() {
        app.watchlist.clone()
    } else {
        symbols
    };
    if symbols.is_empty() {
        bail!("no symbols given and the watchlist is empty");
    }

    let provider = build_provider(app, fetch.synthetic)?;
    let rows: Vec<ScanRow> = symbols
        .par_iter()
        .map(|symbol| {
            let outcome = build_request(app, Some(symbol), fetch)
                .and_then(|request| scan_one(provider.as_ref(), &request, &app.analysis));
            match outcome {
                Ok(report) => ScanRow {
                    symbol: report.symbol.clone(),
                    report: Some(report),
                    error: None,
                },
                Err(err) => {
                    warn!(%symbol, error = %err, "scan failed");
                    ScanRow {
                        symbol: symbol.to_uppercase(),
                        report: None,
                        error: Some(format!("{err:#}")),
                    }
                }
            }
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        print!("{}", render_scan(&rows));
    }

    let failed = rows.iter().filter(|r| r.report.is_none()).count();
    if failed == rows.len() {
        bail!("every symbol failed");
    }
    Ok(())
}

fn run_download(
    app: &AppConfig,
    symbol: Option<String>,
    fetch: &FetchArgs,
    output: Option<PathBuf>,
) -> Result<()> {
    let request = build_request(app, symbol.as_deref(), fetch)?;
    let provider = build_provider(app, fetch.synthetic)?;
    let fetched = provider.fetch(&request)?;

    let path = output.unwrap_or_else(|| {
        PathBuf::from("data").join(format!("{}_{}.csv", request.symbol, request.interval))
    });
    write_csv(&path, &fetched.series)
        .with_context(|| format!("failed to write {}", path.display()))?;

    println!(
        "Saved {} candles ({} to {}) to {}",
        fetched.series.len(),
        report::format_time(&fetched.series.as_slice()[0]),
        report::format_time(fetched.series.last()),
        path.display()
    );
    Ok(())
}
