//! `wavetrader.toml`: defaults for every subcommand.
//!
//! ```toml
//! symbol = "BTCUSDT"
//! interval = "1h"
//! limit = 500
//! watchlist = ["BTCUSDT", "ETHUSDT", "SOLUSDT"]
//!
//! [binance]
//! base_url = "https://api.binance.com"
//! timeout_secs = 10
//!
//! [analysis]
//! rsi_period = 14
//! ```
//!
//! Every key is optional. Command-line flags override file values.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use wavetrader_core::data::{BinanceConfig, Interval, MAX_LIMIT};
use wavetrader_core::AnalysisConfig;

/// File picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "wavetrader.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub symbol: String,
    pub interval: Interval,
    pub limit: usize,
    pub watchlist: Vec<String>,
    pub binance: BinanceConfig,
    pub analysis: AnalysisConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            symbol: "BTCUSDT".into(),
            interval: Interval::OneHour,
            limit: 500,
            watchlist: vec!["BTCUSDT".into(), "ETHUSDT".into(), "SOLUSDT".into()],
            binance: BinanceConfig::default(),
            analysis: AnalysisConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_toml(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s).context("invalid config TOML")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("in {}", path.display()))
    }

    /// Explicit path, else `wavetrader.toml` if present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))
            }
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        if !(1..=MAX_LIMIT).contains(&self.limit) {
            bail!("limit must be within 1..={MAX_LIMIT}, got {}", self.limit);
        }
        if self.binance.base_url.trim().is_empty() {
            bail!("binance.base_url is empty");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(AppConfig::from_toml("").unwrap(), AppConfig::default());
    }

    #[test]
    fn partial_file_overrides_only_named_keys() {
        let config = AppConfig::from_toml(
            r#"
            interval = "15m"
            watchlist = ["ADAUSDT"]

            [binance]
            timeout_secs = 3

            [analysis]
            rsi_period = 21
            "#,
        )
        .unwrap();

        assert_eq!(config.symbol, "BTCUSDT");
        assert_eq!(config.interval, Interval::FifteenMinutes);
        assert_eq!(config.watchlist, vec!["ADAUSDT".to_string()]);
        assert_eq!(config.binance.timeout_secs, 3);
        assert_eq!(config.binance.base_url, "https://api.binance.com");
        assert_eq!(config.analysis.rsi_period, 21);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(AppConfig::from_toml("limit = 0").is_err());
        assert!(AppConfig::from_toml("interval = \"2h\"").is_err());
        assert!(AppConfig::from_toml("[analysis]\nrsi_period = 1").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wavetrader.toml");
        std::fs::write(&path, "symbol = \"ETHUSDT\"\nlimit = 200\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.symbol, "ETHUSDT");
        assert_eq!(config.limit, 200);
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }
}
